//! Payroll notification for new transfer requests.

use serde_json::{Map, Value, json};

use staffhub_entity::hiring_manager::HiringManager;
use staffhub_entity::transfer::HiringManagerTransfer;

use crate::email::FallbackTemplate;
use crate::email::template::escape_html;

/// Placeholders whose values are pre-rendered HTML.
pub const SAFE_KEYS: &[&str] = &["transfer_link"];

/// Used when no `HIRING_MANAGER_TRANSFER_REQUEST` template is stored.
pub const TRANSFER_REQUEST_FALLBACK: FallbackTemplate = FallbackTemplate {
    subject: "Hiring manager transfer requested: {{source_name}} to {{target_name}}",
    html: "<p>A transfer has been requested.</p>\
           <ul>\
           <li>From: {{source_name}} ({{source_email}})</li>\
           <li>To: {{target_name}} ({{target_email}})</li>\
           <li>Requested at: {{requested_at}}</li>\
           </ul>\
           <p>{{transfer_link}}</p>",
    text: "Hiring manager transfer requested from {{source_name}} to {{target_name}}.\n{{transfer_url}}",
};

/// Template variables for the payroll notification.
pub fn request_vars(
    transfer: &HiringManagerTransfer,
    source: &HiringManager,
    target: &HiringManager,
    public_base_url: &str,
) -> Map<String, Value> {
    let transfer_url = format!(
        "{}/hiring-manager-transfers/{}",
        public_base_url.trim_end_matches('/'),
        transfer.id
    );
    let vars = json!({
        "transfer_id": transfer.id,
        "source_name": source.full_name(),
        "source_email": source.email.clone().unwrap_or_default(),
        "target_name": target.full_name(),
        "target_email": target.email.clone().unwrap_or_default(),
        "requested_at": transfer.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        "transfer_url": transfer_url,
        "transfer_link": format!(
            "<a href=\"{}\">Review transfer</a>",
            escape_html(&transfer_url)
        ),
    });
    match vars {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
