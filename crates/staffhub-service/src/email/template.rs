//! `{{placeholder}}` template rendering.
//!
//! Values are HTML-escaped unless their key is listed as safe, which is
//! how pre-rendered snippets such as an anchor tag are injected. Unknown
//! placeholders and `null` values render as the empty string.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("token pattern is valid")
});

/// Render an HTML template, escaping every value not in `safe_keys`.
pub fn render_html(template: &str, vars: &Map<String, Value>, safe_keys: &[&str]) -> String {
    render(template, vars, |key, value| {
        if safe_keys.contains(&key) {
            value
        } else {
            escape_html(&value)
        }
    })
}

/// Render a plain-text template (subject lines, text bodies) without escaping.
pub fn render_text(template: &str, vars: &Map<String, Value>) -> String {
    render(template, vars, |_, value| value)
}

fn render<F>(template: &str, vars: &Map<String, Value>, finish: F) -> String
where
    F: Fn(&str, String) -> String,
{
    TOKEN_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            match vars.get(key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => finish(key, s.clone()),
                Some(other) => finish(key, other.to_string()),
            }
        })
        .into_owned()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_escapes_unsafe_values() {
        let v = vars(json!({"task_title": "<b>Call \"Tom\" & Jo's</b>"}));
        assert_eq!(
            render_html("<p>{{task_title}}</p>", &v, &[]),
            "<p>&lt;b&gt;Call &quot;Tom&quot; &amp; Jo&#39;s&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn test_safe_keys_pass_through() {
        let v = vars(json!({"task_link": "<a href=\"https://x/tasks/1\">Open</a>"}));
        assert_eq!(
            render_html("{{ task_link }}", &v, &["task_link"]),
            "<a href=\"https://x/tasks/1\">Open</a>"
        );
    }

    #[test]
    fn test_unknown_and_null_render_empty() {
        let v = vars(json!({"a": null}));
        assert_eq!(render_html("[{{a}}][{{missing}}]", &v, &[]), "[][]");
    }

    #[test]
    fn test_numbers_and_bools() {
        let v = vars(json!({"n": 42, "b": true}));
        assert_eq!(render_text("{{n}} {{  b  }}", &v), "42 true");
    }

    #[test]
    fn test_text_rendering_does_not_escape() {
        let v = vars(json!({"name": "A & B"}));
        assert_eq!(render_text("Hi {{name}}", &v), "Hi A & B");
    }

    #[test]
    fn test_malformed_tokens_left_alone() {
        let v = vars(json!({"a": "x"}));
        assert_eq!(render_text("{{a} {a}} {{ 1a }}", &v), "{{a} {a}} {{ 1a }}");
    }
}
