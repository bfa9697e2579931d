//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_database::repositories::{
    DocumentRepository, EmailTemplateRepository, HiringManagerRepository, NoteRepository,
    OrganizationRepository, TaskRepository, TeamRepository, TransferRepository, UserRepository,
};
use staffhub_service::{
    EmailService, HiringManagerService, OrganizationService, ReminderService, TaskService,
    TeamService, TransferService, UserService, build_mailer,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Services ─────────────────────────────────────────────
    /// Template rendering and mail delivery
    pub email_service: Arc<EmailService>,
    /// Organization CRUD
    pub organization_service: Arc<OrganizationService>,
    /// Hiring manager CRUD
    pub hiring_manager_service: Arc<HiringManagerService>,
    /// Task CRUD
    pub task_service: Arc<TaskService>,
    /// Task reminder engine
    pub reminder_service: Arc<ReminderService>,
    /// Hiring manager transfer workflow
    pub transfer_service: Arc<TransferService>,
    /// Teams and membership
    pub team_service: Arc<TeamService>,
    /// User directory
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire repositories and services over the given pool.
    pub fn build(config: AppConfig, db_pool: PgPool) -> Result<Self, AppError> {
        let org_repo = Arc::new(OrganizationRepository::new(db_pool.clone()));
        let hm_repo = Arc::new(HiringManagerRepository::new(db_pool.clone()));
        let task_repo = Arc::new(TaskRepository::new(db_pool.clone()));
        let note_repo = Arc::new(NoteRepository::new(db_pool.clone()));
        let document_repo = Arc::new(DocumentRepository::new(db_pool.clone()));
        let transfer_repo = Arc::new(TransferRepository::new(db_pool.clone()));
        let team_repo = Arc::new(TeamRepository::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let template_repo = Arc::new(EmailTemplateRepository::new(db_pool.clone()));

        let mailer = build_mailer(&config.mail)?;
        let email_service = Arc::new(EmailService::new(template_repo, mailer));
        let base_url = config.app.public_base_url.clone();

        let organization_service = Arc::new(OrganizationService::new(
            Arc::clone(&org_repo),
            Arc::clone(&note_repo),
        ));
        let hiring_manager_service = Arc::new(HiringManagerService::new(
            Arc::clone(&hm_repo),
            Arc::clone(&note_repo),
            document_repo,
        ));
        let task_service = Arc::new(TaskService::new(
            Arc::clone(&task_repo),
            Arc::clone(&note_repo),
        ));
        let reminder_service = Arc::new(ReminderService::new(
            task_repo,
            Arc::clone(&email_service),
            base_url.clone(),
        ));
        let transfer_service = Arc::new(TransferService::new(
            transfer_repo,
            hm_repo,
            note_repo,
            Arc::clone(&email_service),
            config.transfer.clone(),
            base_url,
        ));
        let team_service = Arc::new(TeamService::new(team_repo, Arc::clone(&user_repo)));
        let user_service = Arc::new(UserService::new(user_repo));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            email_service,
            organization_service,
            hiring_manager_service,
            task_service,
            reminder_service,
            transfer_service,
            team_service,
            user_service,
        })
    }
}
