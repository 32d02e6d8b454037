use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{jwt::JwtKeys, repo::PgUserRepo, repo::UserRepo};
use crate::config::AppConfig;
use crate::criteria::repo::{CriterionRepo, PgCriterionRepo};
use crate::jobs::repo::{JobRepo, PgJobRepo};
use crate::mailer::{LogMailer, Mailer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub jobs: Arc<dyn JobRepo>,
    pub criteria: Arc<dyn CriterionRepo>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Every repository shares the one pool; the caller keeps a handle to close it.
    pub fn new(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self {
            keys: JwtKeys::from_config(&config.jwt),
            users: Arc::new(PgUserRepo::new(db.clone())),
            jobs: Arc::new(PgJobRepo::new(db.clone())),
            criteria: Arc::new(PgCriterionRepo::new(db)),
            mailer: Arc::new(LogMailer),
            config,
        }
    }

    #[cfg(test)]
    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        jobs: Arc<dyn JobRepo>,
        criteria: Arc<dyn CriterionRepo>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            keys: JwtKeys::from_config(&config.jwt),
            config,
            users,
            jobs,
            criteria,
            mailer,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::test_support::TestApp::new().state
    }
}
