use crate::{db::DbError, error::ApiError};

/// Failures shared by the reference-data services.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("not found")]
    NotFound,
    #[error("dependent records exist")]
    DependentRecordsExist,
    #[error("referenced by another table")]
    ForeignKeyConstraint,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DbError> for ResourceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::ForeignKeyViolation => ResourceError::ForeignKeyConstraint,
            other => ResourceError::Internal(other.into()),
        }
    }
}

/// Wire wording for one resource kind.
pub struct Messages {
    pub not_found: &'static str,
    pub has_dependents: &'static str,
    pub referenced: &'static str,
}

impl ResourceError {
    pub fn into_api(self, messages: &Messages) -> ApiError {
        match self {
            ResourceError::NotFound => ApiError::NotFound(messages.not_found.into()),
            ResourceError::DependentRecordsExist => ApiError::BadRequest(messages.has_dependents.into()),
            ResourceError::ForeignKeyConstraint => ApiError::BadRequest(messages.referenced.into()),
            ResourceError::Internal(e) => ApiError::Internal(e),
        }
    }
}
