use domwatch_domain::shared::DomainError;

/// Maps storage-layer errors onto `DomainError`, tagging each with the operation
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(error: sqlx::Error, context: &str) -> DomainError {
        match &error {
            sqlx::Error::RowNotFound => DomainError::NotFound(format!("{}: row not found", context)),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::AlreadyExists(format!("{}: {}", context, db_err.message()))
            }
            _ => DomainError::Repository(format!("{}: {}", context, error)),
        }
    }

    pub fn map_json_error(error: serde_json::Error, context: &str) -> DomainError {
        DomainError::Deserialization(format!("{}: {}", context, error))
    }
}
