use vitrina_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique column already holds the value.
    #[error("A user with that {field} already exists.")]
    Conflict { field: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Conflicts become field-level 400s, everything else a 500.
    pub fn into_app_error(self) -> AppError {
        match self {
            StoreError::Conflict { field } => AppError::field(field, self.to_string()),
            other => AppError::database(other),
        }
    }
}
