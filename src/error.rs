use thiserror::Error;

/// Failures of the durable store. A duplicate insert is not one of them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Error)]
pub enum ShortenError {
    /// The derived code already belongs to a different URL.
    #[error("short code '{code}' is already mapped to another URL")]
    Collision { code: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
