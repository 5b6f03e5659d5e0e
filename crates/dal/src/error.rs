use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique column `{column}`")]
    UniqueViolation { column: String },

    #[error("SQLX error: {context}: {source}")]
    Sqlx {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("running migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Wraps a driver error, pulling unique violations out into their own
    /// variant so callers can report them as conflicts.
    pub fn sqlx(context: impl Into<String>, source: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &source {
            if db.is_unique_violation() {
                return Self::UniqueViolation {
                    column: unique_column(db.constraint()).to_owned(),
                };
            }
        }

        Self::Sqlx {
            context: context.into(),
            source,
        }
    }
}

/// Postgres names inline unique constraints `<table>_<column>_key`.
fn unique_column(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.ends_with("_serial_number_key") => "serial_number",
        Some(c) if c.ends_with("_identifier_key") => "identifier",
        _ => "unknown",
    }
}
