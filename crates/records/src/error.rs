use dal::StoreError;
use models::{ComponentType, CustomFieldsError};
use thiserror::Error;

/// Outward message for failures whose detail stays in the logs.
pub const OPAQUE_FAILURE: &str = "the server ran into an unrecoverable error, this event has been logged and will be reviewed by the site administrators shortly";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid component type `{0}`, expected one of cpu, ram, motherboard, storage, caddy, nic")]
    InvalidComponentType(String),

    #[error("no {component} record with id {id}")]
    NotFound { component: ComponentType, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("persistence failure: {0}")]
    Persistence(#[source] StoreError),
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidComponentType(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            Self::Persistence(_) => 500,
        }
    }

    /// The message safe to hand back to a caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) => OPAQUE_FAILURE.to_owned(),
            other => other.to_string(),
        }
    }

    /// Maps a store failure, turning unique violations into conflicts.
    pub(crate) fn from_store(component: ComponentType, e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { column } => Self::Conflict(format!(
                "a {component} record with this {} already exists",
                column.replace('_', " ")
            )),
            other => {
                tracing::error!("{component} store failure: {other:?}");
                Self::Persistence(other)
            }
        }
    }
}

impl From<CustomFieldsError> for InventoryError {
    fn from(e: CustomFieldsError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Parses a `type` selector. Anything but the six lowercase names is
/// rejected.
pub fn parse_component_type(raw: &str) -> Result<ComponentType, InventoryError> {
    raw.trim()
        .parse()
        .map_err(|_| InventoryError::InvalidComponentType(raw.to_owned()))
}
