use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Lifecycle state of one physical unit.
#[derive(
    sqlx::Type,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Hash,
    PartialEq,
    Eq,
    Default,
    EnumString,
    EnumIter,
    Display,
)]
#[sqlx(type_name = "component_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    #[default]
    #[strum(serialize = "available")]
    Available,
    #[serde(alias = "inUse")]
    #[strum(to_string = "in_use", serialize = "inUse")]
    InUse,
    #[strum(serialize = "maintenance")]
    Maintenance,
    #[strum(serialize = "decommissioned")]
    Decommissioned,
    #[strum(serialize = "failed")]
    Failed,
}

/// How status changes are checked on update.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may move to any other status.
    #[default]
    Permissive,
    /// `decommissioned` is terminal and a failed unit must pass through
    /// maintenance (or back to available) before it is put in use again.
    Strict,
}

impl ComponentStatus {
    /// A record in this state must name the server it is installed in.
    pub fn requires_server(self) -> bool {
        matches!(self, Self::InUse)
    }

    pub fn can_transition_to(self, next: ComponentStatus, policy: TransitionPolicy) -> bool {
        use ComponentStatus::*;

        if self == next || policy == TransitionPolicy::Permissive {
            return true;
        }

        match (self, next) {
            (Decommissioned, _) => false,
            (Failed, InUse) => false,
            _ => true,
        }
    }
}
