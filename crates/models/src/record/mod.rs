mod patch;

pub use patch::{PatchValue, RecordPatch};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ComponentStatus;

/// Descriptive fields shared by every inventory table.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordDetails {
    /// Server the unit is installed in. Required while the unit is in use.
    pub server_identifier: Option<String>,
    pub location: Option<String>,
    pub rack_position: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub flag: Option<String>,
    pub notes: Option<String>,
}

/// NIC only columns.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkFields {
    pub mac_address: Option<String>,
    pub ip_address: Option<String>,
    pub network_name: Option<String>,
}

impl NetworkFields {
    pub fn is_empty(&self) -> bool {
        self.mac_address.is_none() && self.ip_address.is_none() && self.network_name.is_none()
    }
}

/// One physical unit of a component, as persisted.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: i64,
    /// Catalog entry or custom specification this unit is an instance of.
    pub identifier: String,
    pub serial_number: String,
    pub status: ComponentStatus,
    #[serde(flatten)]
    pub details: RecordDetails,
    #[serde(flatten)]
    pub network: Option<NetworkFields>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// The record as it would look after `patch` is written.
    pub fn patched(&self, patch: &RecordPatch) -> InventoryRecord {
        let mut next = self.clone();
        patch.apply(&mut next);
        next
    }

    pub fn server_assigned(&self) -> bool {
        self.details
            .server_identifier
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// A validated record ready to be inserted. The store assigns `id` and the
/// timestamps.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub identifier: String,
    pub serial_number: String,
    pub status: ComponentStatus,
    pub details: RecordDetails,
    pub network: Option<NetworkFields>,
}

/// Limit/offset paging window for list queries.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of a list query.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<InventoryRecord>,
    pub total: i64,
    pub has_more: bool,
}

impl RecordPage {
    pub fn new(records: Vec<InventoryRecord>, total: i64, page: Page) -> Self {
        Self {
            records,
            total,
            has_more: page.offset.saturating_add(page.limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_follows_offset_plus_limit() {
        assert!(!RecordPage::new(vec![], 3, Page::new(10, 0)).has_more);
        assert!(!RecordPage::new(vec![], 10, Page::new(10, 0)).has_more);
        assert!(RecordPage::new(vec![], 11, Page::new(10, 0)).has_more);
        assert!(!RecordPage::new(vec![], 11, Page::new(10, 10)).has_more);
    }

    #[test]
    fn has_more_saturates_at_the_last_offset() {
        assert!(!RecordPage::new(vec![], i64::MAX, Page::new(50, i64::MAX)).has_more);
        assert!(!RecordPage::new(vec![], 3, Page::new(500, i64::MAX - 1)).has_more);
    }

    #[test]
    fn default_page_is_fifty_from_zero() {
        assert_eq!(Page::default(), Page::new(50, 0));
    }

    #[test]
    fn network_fields_flatten_into_record_json() {
        let now = Utc::now();
        let record = InventoryRecord {
            id: 7,
            identifier: "00000000-0000-4000-0000-000000000001".into(),
            serial_number: "NIC-1".into(),
            status: ComponentStatus::Available,
            details: RecordDetails::default(),
            network: Some(NetworkFields {
                mac_address: Some("00:1b:21:aa:bb:cc".into()),
                ..Default::default()
            }),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mac_address"], "00:1b:21:aa:bb:cc");
        assert_eq!(json["status"], "available");
        assert!(json.get("network").is_none());
    }
}
