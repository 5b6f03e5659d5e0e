use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use models::{
    ComponentStatus, ComponentType, InventoryRecord, NewRecord, Page, RecordPatch,
};
use parking_lot::RwLock;

use crate::{InventoryStore, StoreError};

/// Process-local [`InventoryStore`] with the same uniqueness rules as the
/// PostgreSQL tables. Contents are lost on drop.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<HashMap<ComponentType, Vec<InventoryRecord>>>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list(
        &self,
        component: ComponentType,
        status: Option<ComponentStatus>,
        page: Page,
    ) -> Result<(Vec<InventoryRecord>, i64), StoreError> {
        let tables = self.tables.read();
        let mut matching: Vec<&InventoryRecord> = tables
            .get(&component)
            .map(|rows| {
                rows.iter()
                    .filter(|r| status.map_or(true, |s| r.status == s))
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let total = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((records, total))
    }

    async fn get(
        &self,
        component: ComponentType,
        id: i64,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        Ok(self
            .tables
            .read()
            .get(&component)
            .and_then(|rows| rows.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn serial_exists(
        &self,
        component: ComponentType,
        serial_number: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .read()
            .get(&component)
            .is_some_and(|rows| rows.iter().any(|r| r.serial_number == serial_number)))
    }

    async fn insert(
        &self,
        component: ComponentType,
        record: &NewRecord,
    ) -> Result<i64, StoreError> {
        let mut tables = self.tables.write();
        let rows = tables.entry(component).or_default();

        if rows.iter().any(|r| r.serial_number == record.serial_number) {
            return Err(StoreError::UniqueViolation {
                column: "serial_number".to_owned(),
            });
        }
        if rows.iter().any(|r| r.identifier == record.identifier) {
            return Err(StoreError::UniqueViolation {
                column: "identifier".to_owned(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        rows.push(InventoryRecord {
            id,
            identifier: record.identifier.clone(),
            serial_number: record.serial_number.clone(),
            status: record.status,
            details: record.details.clone(),
            network: component
                .has_network_fields()
                .then(|| record.network.clone().unwrap_or_default()),
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn update(
        &self,
        component: ComponentType,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        let Some(record) = tables
            .get_mut(&component)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
        else {
            return Ok(false);
        };

        patch.apply(record);
        if !component.has_network_fields() {
            record.network = None;
        }
        record.updated_at = Utc::now();

        Ok(true)
    }

    async fn delete(&self, component: ComponentType, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(&component) else {
            return Ok(false);
        };

        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::RecordDetails;
    use pretty_assertions::assert_eq;

    fn new_record(serial: &str, identifier: &str, status: ComponentStatus) -> NewRecord {
        NewRecord {
            identifier: identifier.to_owned(),
            serial_number: serial.to_owned(),
            status,
            details: RecordDetails::default(),
            network: None,
        }
    }

    fn id(n: u32) -> String {
        format!("00000000-0000-4000-0000-{n:012x}")
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = MemoryStore::new();
        let rid = store
            .insert(
                ComponentType::Ram,
                &new_record("RAM-T1", &id(1), ComponentStatus::Available),
            )
            .await
            .unwrap();

        let record = store.get(ComponentType::Ram, rid).await.unwrap().unwrap();
        assert_eq!(record.serial_number, "RAM-T1");
        assert_eq!(record.status, ComponentStatus::Available);
        assert!(record.network.is_none());

        assert!(store.get(ComponentType::Cpu, rid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn serial_and_identifier_unique_per_type() {
        let store = MemoryStore::new();
        let first = new_record("SN-1", &id(1), ComponentStatus::Available);
        store.insert(ComponentType::Cpu, &first).await.unwrap();

        let err = store
            .insert(
                ComponentType::Cpu,
                &new_record("SN-1", &id(2), ComponentStatus::Available),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { ref column } if column == "serial_number"));

        let err = store
            .insert(
                ComponentType::Cpu,
                &new_record("SN-2", &id(1), ComponentStatus::Available),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { ref column } if column == "identifier"));

        // other tables are independent
        store.insert(ComponentType::Ram, &first).await.unwrap();
        assert!(store.serial_exists(ComponentType::Ram, "SN-1").await.unwrap());
        assert!(!store.serial_exists(ComponentType::Nic, "SN-1").await.unwrap());
    }

    #[tokio::test]
    async fn list_filters_and_pages_newest_first() {
        let store = MemoryStore::new();
        for n in 0..5u32 {
            let status = if n % 2 == 0 {
                ComponentStatus::Failed
            } else {
                ComponentStatus::Available
            };
            store
                .insert(
                    ComponentType::Nic,
                    &new_record(&format!("NIC-{n}"), &id(n), status),
                )
                .await
                .unwrap();
        }

        let (failed, total) = store
            .list(
                ComponentType::Nic,
                Some(ComponentStatus::Failed),
                Page::new(10, 0),
            )
            .await
            .unwrap();
        assert_eq!(total, 3);
        let serials: Vec<_> = failed.iter().map(|r| r.serial_number.as_str()).collect();
        assert_eq!(serials, vec!["NIC-4", "NIC-2", "NIC-0"]);
        assert!(failed.iter().all(|r| r.network.is_some()));

        let (page, total) = store
            .list(ComponentType::Nic, None, Page::new(2, 2))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].serial_number, "NIC-2");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = MemoryStore::new();
        let rid = store
            .insert(
                ComponentType::Storage,
                &new_record("SSD-1", &id(9), ComponentStatus::Available),
            )
            .await
            .unwrap();

        let patch = RecordPatch {
            status: Some(ComponentStatus::Maintenance),
            location: Some(Some("Rack 4".into())),
            ..Default::default()
        };
        assert!(store.update(ComponentType::Storage, rid, &patch).await.unwrap());
        assert!(!store.update(ComponentType::Storage, rid + 1, &patch).await.unwrap());

        let record = store.get(ComponentType::Storage, rid).await.unwrap().unwrap();
        assert_eq!(record.status, ComponentStatus::Maintenance);
        assert_eq!(record.details.location.as_deref(), Some("Rack 4"));
        assert!(record.updated_at >= record.created_at);

        assert!(store.delete(ComponentType::Storage, rid).await.unwrap());
        assert!(!store.delete(ComponentType::Storage, rid).await.unwrap());
        assert!(store.get(ComponentType::Storage, rid).await.unwrap().is_none());
    }
}
