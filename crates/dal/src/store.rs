use async_trait::async_trait;
use models::{ComponentStatus, ComponentType, InventoryRecord, NewRecord, Page, RecordPatch};

use crate::StoreError;

/// Row-level access to the per-type inventory tables.
///
/// Implementations enforce uniqueness of `serial_number` and `identifier`
/// within each component type and manage `id`, `created_at` and
/// `updated_at`. Nothing else about a record is checked here.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// One page of records, newest first, with the total count matching
    /// `status`.
    async fn list(
        &self,
        component: ComponentType,
        status: Option<ComponentStatus>,
        page: Page,
    ) -> Result<(Vec<InventoryRecord>, i64), StoreError>;

    async fn get(
        &self,
        component: ComponentType,
        id: i64,
    ) -> Result<Option<InventoryRecord>, StoreError>;

    async fn serial_exists(
        &self,
        component: ComponentType,
        serial_number: &str,
    ) -> Result<bool, StoreError>;

    /// Inserts a record and returns its new id.
    async fn insert(&self, component: ComponentType, record: &NewRecord)
        -> Result<i64, StoreError>;

    /// Writes the columns named by `patch`. Returns false when no row has `id`.
    async fn update(
        &self,
        component: ComponentType,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<bool, StoreError>;

    /// Returns false when no row has `id`.
    async fn delete(&self, component: ComponentType, id: i64) -> Result<bool, StoreError>;
}
