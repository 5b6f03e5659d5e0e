//! Domain types shared by the catalog, persistence and record management crates.

mod catalog;
mod component;
mod record;

pub use catalog::{Attributes, CatalogEntry, CustomFields, CustomFieldsError, CustomSpecification};
pub use component::{ComponentStatus, ComponentType, TransitionPolicy};
pub use record::{
    InventoryRecord, NetworkFields, NewRecord, Page, PatchValue, RecordDetails, RecordPage,
    RecordPatch,
};
