//! Inventory record management: list/get/add/update/delete over every
//! component type, with the cross-field rules a record must satisfy before it
//! reaches the store.

mod error;
mod manager;
mod options;
mod request;
pub mod validate;

pub use error::{parse_component_type, InventoryError, OPAQUE_FAILURE};
pub use manager::InventoryManager;
pub use options::{options_in, CatalogOptions, OptionsQuery};
pub use request::{AddRecordRequest, AddedRecord};
