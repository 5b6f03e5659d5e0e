//! Component catalogs: normalization of the per-type catalog documents,
//! brand → series → model resolution, and identifier generation for catalog
//! entries and custom specifications.

pub mod document;
pub mod identity;

mod context;
mod loader;
mod resolver;

pub use context::SelectionContext;
pub use document::CatalogDocument;
pub use loader::{CatalogError, CatalogLoader};
pub use resolver::{brands_of, models_of, series_of, Catalog, CatalogSelection, ModelOption};
