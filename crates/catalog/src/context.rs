use chrono::{DateTime, Utc};
use models::{ComponentType, CustomFields, CustomFieldsError, CustomSpecification};

use crate::{
    identity,
    loader::CatalogLoader,
    resolver::{Catalog, CatalogSelection, ModelOption},
};

/// Everything one request needs to narrow a selection and mint identifiers:
/// the component type, its freshly loaded catalog and the instant the
/// request is handled at. Built per request and dropped with it.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    component_type: ComponentType,
    catalog: Catalog,
    now: DateTime<Utc>,
}

impl SelectionContext {
    pub fn new(catalog: Catalog, now: DateTime<Utc>) -> Self {
        Self {
            component_type: catalog.component_type(),
            catalog,
            now,
        }
    }

    pub fn load(loader: &CatalogLoader, component_type: ComponentType) -> Self {
        Self::new(loader.load(component_type), Utc::now())
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn brands(&self) -> Vec<String> {
        self.catalog.brands()
    }

    pub fn series(&self, brand: &str) -> Vec<String> {
        self.catalog.series(brand)
    }

    pub fn models(&self, brand: &str, series: Option<&str>) -> Vec<ModelOption> {
        self.catalog.models(brand, series)
    }

    pub fn resolve(&self, selection: &CatalogSelection) -> Option<ModelOption> {
        self.catalog.resolve(selection)
    }

    /// Mints the identifier of a catalog-less configuration at this
    /// request's timestamp.
    pub fn specify(&self, fields: CustomFields) -> Result<CustomSpecification, CustomFieldsError> {
        if fields.component_type() != self.component_type {
            return Err(CustomFieldsError::Invalid {
                component: self.component_type,
                message: format!(
                    "fields describe a {} but the selection is for {}",
                    fields.component_type(),
                    self.component_type
                ),
            });
        }
        Ok(identity::specify(fields, self.now))
    }
}
