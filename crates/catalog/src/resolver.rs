//! Brand → series → model narrowing over a normalized catalog.

use std::collections::HashMap;

use itertools::Itertools;
use models::{Attributes, CatalogEntry, ComponentType};
use serde::{Deserialize, Serialize};

use crate::identity::catalog_identifier;

/// The normalized catalog of one component type.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    component_type: ComponentType,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(component_type: ComponentType, entries: Vec<CatalogEntry>) -> Self {
        Self {
            component_type,
            entries,
        }
    }

    pub fn empty(component_type: ComponentType) -> Self {
        Self::new(component_type, Vec::new())
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn brands(&self) -> Vec<String> {
        brands_of(&self.entries)
    }

    pub fn series(&self, brand: &str) -> Vec<String> {
        series_of(&self.entries, brand)
    }

    pub fn models(&self, brand: &str, series: Option<&str>) -> Vec<ModelOption> {
        models_of(&self.entries, brand, series)
    }

    /// Finds the model a user picked, if it is still in the catalog.
    pub fn resolve(&self, selection: &CatalogSelection) -> Option<ModelOption> {
        self.models(&selection.brand, selection.series.as_deref())
            .into_iter()
            .find(|m| m.model == selection.model.trim())
    }
}

/// A brand/series/model triple picked from the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogSelection {
    pub brand: String,
    #[serde(default)]
    pub series: Option<String>,
    pub model: String,
}

/// One selectable model, tagged with its parent brand and series.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModelOption {
    pub brand: String,
    pub series: String,
    pub model: String,
    /// Position of the model within its brand/series group, in document order.
    pub index: usize,
    /// The catalog identifier, or one generated from `brand-series-model-index`.
    pub identifier: String,
    /// True when `identifier` was generated rather than supplied by the catalog.
    pub generated: bool,
    pub attributes: Attributes,
}

fn same(value: &str, wanted: &str) -> bool {
    value.trim() == wanted.trim()
}

/// Distinct, non-empty brands in first-seen order.
pub fn brands_of(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.brand.trim())
        .filter(|b| !b.is_empty())
        .unique()
        .map(str::to_owned)
        .collect()
}

/// Distinct, non-empty series among entries of `brand`.
pub fn series_of(entries: &[CatalogEntry], brand: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|e| same(&e.brand, brand))
        .map(|e| e.series.trim())
        .filter(|s| !s.is_empty())
        .unique()
        .map(str::to_owned)
        .collect()
}

/// Every model of `brand`, narrowed to `series` when given. Order is document
/// order, and each model's index counts within its own brand/series group so
/// the generated identifier does not depend on the filter used.
pub fn models_of(entries: &[CatalogEntry], brand: &str, series: Option<&str>) -> Vec<ModelOption> {
    let series = series.map(str::trim).filter(|s| !s.is_empty());
    let mut group_positions: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::new();

    for entry in entries.iter().filter(|e| same(&e.brand, brand)) {
        let (entry_brand, entry_series, model) =
            (entry.brand.trim(), entry.series.trim(), entry.model.trim());

        let position = group_positions.entry(entry_series).or_insert(0);
        let index = *position;
        *position += 1;

        if series.is_some_and(|s| entry_series != s) {
            continue;
        }

        let (identifier, generated) = match &entry.identifier {
            Some(native) => (native.clone(), false),
            None => (
                catalog_identifier(entry_brand, entry_series, model, index),
                true,
            ),
        };

        out.push(ModelOption {
            brand: entry_brand.to_owned(),
            series: entry_series.to_owned(),
            model: model.to_owned(),
            index,
            identifier,
            generated,
            attributes: entry.attributes.clone(),
        });
    }

    out
}
