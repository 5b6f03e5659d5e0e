use models::{Attributes, CatalogEntry, ComponentType};
use serde::Deserialize;
use serde_json::Value;

use super::{entry, push_attr};

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StorageDocument {
    #[serde(default)]
    pub devices: Vec<StorageDevice>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StorageDevice {
    pub brand: Option<String>,
    pub series: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub storage_type: Option<Value>,
    pub interface: Option<Value>,
    pub capacity: Option<Value>,
    pub form_factor: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

pub(super) fn normalize(doc: StorageDocument) -> Vec<CatalogEntry> {
    doc.devices
        .into_iter()
        .filter_map(|d| {
            let mut attrs = Attributes::new();
            push_attr(&mut attrs, "type", d.storage_type);
            push_attr(&mut attrs, "interface", d.interface);
            push_attr(&mut attrs, "capacity", d.capacity);
            push_attr(&mut attrs, "form_factor", d.form_factor);

            entry(
                ComponentType::Storage,
                d.brand.as_deref(),
                d.series.as_deref(),
                d.model.as_deref(),
                d.uuid.as_deref(),
                attrs,
            )
        })
        .collect()
}
