use models::{Attributes, CatalogEntry, ComponentType};
use serde::Deserialize;
use serde_json::Value;

use super::{entry, push_attr};

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RamDocument {
    #[serde(default)]
    pub modules: Vec<RamModule>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RamModule {
    pub brand: Option<String>,
    pub series: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub memory_type: Option<Value>,
    pub size: Option<Value>,
    pub frequency: Option<Value>,
    pub ecc: Option<Value>,
    pub form_factor: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

pub(super) fn normalize(doc: RamDocument) -> Vec<CatalogEntry> {
    doc.modules
        .into_iter()
        .filter_map(|m| {
            let mut attrs = Attributes::new();
            push_attr(&mut attrs, "type", m.memory_type);
            push_attr(&mut attrs, "size", m.size);
            push_attr(&mut attrs, "frequency", m.frequency);
            push_attr(&mut attrs, "ecc", m.ecc);
            push_attr(&mut attrs, "form_factor", m.form_factor);

            entry(
                ComponentType::Ram,
                m.brand.as_deref(),
                m.series.as_deref(),
                m.model.as_deref(),
                m.uuid.as_deref(),
                attrs,
            )
        })
        .collect()
}
