use std::fmt;

use models::{Attributes, CatalogEntry, ComponentType};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use super::{clean, entry, push_attr};

/// Caddies grouped by form factor category, e.g. `"2.5-inch": [...]`.
///
/// Groups are kept in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaddyDocument {
    pub groups: Vec<(String, Vec<CaddyModel>)>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CaddyModel {
    pub brand: Option<String>,
    /// Falls back to the group category when absent.
    pub series: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub caddy_type: Option<Value>,
    pub compatibility: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

impl<'de> Deserialize<'de> for CaddyDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = CaddyDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping caddy categories to lists of caddies")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some((category, models)) = map.next_entry::<String, Vec<CaddyModel>>()? {
                    groups.push((category, models));
                }
                Ok(CaddyDocument { groups })
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

pub(super) fn normalize(doc: CaddyDocument) -> Vec<CatalogEntry> {
    let mut out = Vec::new();

    for (category, models) in doc.groups {
        let category = clean(Some(&category));

        for m in models {
            let series = clean(m.series.as_deref()).or_else(|| category.clone());

            let mut attrs = Attributes::new();
            push_attr(&mut attrs, "form_factor", category.clone());
            push_attr(&mut attrs, "type", m.caddy_type);
            push_attr(&mut attrs, "compatibility", m.compatibility);

            out.extend(entry(
                ComponentType::Caddy,
                m.brand.as_deref(),
                series.as_deref(),
                m.model.as_deref(),
                m.uuid.as_deref(),
                attrs,
            ));
        }
    }

    out
}
