use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::ComponentType;

/// Type specific specification fields of a catalog model (cores, frequency,
/// capacity, ...). Ordered so serialized output is stable.
pub type Attributes = BTreeMap<String, Value>;

/// One known hardware model, normalized out of a catalog document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub component_type: ComponentType,
    pub brand: String,
    pub series: String,
    pub model: String,
    #[serde(default)]
    pub attributes: Attributes,
    /// Catalog-native identifier, if the document supplied one.
    #[serde(default)]
    pub identifier: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        component_type: ComponentType,
        brand: impl Into<String>,
        series: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            component_type,
            brand: brand.into(),
            series: series.into(),
            model: model.into(),
            attributes: Attributes::new(),
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: Option<String>) -> Self {
        self.identifier = identifier.filter(|i| !i.trim().is_empty());
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomFieldsError {
    #[error("custom specifications are not supported for {0}")]
    Unsupported(ComponentType),

    #[error("invalid custom {component} specification: {message}")]
    Invalid {
        component: ComponentType,
        message: String,
    },
}

/// Field set of a component configuration that has no catalog backing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "component_type", rename_all = "lowercase")]
pub enum CustomFields {
    Ram {
        memory_type: String,
        ecc: bool,
        size: String,
    },
    Storage {
        storage_type: String,
        capacity: String,
    },
    Caddy {
        caddy_type: String,
    },
}

#[derive(Deserialize)]
struct RamInput {
    #[serde(rename = "type")]
    memory_type: String,
    #[serde(default, alias = "ECC")]
    ecc: bool,
    size: String,
}

#[derive(Deserialize)]
struct StorageInput {
    #[serde(rename = "type")]
    storage_type: String,
    capacity: String,
}

#[derive(Deserialize)]
struct CaddyInput {
    #[serde(rename = "type")]
    caddy_type: String,
}

fn required(component: ComponentType, name: &str, value: String) -> Result<String, CustomFieldsError> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(CustomFieldsError::Invalid {
            component,
            message: format!("`{name}` must not be empty"),
        });
    }
    Ok(value)
}

impl CustomFields {
    /// Reads the user-declared field object for `component`.
    pub fn parse(component: ComponentType, raw: &Value) -> Result<Self, CustomFieldsError> {
        let invalid = |e: serde_json::Error| CustomFieldsError::Invalid {
            component,
            message: e.to_string(),
        };

        match component {
            ComponentType::Ram => {
                let input: RamInput = serde_json::from_value(raw.clone()).map_err(invalid)?;
                Ok(Self::Ram {
                    memory_type: required(component, "type", input.memory_type)?,
                    ecc: input.ecc,
                    size: required(component, "size", input.size)?,
                })
            }
            ComponentType::Storage => {
                let input: StorageInput = serde_json::from_value(raw.clone()).map_err(invalid)?;
                Ok(Self::Storage {
                    storage_type: required(component, "type", input.storage_type)?,
                    capacity: required(component, "capacity", input.capacity)?,
                })
            }
            ComponentType::Caddy => {
                let input: CaddyInput = serde_json::from_value(raw.clone()).map_err(invalid)?;
                Ok(Self::Caddy {
                    caddy_type: required(component, "type", input.caddy_type)?,
                })
            }
            other => Err(CustomFieldsError::Unsupported(other)),
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Ram { .. } => ComponentType::Ram,
            Self::Storage { .. } => ComponentType::Storage,
            Self::Caddy { .. } => ComponentType::Caddy,
        }
    }

    /// The fields under the names the user submitted them with.
    pub fn field_map(&self) -> BTreeMap<&'static str, Value> {
        let mut map = BTreeMap::new();
        match self {
            Self::Ram {
                memory_type,
                ecc,
                size,
            } => {
                map.insert("type", Value::from(memory_type.as_str()));
                map.insert("ecc", Value::from(*ecc));
                map.insert("size", Value::from(size.as_str()));
            }
            Self::Storage {
                storage_type,
                capacity,
            } => {
                map.insert("type", Value::from(storage_type.as_str()));
                map.insert("capacity", Value::from(capacity.as_str()));
            }
            Self::Caddy { caddy_type } => {
                map.insert("type", Value::from(caddy_type.as_str()));
            }
        }
        map
    }

    /// Human readable line attached to the notes of the resulting record.
    pub fn description(&self) -> String {
        match self {
            Self::Ram {
                memory_type,
                ecc,
                size,
            } => {
                let ecc = if *ecc { "ECC" } else { "Non-ECC" };
                format!("Custom RAM: {size} {memory_type} {ecc}")
            }
            Self::Storage {
                storage_type,
                capacity,
            } => format!("Custom Storage: {capacity} {storage_type}"),
            Self::Caddy { caddy_type } => format!("Custom Caddy: {caddy_type}"),
        }
    }
}

/// A catalog-less configuration together with the identifier generated for it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CustomSpecification {
    pub fields: CustomFields,
    pub identifier: String,
}

impl CustomSpecification {
    pub fn component_type(&self) -> ComponentType {
        self.fields.component_type()
    }

    pub fn description(&self) -> String {
        self.fields.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_ram_fields() {
        let fields = CustomFields::parse(
            ComponentType::Ram,
            &json!({"type": "DDR4", "ecc": true, "size": " 32GB "}),
        )
        .unwrap();

        assert_eq!(
            fields,
            CustomFields::Ram {
                memory_type: "DDR4".into(),
                ecc: true,
                size: "32GB".into()
            }
        );
        assert_eq!(fields.description(), "Custom RAM: 32GB DDR4 ECC");
    }

    #[test]
    fn rejects_custom_cpu() {
        let err = CustomFields::parse(ComponentType::Cpu, &json!({"type": "x"})).unwrap_err();
        assert_eq!(err, CustomFieldsError::Unsupported(ComponentType::Cpu));
    }

    #[test]
    fn rejects_blank_required_field() {
        let err = CustomFields::parse(
            ComponentType::Storage,
            &json!({"type": "NVMe", "capacity": "   "}),
        )
        .unwrap_err();
        assert!(matches!(err, CustomFieldsError::Invalid { .. }));
    }

    #[test]
    fn rejects_missing_field() {
        let err = CustomFields::parse(ComponentType::Caddy, &json!({})).unwrap_err();
        assert!(err.to_string().contains("caddy"));
    }

    #[test]
    fn field_map_uses_submitted_names() {
        let fields = CustomFields::Storage {
            storage_type: "SSD".into(),
            capacity: "960GB".into(),
        };
        let keys: Vec<_> = fields.field_map().keys().copied().collect();
        assert_eq!(keys, vec!["capacity", "type"]);
    }
}
