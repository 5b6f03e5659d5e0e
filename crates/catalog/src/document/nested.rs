use models::{Attributes, CatalogEntry, ComponentType};
use serde::Deserialize;
use serde_json::Value;

use super::{entry, push_attr};

/// One brand/series node grouping several models.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesNode<M> {
    pub brand: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default = "Vec::new")]
    pub models: Vec<M>,
}

/// A model nested under a [`SeriesNode`].
pub trait NestedModel {
    /// Splits the model into (model name, catalog identifier, attributes).
    fn into_parts(self) -> (Option<String>, Option<String>, Attributes);
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BoardModel {
    #[serde(alias = "name")]
    pub model: Option<String>,
    pub socket: Option<Value>,
    pub chipset: Option<Value>,
    pub form_factor: Option<Value>,
    pub memory_slots: Option<Value>,
    pub memory_type: Option<Value>,
    pub max_memory: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

impl NestedModel for BoardModel {
    fn into_parts(self) -> (Option<String>, Option<String>, Attributes) {
        let mut attrs = Attributes::new();
        push_attr(&mut attrs, "socket", self.socket);
        push_attr(&mut attrs, "chipset", self.chipset);
        push_attr(&mut attrs, "form_factor", self.form_factor);
        push_attr(&mut attrs, "memory_slots", self.memory_slots);
        push_attr(&mut attrs, "memory_type", self.memory_type);
        push_attr(&mut attrs, "max_memory", self.max_memory);
        (self.model, self.uuid, attrs)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NicModel {
    #[serde(alias = "name")]
    pub model: Option<String>,
    pub ports: Option<Value>,
    pub speed: Option<Value>,
    pub interface: Option<Value>,
    pub connector: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

impl NestedModel for NicModel {
    fn into_parts(self) -> (Option<String>, Option<String>, Attributes) {
        let mut attrs = Attributes::new();
        push_attr(&mut attrs, "ports", self.ports);
        push_attr(&mut attrs, "speed", self.speed);
        push_attr(&mut attrs, "interface", self.interface);
        push_attr(&mut attrs, "connector", self.connector);
        (self.model, self.uuid, attrs)
    }
}

pub(super) fn normalize<M: NestedModel>(
    component: ComponentType,
    nodes: Vec<SeriesNode<M>>,
) -> Vec<CatalogEntry> {
    let mut out = Vec::new();

    for node in nodes {
        for model in node.models {
            let (name, uuid, attrs) = model.into_parts();
            out.extend(entry(
                component,
                node.brand.as_deref(),
                node.series.as_deref(),
                name.as_deref(),
                uuid.as_deref(),
                attrs,
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use crate::document::CatalogDocument;
    use models::ComponentType;
    use pretty_assertions::assert_eq;

    #[test]
    fn expands_motherboard_nodes() {
        let raw = r#"[
            {"brand": "Supermicro", "series": "X11", "models": [
                {"model": "X11DPi-N", "socket": "LGA3647", "memory_slots": 16},
                {"model": "X11SPL-F", "socket": "LGA3647", "memory_slots": 8}
            ]},
            {"brand": "ASRock Rack", "series": "ROMED8", "models": [{"model": "ROMED8-2T"}]}
        ]"#;

        let entries = CatalogDocument::parse(ComponentType::Motherboard, raw)
            .unwrap()
            .normalize();

        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .all(|e| e.component_type == ComponentType::Motherboard));
        assert_eq!(entries[1].model, "X11SPL-F");
        assert_eq!(entries[1].series, "X11");
        assert_eq!(entries[1].attributes["memory_slots"], 8);
        assert!(entries[2].attributes.is_empty());
    }

    #[test]
    fn expands_nic_nodes_and_tolerates_missing_models() {
        let raw = r#"[
            {"brand": "Mellanox", "series": "ConnectX-5", "models": [
                {"model": "MCX516A-CCAT", "ports": 2, "speed": "100GbE", "uuid": "1d6f2a0e-0c3c-4d1a-8d44-0d7c9e2b9a10"}
            ]},
            {"brand": "Intel", "series": "X710"}
        ]"#;

        let entries = CatalogDocument::parse(ComponentType::Nic, raw)
            .unwrap()
            .normalize();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attributes["speed"], "100GbE");
        assert!(entries[0].identifier.is_some());
    }
}
