use models::{Attributes, CatalogEntry, ComponentType};
use serde::Deserialize;
use serde_json::Value;

use super::{entry, push_attr};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CpuBrand {
    pub brand: Option<String>,
    #[serde(default)]
    pub series: Vec<CpuSeries>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CpuSeries {
    #[serde(alias = "series")]
    pub name: Option<String>,
    #[serde(default)]
    pub generation: Option<Value>,
    #[serde(default)]
    pub models: Vec<CpuModel>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CpuModel {
    #[serde(alias = "name")]
    pub model: Option<String>,
    pub cores: Option<Value>,
    pub threads: Option<Value>,
    pub base_frequency: Option<Value>,
    pub max_frequency: Option<Value>,
    pub socket: Option<Value>,
    pub tdp: Option<Value>,
    pub cache: Option<Value>,
    #[serde(alias = "identifier")]
    pub uuid: Option<String>,
}

pub(super) fn normalize(brands: Vec<CpuBrand>) -> Vec<CatalogEntry> {
    let mut out = Vec::new();

    for brand in brands {
        for series in brand.series {
            for model in series.models {
                let mut attrs = Attributes::new();
                push_attr(&mut attrs, "generation", series.generation.clone());
                push_attr(&mut attrs, "cores", model.cores);
                push_attr(&mut attrs, "threads", model.threads);
                push_attr(&mut attrs, "base_frequency", model.base_frequency);
                push_attr(&mut attrs, "max_frequency", model.max_frequency);
                push_attr(&mut attrs, "socket", model.socket);
                push_attr(&mut attrs, "tdp", model.tdp);
                push_attr(&mut attrs, "cache", model.cache);

                out.extend(entry(
                    ComponentType::Cpu,
                    brand.brand.as_deref(),
                    series.name.as_deref(),
                    model.model.as_deref(),
                    model.uuid.as_deref(),
                    attrs,
                ));
            }
        }
    }

    out
}
