use catalog::{ModelOption, SelectionContext};
use serde::{Deserialize, Serialize};

/// How far a selection has been narrowed.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsQuery {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    /// With only a brand, list its models instead of its series.
    #[serde(default)]
    pub models: bool,
}

/// The next level of choices for a selection.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "level", content = "options", rename_all = "lowercase")]
pub enum CatalogOptions {
    Brands(Vec<String>),
    Series(Vec<String>),
    Models(Vec<ModelOption>),
}

impl CatalogOptions {
    pub fn len(&self) -> usize {
        match self {
            Self::Brands(v) | Self::Series(v) => v.len(),
            Self::Models(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn options_in(ctx: &SelectionContext, query: &OptionsQuery) -> CatalogOptions {
    match (given(&query.brand), given(&query.series)) {
        (None, _) => CatalogOptions::Brands(ctx.brands()),
        (Some(brand), Some(series)) => CatalogOptions::Models(ctx.models(brand, Some(series))),
        (Some(brand), None) if query.models => CatalogOptions::Models(ctx.models(brand, None)),
        (Some(brand), None) => CatalogOptions::Series(ctx.series(brand)),
    }
}
