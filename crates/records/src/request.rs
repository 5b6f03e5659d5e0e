use catalog::CatalogSelection;
use chrono::NaiveDate;
use models::{ComponentStatus, NetworkFields, RecordDetails};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of an add call.
///
/// The identifier is taken from, in order: `identifier`, the specification
/// in `custom`, the catalog model named by `selection`, and finally a fresh
/// random UUID.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct AddRecordRequest {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub status: ComponentStatus,

    #[serde(default)]
    pub server_identifier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rack_position: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub installation_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,

    /// Catalog model the unit is an instance of.
    #[serde(default)]
    pub selection: Option<CatalogSelection>,
    /// Field object of a catalog-less configuration (ram, storage, caddy).
    #[serde(default)]
    pub custom: Option<Value>,
}

impl AddRecordRequest {
    pub fn details(&self) -> RecordDetails {
        RecordDetails {
            server_identifier: self.server_identifier.clone(),
            location: self.location.clone(),
            rack_position: self.rack_position.clone(),
            purchase_date: self.purchase_date,
            installation_date: self.installation_date,
            warranty_end_date: self.warranty_end_date,
            flag: self.flag.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn network(&self) -> NetworkFields {
        NetworkFields {
            mac_address: self.mac_address.clone(),
            ip_address: self.ip_address.clone(),
            network_name: self.network_name.clone(),
        }
    }
}

/// What an add call hands back.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AddedRecord {
    pub id: i64,
    pub identifier: String,
}
