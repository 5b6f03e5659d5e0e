use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{InventoryRecord, NetworkFields};
use crate::ComponentStatus;

/// Partial update of the editable fields of a record.
///
/// Every nullable field is tri-state: absent leaves the column alone, `null`
/// clears it, a value overwrites it. `identifier` and `serial_number` are not
/// part of the editable set, so naming them is a deserialization error.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ComponentStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub server_identifier: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub location: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub rack_position: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub purchase_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub installation_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub warranty_end_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub flag: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub mac_address: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub ip_address: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub network_name: Option<Option<String>>,
}

/// Column value handed to the store when writing a patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchValue {
    Status(ComponentStatus),
    Text(Option<String>),
    Date(Option<NaiveDate>),
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }

    pub fn touches_network(&self) -> bool {
        self.mac_address.is_some() || self.ip_address.is_some() || self.network_name.is_some()
    }

    /// The columns this patch writes, in a fixed order.
    pub fn columns(&self) -> Vec<(&'static str, PatchValue)> {
        let mut cols = Vec::new();

        if let Some(status) = self.status {
            cols.push(("status", PatchValue::Status(status)));
        }

        let text = [
            ("server_identifier", &self.server_identifier),
            ("location", &self.location),
            ("rack_position", &self.rack_position),
        ];
        for (name, value) in text {
            if let Some(v) = value {
                cols.push((name, PatchValue::Text(v.clone())));
            }
        }

        let dates = [
            ("purchase_date", &self.purchase_date),
            ("installation_date", &self.installation_date),
            ("warranty_end_date", &self.warranty_end_date),
        ];
        for (name, value) in dates {
            if let Some(v) = value {
                cols.push((name, PatchValue::Date(*v)));
            }
        }

        let text = [
            ("flag", &self.flag),
            ("notes", &self.notes),
            ("mac_address", &self.mac_address),
            ("ip_address", &self.ip_address),
            ("network_name", &self.network_name),
        ];
        for (name, value) in text {
            if let Some(v) = value {
                cols.push((name, PatchValue::Text(v.clone())));
            }
        }

        cols
    }

    /// Writes the patch onto an in-memory record. Timestamps are left to the
    /// caller.
    pub fn apply(&self, record: &mut InventoryRecord) {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<Option<T>>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        if let Some(status) = self.status {
            record.status = status;
        }

        let d = &mut record.details;
        set(&mut d.server_identifier, &self.server_identifier);
        set(&mut d.location, &self.location);
        set(&mut d.rack_position, &self.rack_position);
        set(&mut d.purchase_date, &self.purchase_date);
        set(&mut d.installation_date, &self.installation_date);
        set(&mut d.warranty_end_date, &self.warranty_end_date);
        set(&mut d.flag, &self.flag);
        set(&mut d.notes, &self.notes);

        if self.touches_network() {
            let net = record.network.get_or_insert_with(NetworkFields::default);
            set(&mut net.mac_address, &self.mac_address);
            set(&mut net.ip_address, &self.ip_address);
            set(&mut net.network_name, &self.network_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordDetails;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn record() -> InventoryRecord {
        let now = Utc::now();
        InventoryRecord {
            id: 1,
            identifier: "00000000-0000-4000-0000-000000000001".into(),
            serial_number: "SN-1".into(),
            status: ComponentStatus::Available,
            details: RecordDetails {
                location: Some("DC1".into()),
                notes: Some("spare".into()),
                ..Default::default()
            },
            network: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let patch: RecordPatch =
            serde_json::from_str(r#"{"location": null, "flag": "red"}"#).unwrap();

        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.flag, Some(Some("red".to_string())));
        assert_eq!(patch.notes, None);

        let next = record().patched(&patch);
        assert_eq!(next.details.location, None);
        assert_eq!(next.details.flag.as_deref(), Some("red"));
        assert_eq!(next.details.notes.as_deref(), Some("spare"));
    }

    #[test]
    fn rejects_immutable_fields() {
        let err = serde_json::from_str::<RecordPatch>(r#"{"serial_number": "X"}"#).unwrap_err();
        assert!(err.to_string().contains("serial_number"));

        let err = serde_json::from_str::<RecordPatch>(r#"{"identifier": "X"}"#).unwrap_err();
        assert!(err.to_string().contains("identifier"));
    }

    #[test]
    fn empty_patch_has_no_columns() {
        let patch: RecordPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn columns_follow_fixed_order() {
        let patch = RecordPatch {
            notes: Some(None),
            status: Some(ComponentStatus::Failed),
            purchase_date: Some(NaiveDate::from_ymd_opt(2024, 1, 2)),
            ..Default::default()
        };
        let names: Vec<_> = patch.columns().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["status", "purchase_date", "notes"]);
    }

    #[test]
    fn network_patch_creates_network_fields() {
        let patch = RecordPatch {
            ip_address: Some(Some("10.0.0.4".into())),
            ..Default::default()
        };
        let next = record().patched(&patch);
        assert_eq!(
            next.network.and_then(|n| n.ip_address).as_deref(),
            Some("10.0.0.4")
        );
    }
}
