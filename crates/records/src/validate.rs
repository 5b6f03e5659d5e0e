//! Field checks shared by add and update.

use std::net::IpAddr;

use catalog::identity::is_identifier_shaped;
use eui48::MacAddress;
use models::{ComponentStatus, ComponentType, NetworkFields, RecordDetails, RecordPatch};

use crate::InventoryError;

/// Trims `value`, mapping blank strings to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Tri-state counterpart of [`non_blank`]: a blank value clears the column.
fn non_blank_patch(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(non_blank)
}

pub fn serial_number(raw: &str) -> Result<String, InventoryError> {
    let serial = raw.trim();
    if serial.is_empty() {
        return Err(InventoryError::validation("serial number is required"));
    }
    Ok(serial.to_owned())
}

/// Identifiers are stored exactly as given, so only the hyphenated
/// `8-4-4-4-12` form is accepted.
pub fn identifier(raw: &str) -> Result<String, InventoryError> {
    let trimmed = raw.trim();
    if !is_identifier_shaped(trimmed) {
        return Err(InventoryError::validation(format!(
            "invalid identifier `{raw}`: expected xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
        )));
    }
    Ok(trimmed.to_owned())
}

pub fn record_id(id: i64) -> Result<i64, InventoryError> {
    if id <= 0 {
        return Err(InventoryError::validation(format!("invalid record id {id}")));
    }
    Ok(id)
}

fn mac_address(raw: &str) -> Result<(), InventoryError> {
    MacAddress::parse_str(raw)
        .map(|_| ())
        .map_err(|e| InventoryError::validation(format!("invalid MAC address `{raw}`: {e}")))
}

fn ip_address(raw: &str) -> Result<(), InventoryError> {
    raw.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|e| InventoryError::validation(format!("invalid IP address `{raw}`: {e}")))
}

fn network_rejected(component: ComponentType) -> InventoryError {
    InventoryError::validation(format!(
        "MAC address, IP address and network name only apply to nic records, not {component}"
    ))
}

pub fn details(details: RecordDetails) -> RecordDetails {
    RecordDetails {
        server_identifier: non_blank(details.server_identifier),
        location: non_blank(details.location),
        rack_position: non_blank(details.rack_position),
        flag: non_blank(details.flag),
        notes: non_blank(details.notes),
        ..details
    }
}

/// Normalizes the network columns of a new record. Only NICs may carry any.
pub fn network(
    component: ComponentType,
    fields: NetworkFields,
) -> Result<Option<NetworkFields>, InventoryError> {
    let fields = NetworkFields {
        mac_address: non_blank(fields.mac_address),
        ip_address: non_blank(fields.ip_address),
        network_name: non_blank(fields.network_name),
    };

    if !component.has_network_fields() {
        if !fields.is_empty() {
            return Err(network_rejected(component));
        }
        return Ok(None);
    }

    if let Some(mac) = &fields.mac_address {
        mac_address(mac)?;
    }
    if let Some(ip) = &fields.ip_address {
        ip_address(ip)?;
    }

    Ok(Some(fields))
}

/// Normalizes the text columns of `patch` and checks the ones that have a
/// format.
pub fn patch(component: ComponentType, patch: RecordPatch) -> Result<RecordPatch, InventoryError> {
    if patch.is_empty() {
        return Err(InventoryError::validation(
            "an update must name at least one field",
        ));
    }
    if !component.has_network_fields() && patch.touches_network() {
        return Err(network_rejected(component));
    }

    let patch = RecordPatch {
        server_identifier: non_blank_patch(patch.server_identifier),
        location: non_blank_patch(patch.location),
        rack_position: non_blank_patch(patch.rack_position),
        flag: non_blank_patch(patch.flag),
        notes: non_blank_patch(patch.notes),
        mac_address: non_blank_patch(patch.mac_address),
        ip_address: non_blank_patch(patch.ip_address),
        network_name: non_blank_patch(patch.network_name),
        ..patch
    };

    if let Some(Some(mac)) = &patch.mac_address {
        mac_address(mac)?;
    }
    if let Some(Some(ip)) = &patch.ip_address {
        ip_address(ip)?;
    }

    Ok(patch)
}

pub fn server_requirement(
    status: ComponentStatus,
    server_assigned: bool,
) -> Result<(), InventoryError> {
    if status.requires_server() && !server_assigned {
        return Err(InventoryError::validation(
            "a server identifier is required when status is in_use",
        ));
    }
    Ok(())
}
