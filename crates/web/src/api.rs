//! The single `/api/components` endpoint. The operation is picked by the
//! `action` query parameter and the component type by `type`.

use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use models::{ComponentStatus, ComponentType, RecordPatch};
use records::{parse_component_type, AddRecordRequest, OptionsQuery};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::{ApiFailure, AppState, Envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    List,
    Options,
    Get,
    Add,
    Update,
    Delete,
}

impl Action {
    /// Actions that change the inventory must be sent as POST.
    fn mutates(self) -> bool {
        matches!(self, Self::Add | Self::Update | Self::Delete)
    }
}

/// Query string of a call. Everything is read as text so that malformed
/// values are reported in the envelope rather than as a bare rejection.
#[derive(Deserialize, Debug, Default)]
pub struct ApiQuery {
    action: Option<String>,
    #[serde(rename = "type")]
    component_type: Option<String>,
    id: Option<String>,
    status: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
    brand: Option<String>,
    series: Option<String>,
    models: Option<String>,
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn number(name: &str, value: &Option<String>) -> Result<Option<i64>, ApiFailure> {
    given(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| ApiFailure::bad_request(format!("`{name}` must be an integer, got `{raw}`")))
        })
        .transpose()
}

fn record_id(query: &ApiQuery) -> Result<i64, ApiFailure> {
    number("id", &query.id)?.ok_or_else(|| ApiFailure::bad_request("a record id is required"))
}

fn status_filter(query: &ApiQuery) -> Result<Option<ComponentStatus>, ApiFailure> {
    given(&query.status)
        .map(|raw| {
            ComponentStatus::from_str(raw)
                .map_err(|_| ApiFailure::bad_request(format!("unknown status `{raw}`")))
        })
        .transpose()
}

fn flag(value: &Option<String>) -> bool {
    matches!(given(value), Some("true" | "1" | "yes"))
}

fn body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ApiFailure> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiFailure::bad_request("a JSON request body is required"));
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ApiFailure::bad_request(format!("invalid request body: {e}")))
}

fn data(value: impl Serialize) -> Result<Value, ApiFailure> {
    serde_json::to_value(value).map_err(ApiFailure::opaque)
}

pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<ApiQuery>, QueryRejection>,
    payload: Bytes,
) -> Response {
    let outcome = match query {
        Ok(Query(query)) => handle(&state, &method, &query, &payload).await,
        Err(rejection) => Err(ApiFailure::bad_request(format!(
            "invalid query string: {rejection}"
        ))),
    };

    match outcome {
        Ok(envelope) => envelope.into_response(),
        Err(failure) => failure.into_response(),
    }
}

async fn handle(
    state: &AppState,
    method: &Method,
    query: &ApiQuery,
    payload: &Bytes,
) -> Result<Envelope, ApiFailure> {
    let action = given(&query.action)
        .ok_or_else(|| ApiFailure::bad_request("an action is required"))?;
    let action = Action::from_str(action)
        .map_err(|_| ApiFailure::bad_request(format!("unknown action `{action}`")))?;

    let component: ComponentType =
        parse_component_type(query.component_type.as_deref().unwrap_or_default())?;

    if action.mutates() && *method != Method::POST {
        return Err(ApiFailure::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("{action} requires POST"),
        ));
    }

    tracing::info!("{method} action={action} type={component}");
    let manager = &state.manager;

    match action {
        Action::List => {
            let page = manager
                .list(
                    component,
                    status_filter(query)?,
                    number("limit", &query.limit)?,
                    number("offset", &query.offset)?,
                )
                .await?;
            Ok(Envelope::ok(
                StatusCode::OK,
                format!("found {} {component} records", page.total),
                data(page)?,
            ))
        }
        Action::Options => {
            let options = manager
                .options(
                    component,
                    &OptionsQuery {
                        brand: query.brand.clone(),
                        series: query.series.clone(),
                        models: flag(&query.models),
                    },
                )
                .await;
            Ok(Envelope::ok(
                StatusCode::OK,
                format!("{} {component} options", options.len()),
                data(options)?,
            ))
        }
        Action::Get => {
            let record = manager.get(component, record_id(query)?).await?;
            Ok(Envelope::ok(
                StatusCode::OK,
                format!("{component} record {}", record.id),
                data(record)?,
            ))
        }
        Action::Add => {
            let request: AddRecordRequest = body(payload)?;
            let added = manager.add(component, request).await?;
            Ok(Envelope::ok(
                StatusCode::CREATED,
                format!("{} added", component.label()),
                data(added)?,
            ))
        }
        Action::Update => {
            let id = record_id(query)?;
            let patch: RecordPatch = body(payload)?;
            let record = manager.update(component, id, patch).await?;
            Ok(Envelope::ok(
                StatusCode::OK,
                format!("{} updated", component.label()),
                data(record)?,
            ))
        }
        Action::Delete => {
            let id = record_id(query)?;
            manager.delete(component, id).await?;
            Ok(Envelope::ok(
                StatusCode::OK,
                format!("{} deleted", component.label()),
                Value::Null,
            ))
        }
    }
}
