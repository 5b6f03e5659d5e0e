use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use models::{
    ComponentStatus, ComponentType, InventoryRecord, NetworkFields, NewRecord, Page, PatchValue,
    RecordDetails, RecordPatch,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::{InventoryStore, StoreError};

const BASE_COLUMNS: &str = "id, identifier, serial_number, status, server_identifier, location, \
     rack_position, purchase_date, installation_date, warranty_end_date, flag, notes, \
     created_at, updated_at";

const NETWORK_COLUMNS: &str = "mac_address, ip_address, network_name";

const NO_NETWORK_COLUMNS: &str =
    "NULL::TEXT AS mac_address, NULL::TEXT AS ip_address, NULL::TEXT AS network_name";

#[derive(Debug, FromRow)]
struct RecordRow {
    id: i64,
    identifier: String,
    serial_number: String,
    status: ComponentStatus,
    server_identifier: Option<String>,
    location: Option<String>,
    rack_position: Option<String>,
    purchase_date: Option<NaiveDate>,
    installation_date: Option<NaiveDate>,
    warranty_end_date: Option<NaiveDate>,
    flag: Option<String>,
    notes: Option<String>,
    mac_address: Option<String>,
    ip_address: Option<String>,
    network_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecordRow {
    fn into_record(self, component: ComponentType) -> InventoryRecord {
        let network = component.has_network_fields().then(|| NetworkFields {
            mac_address: self.mac_address,
            ip_address: self.ip_address,
            network_name: self.network_name,
        });

        InventoryRecord {
            id: self.id,
            identifier: self.identifier,
            serial_number: self.serial_number,
            status: self.status,
            details: RecordDetails {
                server_identifier: self.server_identifier,
                location: self.location,
                rack_position: self.rack_position,
                purchase_date: self.purchase_date,
                installation_date: self.installation_date,
                warranty_end_date: self.warranty_end_date,
                flag: self.flag,
                notes: self.notes,
            },
            network,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn select_columns(component: ComponentType) -> String {
    let network = if component.has_network_fields() {
        NETWORK_COLUMNS
    } else {
        NO_NETWORK_COLUMNS
    };
    format!("{BASE_COLUMNS}, {network}")
}

/// [`InventoryStore`] over the PostgreSQL tables created by `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list(
        &self,
        component: ComponentType,
        status: Option<ComponentStatus>,
        page: Page,
    ) -> Result<(Vec<InventoryRecord>, i64), StoreError> {
        let table = component.table_name();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE ($1::component_status IS NULL OR status = $1)"
        ))
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::sqlx(format!("counting {component} records"), e))?;

        let rows: Vec<RecordRow> = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {}
            FROM {table}
            WHERE ($1::component_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            select_columns(component)
        ))
        .bind(status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::sqlx(format!("listing {component} records"), e))?;

        let records = rows
            .into_iter()
            .map(|row| row.into_record(component))
            .collect();

        Ok((records, total))
    }

    async fn get(
        &self,
        component: ComponentType,
        id: i64,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        let row: Option<RecordRow> = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns(component),
            component.table_name()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::sqlx(format!("fetching {component} record {id}"), e))?;

        Ok(row.map(|row| row.into_record(component)))
    }

    async fn serial_exists(
        &self,
        component: ComponentType,
        serial_number: &str,
    ) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE serial_number = $1)",
            component.table_name()
        ))
        .bind(serial_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            StoreError::sqlx(
                format!("checking {component} serial number `{serial_number}`"),
                e,
            )
        })
    }

    async fn insert(
        &self,
        component: ComponentType,
        record: &NewRecord,
    ) -> Result<i64, StoreError> {
        let with_network = component.has_network_fields();
        let details = &record.details;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (identifier, serial_number, status, server_identifier, location, \
             rack_position, purchase_date, installation_date, warranty_end_date, flag, notes",
            component.table_name()
        ));
        if with_network {
            qb.push(", ");
            qb.push(NETWORK_COLUMNS);
        }
        qb.push(") VALUES (");

        let mut values = qb.separated(", ");
        values.push_bind(record.identifier.clone());
        values.push_bind(record.serial_number.clone());
        values.push_bind(record.status);
        values.push_bind(details.server_identifier.clone());
        values.push_bind(details.location.clone());
        values.push_bind(details.rack_position.clone());
        values.push_bind(details.purchase_date);
        values.push_bind(details.installation_date);
        values.push_bind(details.warranty_end_date);
        values.push_bind(details.flag.clone());
        values.push_bind(details.notes.clone());
        if with_network {
            let network = record.network.clone().unwrap_or_default();
            values.push_bind(network.mac_address);
            values.push_bind(network.ip_address);
            values.push_bind(network.network_name);
        }
        values.push_unseparated(") RETURNING id");

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StoreError::sqlx(
                    format!("inserting {component} record `{}`", record.serial_number),
                    e,
                )
            })
    }

    async fn update(
        &self,
        component: ComponentType,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<bool, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", component.table_name()));

        {
            let mut set = qb.separated(", ");
            for (column, value) in patch.columns() {
                set.push(column);
                set.push_unseparated(" = ");
                match value {
                    PatchValue::Status(status) => set.push_bind_unseparated(status),
                    PatchValue::Text(text) => set.push_bind_unseparated(text),
                    PatchValue::Date(date) => set.push_bind_unseparated(date),
                };
            }
            set.push("updated_at = now()");
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::sqlx(format!("updating {component} record {id}"), e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, component: ComponentType, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", component.table_name()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::sqlx(format!("deleting {component} record {id}"), e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_nic_selects_real_network_columns() {
        assert!(select_columns(ComponentType::Nic).ends_with(NETWORK_COLUMNS));
        for component in [
            ComponentType::Cpu,
            ComponentType::Ram,
            ComponentType::Motherboard,
            ComponentType::Storage,
            ComponentType::Caddy,
        ] {
            assert!(select_columns(component).ends_with(NO_NETWORK_COLUMNS));
        }
    }

    #[test]
    fn network_fields_dropped_for_other_types() {
        let now = Utc::now();
        let row = || RecordRow {
            id: 1,
            identifier: "00000000-0000-4000-0000-000000000001".into(),
            serial_number: "SN".into(),
            status: ComponentStatus::Available,
            server_identifier: None,
            location: None,
            rack_position: None,
            purchase_date: None,
            installation_date: None,
            warranty_end_date: None,
            flag: None,
            notes: None,
            mac_address: Some("00:1b:21:aa:bb:cc".into()),
            ip_address: None,
            network_name: None,
            created_at: now,
            updated_at: now,
        };

        assert!(row().into_record(ComponentType::Cpu).network.is_none());
        assert_eq!(
            row()
                .into_record(ComponentType::Nic)
                .network
                .and_then(|n| n.mac_address)
                .as_deref(),
            Some("00:1b:21:aa:bb:cc")
        );
    }
}
