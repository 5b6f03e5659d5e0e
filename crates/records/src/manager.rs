use std::sync::Arc;

use catalog::{Catalog, CatalogLoader, SelectionContext};
use chrono::Utc;
use dal::InventoryStore;
use models::{
    ComponentStatus, ComponentType, CustomFields, InventoryRecord, NewRecord, Page, RecordPage,
    RecordPatch,
};
use settings::InventoryConfig;

use crate::{
    options::{options_in, CatalogOptions, OptionsQuery},
    validate, AddRecordRequest, AddedRecord, InventoryError,
};

/// Create/read/update/delete of inventory records for every component type.
///
/// Holds no per-request state: each call loads what it needs from the store
/// and, for selections, a fresh [`SelectionContext`].
#[derive(Clone)]
pub struct InventoryManager {
    store: Arc<dyn InventoryStore>,
    catalogs: CatalogLoader,
    config: InventoryConfig,
}

impl InventoryManager {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        catalogs: CatalogLoader,
        config: InventoryConfig,
    ) -> Self {
        Self {
            store,
            catalogs,
            config,
        }
    }

    pub fn catalogs(&self) -> &CatalogLoader {
        &self.catalogs
    }

    /// A selection context over the current catalog of `component`. The
    /// document is read on the blocking pool.
    pub async fn selection(&self, component: ComponentType) -> SelectionContext {
        let loader = self.catalogs.clone();
        match tokio::task::spawn_blocking(move || SelectionContext::load(&loader, component)).await
        {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!("loading the {component} catalog failed, using an empty catalog: {e}");
                SelectionContext::new(Catalog::empty(component), Utc::now())
            }
        }
    }

    fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Page, InventoryError> {
        let limit = limit.unwrap_or(self.config.default_page_size);
        let offset = offset.unwrap_or(0);

        if !(1..=self.config.max_page_size).contains(&limit) {
            return Err(InventoryError::validation(format!(
                "limit must be between 1 and {}",
                self.config.max_page_size
            )));
        }
        if offset < 0 {
            return Err(InventoryError::validation("offset must not be negative"));
        }

        Ok(Page::new(limit, offset))
    }

    pub async fn list(
        &self,
        component: ComponentType,
        status: Option<ComponentStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<RecordPage, InventoryError> {
        let page = self.page(limit, offset)?;
        tracing::info!(
            "listing {component} records (status: {status:?}, limit: {}, offset: {})",
            page.limit,
            page.offset
        );

        let (records, total) = self
            .store
            .list(component, status, page)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?;

        Ok(RecordPage::new(records, total, page))
    }

    pub async fn get(
        &self,
        component: ComponentType,
        id: i64,
    ) -> Result<InventoryRecord, InventoryError> {
        let id = validate::record_id(id)?;
        tracing::info!("fetching {component} record {id}");

        self.store
            .get(component, id)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?
            .ok_or(InventoryError::NotFound { component, id })
    }

    pub async fn options(&self, component: ComponentType, query: &OptionsQuery) -> CatalogOptions {
        tracing::info!("catalog options for {component}: {query:?}");
        let options = options_in(&self.selection(component).await, query);
        if options.is_empty() {
            tracing::debug!("no {component} catalog options match {query:?}");
        }
        options
    }

    pub async fn add(
        &self,
        component: ComponentType,
        request: AddRecordRequest,
    ) -> Result<AddedRecord, InventoryError> {
        let ctx = self.selection(component).await;
        self.add_with(&ctx, request).await
    }

    /// Adds a record, resolving catalog selections and custom specifications
    /// against `ctx`.
    pub async fn add_with(
        &self,
        ctx: &SelectionContext,
        request: AddRecordRequest,
    ) -> Result<AddedRecord, InventoryError> {
        let component = ctx.component_type();

        let serial_number = validate::serial_number(&request.serial_number)?;
        let mut details = validate::details(request.details());
        validate::server_requirement(request.status, details.server_identifier.is_some())?;
        let network = validate::network(component, request.network())?;

        let (identifier, description) = Self::identify(ctx, &request)?;
        if let Some(description) = description {
            details.notes = Some(match details.notes.take() {
                Some(notes) => format!("{notes}\n{description}"),
                None => description,
            });
        }

        let exists = self
            .store
            .serial_exists(component, &serial_number)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?;
        if exists {
            return Err(InventoryError::Conflict(format!(
                "a {component} with serial number `{serial_number}` already exists"
            )));
        }

        let record = NewRecord {
            identifier,
            serial_number,
            status: request.status,
            details,
            network,
        };

        let id = self
            .store
            .insert(component, &record)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?;

        tracing::info!(
            "added {component} record {id} (serial `{}`, identifier {})",
            record.serial_number,
            record.identifier
        );

        Ok(AddedRecord {
            id,
            identifier: record.identifier,
        })
    }

    /// Picks the identifier for a new record, plus the description of a
    /// custom specification when one was used.
    fn identify(
        ctx: &SelectionContext,
        request: &AddRecordRequest,
    ) -> Result<(String, Option<String>), InventoryError> {
        let component = ctx.component_type();

        if let Some(explicit) = validate::non_blank(request.identifier.clone()) {
            return Ok((validate::identifier(&explicit)?, None));
        }

        if let Some(raw) = &request.custom {
            let spec = ctx.specify(CustomFields::parse(component, raw)?)?;
            let description = spec.description();
            return Ok((spec.identifier, Some(description)));
        }

        if let Some(selection) = &request.selection {
            let picked = ctx.resolve(selection).ok_or_else(|| {
                InventoryError::validation(format!(
                    "{} {} is not in the {component} catalog",
                    selection.brand.trim(),
                    selection.model.trim()
                ))
            })?;
            return Ok((picked.identifier, None));
        }

        Ok((uuid::Uuid::new_v4().to_string(), None))
    }

    pub async fn update(
        &self,
        component: ComponentType,
        id: i64,
        patch: RecordPatch,
    ) -> Result<InventoryRecord, InventoryError> {
        let id = validate::record_id(id)?;
        let patch = validate::patch(component, patch)?;

        let current = self.get(component, id).await?;

        if let Some(next) = patch.status {
            let policy = self.config.transition_policy();
            if !current.status.can_transition_to(next, policy) {
                return Err(InventoryError::validation(format!(
                    "a {component} cannot move from {} to {next}",
                    current.status
                )));
            }
        }

        let merged = current.patched(&patch);
        validate::server_requirement(merged.status, merged.server_assigned())?;

        let updated = self
            .store
            .update(component, id, &patch)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?;
        if !updated {
            return Err(InventoryError::NotFound { component, id });
        }

        tracing::info!("updated {component} record {id}");
        self.get(component, id).await
    }

    pub async fn delete(&self, component: ComponentType, id: i64) -> Result<(), InventoryError> {
        let id = validate::record_id(id)?;

        let deleted = self
            .store
            .delete(component, id)
            .await
            .map_err(|e| InventoryError::from_store(component, e))?;
        if !deleted {
            return Err(InventoryError::NotFound { component, id });
        }

        tracing::info!("deleted {component} record {id}");
        Ok(())
    }
}
