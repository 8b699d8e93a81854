//! Catalog authoring and publication.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SurveyEngine;
use crate::{
    display::CatalogSummaries,
    error::{Result, SurveyError},
    models::{Catalog, CatalogFilter, CatalogSummary, Survey},
    params::{
        ApplySettings, AssignModules, CreateCatalog, Id, ListCatalogs, SetEmailTemplate,
        SetTicketsActive,
    },
    queue::enqueue_ticket_creations,
};

/// Result of publishing a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub catalog: Catalog,
    /// Ticket-create work items put on the queue
    pub enqueued: usize,
}

impl SurveyEngine {
    /// Creates an empty draft catalog for a company.
    pub async fn create_catalog(&self, params: &CreateCatalog) -> Result<Catalog> {
        params.validate()?;
        let catalog = Catalog::new(params.name.trim(), params.company_id, Timestamp::now());

        self.with_database(move |db| {
            if db.get_company(catalog.company_id)?.is_none() {
                return Err(SurveyError::CompanyNotFound {
                    id: catalog.company_id,
                });
            }
            db.save_catalog(&catalog)?;
            Ok(catalog)
        })
        .await
    }

    /// Retrieves a catalog by its ID.
    pub async fn get_catalog(&self, params: &Id) -> Result<Option<Catalog>> {
        let id = params.id;
        self.with_database(move |db| db.get_catalog(id)).await
    }

    /// Lists catalogs, newest first.
    pub async fn list_catalogs(&self, filter: Option<CatalogFilter>) -> Result<Vec<Catalog>> {
        self.with_database(move |db| db.list_catalogs(filter.as_ref()))
            .await
    }

    /// Lists catalogs as summaries for display.
    pub async fn list_catalogs_summary(&self, params: &ListCatalogs) -> Result<CatalogSummaries> {
        let catalogs = self.list_catalogs(Some(CatalogFilter::from(params))).await?;
        let summaries: Vec<CatalogSummary> = catalogs.iter().map(Into::into).collect();
        Ok(CatalogSummaries(summaries))
    }

    /// Copies published modules into the plans of one phase.
    ///
    /// The modules are copied by value; later edits of a module do not reach
    /// the catalog.
    pub async fn assign_modules(&self, params: &AssignModules) -> Result<Catalog> {
        let params = params.clone();
        self.with_database(move |db| {
            let mut catalog = load_catalog(db, params.catalog_id)?;
            catalog.ensure_draft()?;

            let mut survey = Survey::default();
            for module_id in &params.module_ids {
                let module = db
                    .get_module(*module_id)?
                    .ok_or(SurveyError::ModuleNotFound { id: *module_id })?;
                if module.is_draft {
                    return Err(SurveyError::ModuleIsDraft { id: module.id });
                }
                if module.company_id != catalog.company_id {
                    return Err(SurveyError::invalid_input("module_ids").with_reason(format!(
                        "module {} belongs to another company",
                        module.id
                    )));
                }
                survey.modules.push(module);
            }

            catalog.assign_survey(params.plan_type, survey)?;
            catalog.updated_at = Timestamp::now();
            db.save_catalog(&catalog)?;
            Ok(catalog)
        })
        .await
    }

    /// Validates and applies schedule settings to a draft catalog.
    ///
    /// Nothing is persisted when any phase fails validation.
    pub async fn apply_settings(&self, params: &ApplySettings) -> Result<Catalog> {
        let params = params.clone();
        self.with_database(move |db| {
            let mut catalog = load_catalog(db, params.catalog_id)?;
            let now = Timestamp::now();
            catalog.apply_settings(params.settings, now)?;
            catalog.updated_at = now;
            db.save_catalog(&catalog)?;
            Ok(catalog)
        })
        .await
    }

    /// Links or unlinks the invitation email template.
    pub async fn set_email_template(&self, params: &SetEmailTemplate) -> Result<Catalog> {
        let (catalog_id, template_id) = (params.catalog_id, params.template_id);
        self.with_database(move |db| {
            let mut catalog = load_catalog(db, catalog_id)?;
            catalog.email_template_id = template_id;
            catalog.updated_at = Timestamp::now();
            db.save_catalog(&catalog)?;
            Ok(catalog)
        })
        .await
    }

    /// Publishes a draft catalog and fans out ticket creation.
    ///
    /// Templates are built, notifications linked to them and the catalog
    /// flipped out of draft in one save. That save is the commit point: an
    /// enqueue failure afterwards is returned but the catalog stays
    /// published, and items enqueued before the failure stay queued.
    pub async fn publish_catalog(&self, params: &Id) -> Result<PublishOutcome> {
        let catalog_id = params.id;
        self.with_database(move |db| {
            let mut catalog = load_catalog(db, catalog_id)?;
            catalog.ensure_draft()?;

            catalog.build_templates()?;
            catalog.is_draft = false;
            catalog.updated_at = Timestamp::now();
            db.save_catalog(&catalog)?;
            log::info!(
                "Published catalog {catalog_id} with {} wave(s)",
                catalog.ticket_todos.len()
            );

            let participant_ids: Vec<_> = db
                .list_participants(catalog.company_id, true)?
                .into_iter()
                .map(|p| p.id)
                .collect();
            let enqueued = enqueue_ticket_creations(&*db, catalog_id, &participant_ids)?;
            log::info!("Enqueued {enqueued} ticket creation(s) for catalog {catalog_id}");

            Ok(PublishOutcome { catalog, enqueued })
        })
        .await
    }

    /// Deletes a catalog and its tickets.
    ///
    /// Refused while the catalog is active or done.
    pub async fn delete_catalog(&self, params: &Id) -> Result<Catalog> {
        let catalog_id = params.id;
        self.with_database(move |db| {
            let catalog = load_catalog(db, catalog_id)?;
            if catalog.is_active || catalog.is_done {
                return Err(SurveyError::CatalogStillActive { id: catalog_id });
            }
            db.delete_catalog(catalog_id)?;
            log::info!("Deleted catalog {catalog_id}");
            Ok(catalog)
        })
        .await
    }

    /// Enables or disables every ticket of a published catalog.
    ///
    /// Disabling marks the catalog done. Returns the number of tickets that
    /// changed.
    pub async fn set_catalog_tickets_active(&self, params: &SetTicketsActive) -> Result<usize> {
        let (catalog_id, active) = (params.catalog_id, params.active);
        self.with_database(move |db| {
            let mut catalog = load_catalog(db, catalog_id)?;
            if catalog.is_draft {
                return Err(SurveyError::invalid_input("catalog_id")
                    .with_reason("draft catalogs have no tickets"));
            }

            let now = Timestamp::now();
            catalog.is_active = active;
            if !active {
                catalog.is_done = true;
            }
            catalog.updated_at = now;
            db.save_catalog(&catalog)?;

            let changed = db.set_tickets_active(catalog_id, active, now)?;
            log::info!(
                "{} {changed} ticket(s) of catalog {catalog_id}",
                if active { "Activated" } else { "Deactivated" }
            );
            Ok(changed)
        })
        .await
    }
}

pub(crate) fn load_catalog(db: &crate::db::Database, id: uuid::Uuid) -> Result<Catalog> {
    db.get_catalog(id)?
        .ok_or(SurveyError::CatalogNotFound { id })
}
