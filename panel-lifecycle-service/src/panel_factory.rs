use chrono::Utc;
use panel_lifecycle_api::barcode;
use panel_lifecycle_api::cancel::CancellationToken;
use panel_lifecycle_api::domain::PanelView;
use panel_lifecycle_api::error::{LifecycleError, LifecycleResult};
use panel_lifecycle_db::models::PanelModel;
use sqlx::Database;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::audit_trail::AuditTrailRecorder;
use crate::repositories::LifecycleRepositories;
use crate::transition::PanelWriter;

/// Creates the panels of a box and binds barcodes to them.
pub struct PanelFactory<DB: Database> {
    repos: LifecycleRepositories<DB>,
    recorder: AuditTrailRecorder<DB>,
    writer: PanelWriter<DB>,
}

impl<DB: Database> PanelFactory<DB> {
    pub fn new(repos: LifecycleRepositories<DB>, recorder: AuditTrailRecorder<DB>) -> Self {
        Self {
            writer: PanelWriter::new(repos.clone(), recorder.clone()),
            repos,
            recorder,
        }
    }

    /// Clones the project's panel type list into the box: `quantity` panels
    /// per type, named `"{type name} {n}"`, each with a generated barcode
    /// and one `Created` audit record.
    #[instrument(skip(self, cancel))]
    pub async fn create_panels_for_box(
        &self,
        box_id: Uuid,
        project_code: &str,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Vec<PanelView>> {
        cancel.check("before panel creation")?;
        let owner = self
            .repos
            .boxes
            .load_for_share(box_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Box with ID {box_id} not found")))?;
        if owner.is_dispatched() {
            warn!(%box_id, "Panel creation rejected, box is dispatched");
            return Err(LifecycleError::box_dispatched("create"));
        }
        if !self.repos.panels.find_by_parent_id(box_id).await?.is_empty() {
            return Err(LifecycleError::PreconditionFailed(format!(
                "Box {box_id} already has panels"
            )));
        }

        let templates = self
            .repos
            .panel_types
            .find_by_parent_id(owner.project_id)
            .await?;
        let now = Utc::now();
        let mut created = Vec::new();
        for template in &templates {
            for n in 1..=template.quantity.max(1) {
                let name = format!("{} {n}", template.name);
                let panel = PanelModel::new(box_id, Some(template.id), &name, actor_id, now)?;
                let panel = panel.with_barcode(&barcode::generate(panel.id, project_code)?)?;
                let record = self.recorder.prepare_created(
                    &panel,
                    actor_id,
                    Some("Panel created from panel type"),
                )?;
                let saved = self
                    .repos
                    .panels
                    .create_batch(vec![panel], record.as_ref().map(|r| r.id))
                    .await?;
                if let Some(record) = record {
                    self.recorder.save(record).await?;
                }
                created.extend(saved.iter().map(PanelModel::to_view));
            }
        }
        info!(%box_id, panels = created.len(), "Panels created for box");
        Ok(created)
    }

    /// Binds a generated barcode to a panel that has none yet.
    #[instrument(skip(self, cancel))]
    pub async fn assign_barcode(
        &self,
        panel_id: Uuid,
        project_code: &str,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView> {
        cancel.check("before barcode assignment")?;
        let locked = self.writer.lock(panel_id).await?;
        if locked.owner.is_dispatched() {
            return Err(LifecycleError::box_dispatched("assign barcode to"));
        }

        let before = &locked.panel;
        let after = before.with_barcode(&barcode::generate(panel_id, project_code)?)?;
        let record = self
            .recorder
            .prepare_modified(before, &after, actor_id, Some("Barcode assigned"))?;
        let mut updated = self
            .repos
            .panels
            .update_batch(vec![after], record.as_ref().map(|r| r.id))
            .await?;
        let panel = updated
            .pop()
            .ok_or_else(|| LifecycleError::Storage("Panel update returned no row".to_string()))?;
        if let Some(record) = record {
            self.recorder.save(record).await?;
        }
        info!(%panel_id, barcode = ?panel.barcode, "Barcode assigned");
        Ok(panel.to_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Fixture, InMemoryStore, PROJECT_CODE};
    use heapless::String as HeaplessString;
    use panel_lifecycle_api::domain::{AuditAction, PanelStatus};
    use panel_lifecycle_db::models::PanelTypeModel;

    fn factory(store: &InMemoryStore) -> PanelFactory<sqlx::Postgres> {
        PanelFactory::new(store.repositories(), store.recorder())
    }

    fn panel_type(project_id: Uuid, name: &str, quantity: i32) -> PanelTypeModel {
        PanelTypeModel {
            id: Uuid::new_v4(),
            project_id,
            name: HeaplessString::try_from(name).unwrap(),
            width_mm: None,
            height_mm: None,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_box_panels_are_cloned_from_panel_types() {
        let store = InMemoryStore::new();
        let fixture = Fixture::new(&store);
        store.add_panel_type(panel_type(fixture.project_id, "Wall", 2));
        store.add_panel_type(panel_type(fixture.project_id, "Floor", 1));
        store.add_panel_type(panel_type(Uuid::new_v4(), "Other project", 5));

        let none = CancellationToken::none();

        let views = factory(&store)
            .create_panels_for_box(fixture.box_id, PROJECT_CODE, fixture.actor, &none)
            .await
            .unwrap();

        let names: Vec<_> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Floor 1", "Wall 1", "Wall 2"]);
        for view in &views {
            assert_eq!(view.status, PanelStatus::NotStarted);
            assert!(barcode::validate(view.barcode.as_deref().unwrap()));
        }
        let records = store.audit_records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.action == AuditAction::Created));

        let err = factory(&store)
            .create_panels_for_box(fixture.box_id, PROJECT_CODE, fixture.actor, &none)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_dispatched_box_gets_no_panels() {
        let store = InMemoryStore::new();
        let fixture = Fixture::new(&store);
        store.add_panel_type(panel_type(fixture.project_id, "Wall", 2));
        fixture.dispatch_box();
        let none = CancellationToken::none();

        let err = factory(&store)
            .create_panels_for_box(fixture.box_id, PROJECT_CODE, fixture.actor, &none)
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Locked(_)));
        assert!(store.panels_of(fixture.box_id).is_empty());
    }

    #[tokio::test]
    async fn test_barcode_is_assigned_once() {
        let store = InMemoryStore::new();
        let fixture = Fixture::new(&store);
        let panel = fixture.panel();
        let factory = factory(&store);
        let none = CancellationToken::none();

        let view = factory
            .assign_barcode(panel.id, "prj001", fixture.actor, &none)
            .await
            .unwrap();
        let assigned = view.barcode.unwrap();
        assert_eq!(assigned, barcode::generate(panel.id, PROJECT_CODE).unwrap());
        assert_eq!(store.audit_records().len(), 1);

        let err = factory
            .assign_barcode(panel.id, "OTHER", fixture.actor, &none)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::PreconditionFailed(_)));
        assert_eq!(store.panel(panel.id).unwrap().barcode.as_deref(), Some(assigned.as_str()));
    }
}
