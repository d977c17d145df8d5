//! In-memory repository doubles and fixtures for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use heapless::String as HeaplessString;
use panel_lifecycle_api::barcode;
use panel_lifecycle_api::cancel::CancellationSource;
use panel_lifecycle_api::domain::{BoxStatus, PanelStatus};
use panel_lifecycle_api::error::LifecycleError;
use panel_lifecycle_db::models::{
    AuditEntityKind, AuditRecordModel, BoxModel, DisplayReference, PanelModel, PanelTypeModel,
    ScanLogModel,
};
use panel_lifecycle_db::repository::{
    AuditRecordFilter, CreateBatch, DisplayNameLookup, ExistByIds, FindByBarcode, FindByParentId,
    LoadBatch, LoadForShare, LoadForUpdate, LoadScanLogs, Page, PageRequest, QueryAuditRecords,
    RepositoryError, UpdateBatch,
};
use parking_lot::Mutex;
use sqlx::Postgres;
use uuid::Uuid;

use crate::audit_trail::{AuditTrailRecorder, DisplayNameResolver};
use crate::repositories::LifecycleRepositories;

pub const PROJECT_CODE: &str = "PRJ001";

#[derive(Default)]
struct State {
    panels: HashMap<Uuid, PanelModel>,
    boxes: HashMap<Uuid, BoxModel>,
    panel_types: Vec<PanelTypeModel>,
    scan_logs: Vec<ScanLogModel>,
    audit_records: Vec<AuditRecordModel>,
    references: HashMap<(AuditEntityKind, Uuid), DisplayReference>,
    fail_lookups: bool,
    conflict_next_update: bool,
    dispatch_after_next_update: Option<Uuid>,
    cancel_on_scan_append: Option<CancellationSource>,
}

/// Shared in-memory storage; every repository handle sees the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> LifecycleRepositories<Postgres> {
        let repo = Arc::new(self.clone());
        LifecycleRepositories {
            panels: repo.clone(),
            boxes: repo.clone(),
            panel_types: repo.clone(),
            scan_logs: repo.clone(),
            audit_records: repo.clone(),
            display_names: repo,
        }
    }

    pub fn display_names(&self) -> Arc<dyn DisplayNameLookup<Postgres>> {
        Arc::new(self.clone())
    }

    pub fn recorder(&self) -> AuditTrailRecorder<Postgres> {
        let repos = self.repositories();
        AuditTrailRecorder::new(
            repos.audit_records.clone(),
            DisplayNameResolver::new(repos.display_names.clone()),
        )
    }

    pub fn add_reference(&self, kind: AuditEntityKind, id: Uuid, reference: DisplayReference) {
        self.state.lock().references.insert((kind, id), reference);
    }

    pub fn add_box(&self, owner: BoxModel) {
        self.state.lock().boxes.insert(owner.id, owner);
    }

    pub fn add_panel(&self, panel: PanelModel) {
        self.state.lock().panels.insert(panel.id, panel);
    }

    pub fn add_panel_type(&self, panel_type: PanelTypeModel) {
        self.state.lock().panel_types.push(panel_type);
    }

    pub fn set_box_status(&self, box_id: Uuid, status: BoxStatus) {
        if let Some(owner) = self.state.lock().boxes.get_mut(&box_id) {
            owner.status = status;
        }
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.state.lock().fail_lookups = fail;
    }

    /// The next panel update loses its compare-and-write.
    pub fn conflict_next_update(&self) {
        self.state.lock().conflict_next_update = true;
    }

    /// Dispatches `box_id` right after the next successful panel update,
    /// as a concurrent dispatch committed between two steps would.
    pub fn dispatch_after_next_update(&self, box_id: Uuid) {
        self.state.lock().dispatch_after_next_update = Some(box_id);
    }

    /// Cancels `source` as soon as a scan log entry is appended.
    pub fn cancel_on_scan_append(&self, source: CancellationSource) {
        self.state.lock().cancel_on_scan_append = Some(source);
    }

    pub fn panel(&self, id: Uuid) -> Option<PanelModel> {
        self.state.lock().panels.get(&id).cloned()
    }

    pub fn panels_of(&self, box_id: Uuid) -> Vec<PanelModel> {
        sorted_panels(&self.state.lock(), box_id)
    }

    pub fn scan_logs(&self) -> Vec<ScanLogModel> {
        self.state.lock().scan_logs.clone()
    }

    pub fn audit_records(&self) -> Vec<AuditRecordModel> {
        self.state.lock().audit_records.clone()
    }
}

fn sorted_panels(state: &State, box_id: Uuid) -> Vec<PanelModel> {
    let mut panels: Vec<_> = state
        .panels
        .values()
        .filter(|p| p.box_id == box_id)
        .cloned()
        .collect();
    panels.sort_by(|a, b| a.name.cmp(&b.name));
    panels
}

#[async_trait]
impl LoadBatch<Postgres, PanelModel> for InMemoryStore {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<PanelModel>>, RepositoryError> {
        let state = self.state.lock();
        Ok(ids.iter().map(|id| state.panels.get(id).cloned()).collect())
    }
}

#[async_trait]
impl LoadForUpdate<Postgres, PanelModel> for InMemoryStore {
    async fn load_for_update(&self, id: Uuid) -> Result<Option<PanelModel>, RepositoryError> {
        Ok(self.state.lock().panels.get(&id).cloned())
    }
}

#[async_trait]
impl FindByBarcode<Postgres, PanelModel> for InMemoryStore {
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<PanelModel>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .panels
            .values()
            .find(|p| p.barcode.as_deref() == Some(barcode))
            .cloned())
    }
}

#[async_trait]
impl FindByParentId<Postgres, PanelModel> for InMemoryStore {
    async fn find_by_parent_id(&self, parent_id: Uuid) -> Result<Vec<PanelModel>, RepositoryError> {
        Ok(sorted_panels(&self.state.lock(), parent_id))
    }
}

#[async_trait]
impl CreateBatch<Postgres, PanelModel> for InMemoryStore {
    async fn create_batch(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, RepositoryError> {
        let mut state = self.state.lock();
        let mut saved = Vec::with_capacity(items.len());
        for mut panel in items {
            if let Some(barcode) = &panel.barcode {
                if state.panels.values().any(|p| p.barcode.as_ref() == Some(barcode)) {
                    return Err(format!("duplicate barcode {barcode}").into());
                }
            }
            panel.version = 1;
            panel.audit_log_id = audit_log_id;
            state.panels.insert(panel.id, panel.clone());
            saved.push(panel);
        }
        Ok(saved)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, PanelModel> for InMemoryStore {
    async fn update_batch(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, RepositoryError> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.conflict_next_update) {
            return Err(Box::new(LifecycleError::Conflict(
                "Panel was modified concurrently".to_string(),
            )));
        }
        let mut saved = Vec::with_capacity(items.len());
        for mut panel in items {
            let stored = state
                .panels
                .get(&panel.id)
                .ok_or_else(|| format!("panel {} does not exist", panel.id))?;
            if stored.version != panel.version {
                return Err(Box::new(LifecycleError::Conflict(format!(
                    "Panel {} was modified concurrently",
                    panel.id
                ))));
            }
            panel.barcode = stored.barcode.clone().or(panel.barcode);
            panel.version += 1;
            panel.audit_log_id = audit_log_id.or(stored.audit_log_id);
            state.panels.insert(panel.id, panel.clone());
            saved.push(panel);
        }
        if let Some(box_id) = state.dispatch_after_next_update.take() {
            if let Some(owner) = state.boxes.get_mut(&box_id) {
                owner.status = BoxStatus::Dispatched;
            }
        }
        Ok(saved)
    }
}

#[async_trait]
impl ExistByIds<Postgres> for InMemoryStore {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, RepositoryError> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .map(|id| (*id, state.panels.contains_key(id)))
            .collect())
    }
}

#[async_trait]
impl LoadForShare<Postgres, BoxModel> for InMemoryStore {
    async fn load_for_share(&self, id: Uuid) -> Result<Option<BoxModel>, RepositoryError> {
        Ok(self.state.lock().boxes.get(&id).cloned())
    }
}

#[async_trait]
impl FindByParentId<Postgres, PanelTypeModel> for InMemoryStore {
    async fn find_by_parent_id(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<PanelTypeModel>, RepositoryError> {
        let mut types: Vec<_> = self
            .state
            .lock()
            .panel_types
            .iter()
            .filter(|t| t.project_id == parent_id)
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }
}

#[async_trait]
impl CreateBatch<Postgres, ScanLogModel> for InMemoryStore {
    async fn create_batch(
        &self,
        items: Vec<ScanLogModel>,
        _audit_log_id: Option<Uuid>,
    ) -> Result<Vec<ScanLogModel>, RepositoryError> {
        let mut state = self.state.lock();
        state.scan_logs.extend(items.iter().cloned());
        if let Some(source) = &state.cancel_on_scan_append {
            source.cancel();
        }
        Ok(items)
    }
}

#[async_trait]
impl LoadScanLogs<Postgres> for InMemoryStore {
    async fn load_scan_logs(
        &self,
        panel_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ScanLogModel>, RepositoryError> {
        let mut logs: Vec<_> = self
            .state
            .lock()
            .scan_logs
            .iter()
            .filter(|l| l.panel_id == panel_id)
            .cloned()
            .collect();
        logs.sort_by_key(|l| l.scanned_at);
        Ok(Page::from_sorted(logs, page))
    }
}

#[async_trait]
impl CreateBatch<Postgres, AuditRecordModel> for InMemoryStore {
    async fn create_batch(
        &self,
        items: Vec<AuditRecordModel>,
        _audit_log_id: Option<Uuid>,
    ) -> Result<Vec<AuditRecordModel>, RepositoryError> {
        self.state.lock().audit_records.extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl QueryAuditRecords<Postgres> for InMemoryStore {
    async fn query_audit_records(
        &self,
        filter: &AuditRecordFilter,
        page: PageRequest,
    ) -> Result<Page<AuditRecordModel>, RepositoryError> {
        // newest first; insertion order breaks timestamp ties
        let mut records: Vec<_> = self
            .state
            .lock()
            .audit_records
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        Ok(Page::from_sorted(records, page))
    }
}

#[async_trait]
impl DisplayNameLookup<Postgres> for InMemoryStore {
    async fn lookup_display_reference(
        &self,
        kind: AuditEntityKind,
        id: Uuid,
    ) -> Result<Option<DisplayReference>, RepositoryError> {
        let state = self.state.lock();
        if state.fail_lookups {
            return Err("display name lookup unavailable".into());
        }
        Ok(match kind {
            AuditEntityKind::Panel => state.panels.get(&id).map(|p| DisplayReference::Panel {
                name: p.name.to_string(),
                barcode: p.barcode.as_ref().map(|b| b.to_string()),
            }),
            AuditEntityKind::Box => state.boxes.get(&id).map(|b| DisplayReference::Box {
                name: b.name.to_string(),
                tag: b.tag.to_string(),
            }),
            AuditEntityKind::Unknown => None,
            _ => state.references.get(&(kind, id)).cloned(),
        })
    }
}

/// One project with one box, plus helpers to add panels to it.
pub struct Fixture {
    pub store: InMemoryStore,
    pub actor: Uuid,
    pub project_id: Uuid,
    pub box_id: Uuid,
    counter: AtomicUsize,
}

impl Fixture {
    pub fn new(store: &InMemoryStore) -> Self {
        let project_id = Uuid::new_v4();
        let box_id = Uuid::new_v4();
        store.add_box(BoxModel {
            id: box_id,
            project_id,
            name: HeaplessString::try_from("Box A").unwrap(),
            tag: HeaplessString::try_from("BX-001").unwrap(),
            status: BoxStatus::InProgress,
        });
        Self {
            store: store.clone(),
            actor: Uuid::new_v4(),
            project_id,
            box_id,
            counter: AtomicUsize::new(0),
        }
    }

    /// A stored `NotStarted` panel without barcode, named `Panel {n}`.
    pub fn panel(&self) -> PanelModel {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut panel =
            PanelModel::new(self.box_id, None, &format!("Panel {n}"), self.actor, Utc::now())
                .unwrap();
        panel.version = 1;
        self.store.add_panel(panel.clone());
        panel
    }

    /// A stored panel in `status` carrying a barcode.
    pub fn scannable_panel(&self, status: PanelStatus) -> PanelModel {
        let panel = self.panel();
        let mut panel = panel
            .with_barcode(&barcode::generate(panel.id, PROJECT_CODE).unwrap())
            .unwrap();
        panel.status = status;
        self.store.add_panel(panel.clone());
        panel
    }

    pub fn dispatch_box(&self) {
        self.store.set_box_status(self.box_id, BoxStatus::Dispatched);
    }
}
