//! Unit-of-work boundary of the lifecycle services.
//!
//! Every operation runs in its own session: services stage their writes in
//! the session's transaction, the handler commits on success and rolls back
//! on failure. Events are published only after a successful commit.

use std::sync::Arc;

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use panel_lifecycle_api::cancel::CancellationToken;
use panel_lifecycle_api::domain::{
    ApprovePanelFirstApproval, ApprovePanelSecondApproval, AuditLogPage, GetAuditLogs, PanelView,
    ScanLogView, ScanOutcome, ScanPanelBarcode, UpdateBoxPanelStatus,
};
use panel_lifecycle_api::error::LifecycleResult;
use panel_lifecycle_api::service::{AuditLogService, PanelApprovalService, PanelScanService};
use panel_lifecycle_service::{
    ApprovalGate, AuditTrailRecorder, LifecycleRepositories, NotificationDispatcher,
    NotificationPublisher, NotificationSink, Outcome, PanelFactory, ScanEventProcessor,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::Postgres;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LifecycleConfig;
use crate::repository::factory::LifecycleRepoFactory;
use crate::unit_of_work::{Session, UnitOfWork};

struct SessionScope {
    session: Session,
    repos: LifecycleRepositories<Postgres>,
    recorder: AuditTrailRecorder<Postgres>,
}

pub struct PanelLifecycleHandler {
    uow: UnitOfWork,
    factory: Arc<LifecycleRepoFactory>,
    publisher: Option<NotificationPublisher>,
}

impl PanelLifecycleHandler {
    pub fn new(
        uow: UnitOfWork,
        factory: Arc<LifecycleRepoFactory>,
        publisher: Option<NotificationPublisher>,
    ) -> Self {
        Self {
            uow,
            factory,
            publisher,
        }
    }

    /// Connects the pool described by `config`. With a sink, also starts the
    /// notification dispatcher; its task ends once the handler is dropped
    /// and the queue has drained.
    pub async fn connect(
        config: &LifecycleConfig,
        sink: Option<Arc<dyn NotificationSink>>,
    ) -> AnyResult<(Self, Option<JoinHandle<()>>)> {
        config.validate()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.database_url)
            .await
            .context("Failed to connect to the panel database")?;

        let (publisher, dispatcher) = match sink {
            Some(sink) => {
                let (publisher, dispatcher) = NotificationDispatcher::channel(
                    config.notification_queue_capacity,
                    sink,
                    config.retry_policy(),
                );
                (Some(publisher), Some(dispatcher.spawn()))
            }
            None => (None, None),
        };

        info!(
            max_connections = config.max_connections,
            notifications = publisher.is_some(),
            "Panel lifecycle handler connected"
        );
        let handler = Self::new(
            UnitOfWork::new(Arc::new(pool)),
            LifecycleRepoFactory::new(),
            publisher,
        );
        Ok((handler, dispatcher))
    }

    /// Creates the panels of a freshly packed box from the project's panel
    /// types.
    pub async fn create_panels_for_box(
        &self,
        box_id: Uuid,
        project_code: &str,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Vec<PanelView>> {
        let scope = self.begin().await?;
        let factory = PanelFactory::new(scope.repos.clone(), scope.recorder.clone());
        let result = factory
            .create_panels_for_box(box_id, project_code, actor_id, cancel)
            .await
            .map(Outcome::quiet);
        self.finish(scope.session, result).await
    }

    pub async fn assign_barcode(
        &self,
        panel_id: Uuid,
        project_code: &str,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView> {
        let scope = self.begin().await?;
        let factory = PanelFactory::new(scope.repos.clone(), scope.recorder.clone());
        let result = factory
            .assign_barcode(panel_id, project_code, actor_id, cancel)
            .await
            .map(Outcome::quiet);
        self.finish(scope.session, result).await
    }

    async fn begin(&self) -> LifecycleResult<SessionScope> {
        let session = self.uow.begin().await?;
        let repos = self.factory.build_all_repos(&session);
        let recorder = self.factory.build_recorder(&repos);
        Ok(SessionScope {
            session,
            repos,
            recorder,
        })
    }

    async fn finish<T>(
        &self,
        session: Session,
        result: LifecycleResult<Outcome<T>>,
    ) -> LifecycleResult<T> {
        match result {
            Ok(outcome) => {
                session.commit().await?;
                if let Some(publisher) = &self.publisher {
                    let published = publisher.publish(outcome.events);
                    debug!(published, "Lifecycle events queued");
                }
                Ok(outcome.value)
            }
            Err(e) => {
                if let Err(rollback_err) = session.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl PanelApprovalService for PanelLifecycleHandler {
    async fn approve_first(
        &self,
        command: ApprovePanelFirstApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView> {
        let scope = self.begin().await?;
        let gate = ApprovalGate::new(scope.repos, scope.recorder);
        let result = gate.approve_first(command, actor_id, cancel).await;
        self.finish(scope.session, result).await
    }

    async fn approve_second(
        &self,
        command: ApprovePanelSecondApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView> {
        let scope = self.begin().await?;
        let gate = ApprovalGate::new(scope.repos, scope.recorder);
        let result = gate.approve_second(command, actor_id, cancel).await;
        self.finish(scope.session, result).await
    }

    async fn update_status(
        &self,
        command: UpdateBoxPanelStatus,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView> {
        let scope = self.begin().await?;
        let gate = ApprovalGate::new(scope.repos, scope.recorder);
        let result = gate.update_status(command, actor_id, cancel).await;
        self.finish(scope.session, result).await
    }
}

#[async_trait]
impl PanelScanService for PanelLifecycleHandler {
    async fn scan(
        &self,
        command: ScanPanelBarcode,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<ScanOutcome> {
        let scope = self.begin().await?;
        let processor = ScanEventProcessor::new(scope.repos, scope.recorder);
        let result = processor.process_scan(command, actor_id, cancel).await;
        self.finish(scope.session, result).await
    }

    async fn scan_history(
        &self,
        panel_id: Uuid,
        page_number: usize,
        page_size: usize,
    ) -> LifecycleResult<Vec<ScanLogView>> {
        let scope = self.begin().await?;
        let processor = ScanEventProcessor::new(scope.repos, scope.recorder);
        let result = processor
            .scan_history(panel_id, page_number, page_size)
            .await
            .map(Outcome::quiet);
        self.finish(scope.session, result).await
    }
}

#[async_trait]
impl AuditLogService for PanelLifecycleHandler {
    async fn get_audit_logs(&self, query: GetAuditLogs) -> LifecycleResult<AuditLogPage> {
        let scope = self.begin().await?;
        let result = scope.recorder.query(&query).await.map(Outcome::quiet);
        self.finish(scope.session, result).await
    }
}
