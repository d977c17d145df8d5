pub mod approval_gate;
pub mod audit_trail;
pub mod notification;
pub mod outcome;
pub mod panel_factory;
pub mod repositories;
pub mod scan_processor;
mod transition;

#[cfg(test)]
pub(crate) mod test_utils;

pub use approval_gate::ApprovalGate;
pub use audit_trail::AuditTrailRecorder;
pub use notification::{
    NotificationDispatcher, NotificationPublisher, NotificationSink, RetryPolicy,
};
pub use outcome::Outcome;
pub use panel_factory::PanelFactory;
pub use repositories::LifecycleRepositories;
pub use scan_processor::ScanEventProcessor;
