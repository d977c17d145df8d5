pub mod auditable;
pub mod identifiable;
pub mod audit;
pub mod panel;

// Re-exports
pub use auditable::*;
pub use identifiable::*;
pub use audit::*;
pub use panel::*;
