pub mod barcode;
pub mod cancel;
pub mod domain;
pub mod error;
pub mod service;
pub mod state_machine;

pub use cancel::*;
pub use domain::*;
pub use error::*;
pub use service::*;
