pub mod commands;
pub mod events;
pub mod status;
pub mod views;

pub use commands::*;
pub use events::*;
pub use status::*;
pub use views::*;
