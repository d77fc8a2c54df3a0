//! Data models for the application
//!
//! Request and response bodies exchanged over HTTP, grouped by feature.

mod modification;
mod objects;
mod preview;
mod upload;

pub use modification::*;
pub use objects::*;
pub use preview::*;
pub use upload::*;
