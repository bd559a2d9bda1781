//! Schema module - Export request and scene description types.

mod request;
mod scene;

pub use request::*;
pub use scene::*;
