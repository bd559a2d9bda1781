//! Synchro Data - camera and object animation export.
//!
//! This crate writes the `.dat` binary consumed by an external renderer:
//! a header, an object directory, a name table and one fixed-size record
//! per object per frame.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Export request, render settings and scene description types
//! - `scene`: The `SceneProvider` seam and an in-memory baked scene
//! - `synchro`: Binary layout, frame encoding, export driver and reader
//!
//! # Example
//!
//! ```rust,no_run
//! use synchro_data::{
//!     scene::BakedScene,
//!     schema::ExportRequest,
//!     synchro::export_to_file,
//! };
//!
//! let mut scene = BakedScene::load("scene.json").unwrap();
//! let request = ExportRequest::with_range(1, 48);
//! let stats = export_to_file("scene.dat", &mut scene, &request).unwrap();
//!
//! println!("Exported {}", stats);
//! ```

pub mod scene;
pub mod schema;
pub mod synchro;

// Re-export commonly used types
pub use scene::{BakedScene, SceneProvider};
pub use schema::{ExportRequest, RenderSettings, SceneDescription};
pub use synchro::{ExportError, ExportStats, SynchroExporter, SynchroReader};
