// src/output/mod.rs
//! Output handling with planning separated from execution.
//!
//! Rendering builds strings, planning decides where they go, and only
//! [`deliver`] touches stdout or the filesystem.

mod render;
mod types;
mod writer;

pub use render::render_projection;
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::deliver;
