//! Transformation module.
//!
//! This module handles CSV record to NUDS conversion:
//! - Fields: Recognized column names and their handlers
//! - Handlers: What each column does to the document
//! - Materials: Metal code tables
//! - Engine: Dispatch of records onto a document
//! - Pipeline: File-level conversion

pub mod engine;
pub mod fields;
pub mod handlers;
pub mod materials;
pub mod pipeline;

pub use engine::Converter;
pub use fields::{fields_description, FieldTag};
pub use handlers::Handler;
pub use materials::resolve_material;
pub use pipeline::*;
