//! Input/output helpers.
//!
//! - CSV point ingest + validation (`ingest`)
//! - per-point result exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
