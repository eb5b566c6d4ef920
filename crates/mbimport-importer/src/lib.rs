//! Product import orchestration for the Markets Bridge catalog.
//!
//! Turns a parsed [`mbimport_core::Product`] into the ordered series of
//! catalog writes the Markets Bridge API expects.

pub mod error;
pub mod importer;
pub mod plan;

pub use error::ImportError;
pub use importer::{ImportOutcome, ProductImporter};
pub use plan::ImportPlan;
