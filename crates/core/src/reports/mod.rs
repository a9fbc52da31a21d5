//! Cash register report export.
//!
//! The exporter is pure: the caller passes the reconciled state, the current
//! rate and the generation timestamp, and gets back the rendered artifact.

pub mod error;
pub mod exporter;
pub mod types;


pub use error::ExportError;
pub use exporter::ReportExporter;
pub use types::*;
