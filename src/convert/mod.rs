/// Conversion between FIAD directories and disk images

/// Disk image to TIFILES export
pub mod export;
/// FIAD directory import
pub mod import;
/// Import results
pub mod report;

pub use export::FiadExporter;
pub use import::{is_fiad, FiadImporter, ImportOptions, ImportOutcome};
pub use report::{ImportReport, ImportedFile, SkippedFile};
