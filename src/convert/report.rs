/// Import results

use crate::error::FiadError;
use std::fmt;
use std::path::PathBuf;

/// A host file that made it into the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    /// Source path on the host
    pub host_path: PathBuf,
    /// TI file name inside the image
    pub name: String,
    /// Catalog label such as `PROGRAM` or `DIS/VAR`
    pub type_label: String,
    /// Payload size in bytes (header excluded)
    pub size: usize,
}

/// A host file that was skipped, with the reason
#[derive(Debug)]
pub struct SkippedFile {
    /// Source path on the host
    pub host_path: PathBuf,
    /// Why the file was skipped
    pub error: FiadError,
}

/// Outcome of importing one directory
#[derive(Debug)]
pub struct ImportReport {
    /// Volume name given to the image
    pub volume_name: String,
    /// Files written to the image, in import order
    pub imported: Vec<ImportedFile>,
    /// Files left out
    pub skipped: Vec<SkippedFile>,
}

impl ImportReport {
    /// Create an empty report
    pub fn new(volume_name: impl Into<String>) -> Self {
        Self {
            volume_name: volume_name.into(),
            imported: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of imported files
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Number of skipped files
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when no file was skipped
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Look up an imported file by TI name, ignoring ASCII case
    pub fn find_imported(&self, name: &str) -> Option<&ImportedFile> {
        self.imported
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Volume {}: {} imported, {} skipped",
            self.volume_name,
            self.imported_count(),
            self.skipped_count()
        )?;
        for file in &self.imported {
            writeln!(f, "  {:<10} {:<8} {:>6}", file.name, file.type_label, file.size)?;
        }
        for skipped in &self.skipped {
            writeln!(f, "  skipped {}: {}", skipped.host_path.display(), skipped.error)?;
        }
        Ok(())
    }
}
