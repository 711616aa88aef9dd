/// TI file record exchanged with the disk-image engine

use crate::format::SECTOR_SIZE;
use crate::header::FileFlags;
use std::fmt;

/// Record format of a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Fixed length records
    Fixed,
    /// Variable length records
    Variable,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Fixed => write!(f, "FIX"),
            RecordFormat::Variable => write!(f, "VAR"),
        }
    }
}

/// File type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Memory image program
    Program,
    /// Internal (binary) data
    Internal,
    /// Display (text) data
    Display,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Program => write!(f, "PROGRAM"),
            FileType::Internal => write!(f, "INT"),
            FileType::Display => write!(f, "DIS"),
        }
    }
}

/// A TI file: name, payload and the metadata a TI directory needs
///
/// Built once per host file during import, then handed to the engine, which
/// owns the persisted form. The engine hands a fresh one back on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiFile {
    /// File name (at most 10 characters)
    pub name: String,
    /// Raw payload without any header
    pub content: Vec<u8>,
    /// Logical record length (0 for programs)
    pub record_length: u8,
    /// Flags as found in the TIFILES header
    pub flags: FileFlags,
    /// Record format
    pub format: RecordFormat,
    /// File type
    pub file_type: FileType,
    /// Catalog label such as `DIS/VAR` when known
    pub type_label: Option<String>,
}

impl TiFile {
    /// Create a data or program file whose type and format come from the flags
    ///
    /// The flags are the only input: a record length of 0 does not turn a data
    /// file into a program.
    pub fn from_flags(name: String, content: Vec<u8>, record_length: u8, flags: FileFlags) -> Self {
        let file_type = if flags.is_program() {
            FileType::Program
        } else if flags.is_internal() {
            FileType::Internal
        } else {
            FileType::Display
        };
        let format = if flags.is_variable() {
            RecordFormat::Variable
        } else {
            RecordFormat::Fixed
        };

        Self {
            name,
            content,
            record_length,
            flags,
            format,
            file_type,
            type_label: Some(flags.type_label().to_string()),
        }
    }

    /// Create a program file from a raw host file
    pub fn program(name: String, content: Vec<u8>) -> Self {
        Self {
            name,
            content,
            record_length: 0,
            flags: FileFlags::default(),
            format: RecordFormat::Variable,
            file_type: FileType::Program,
            type_label: Some("PROGRAM".to_string()),
        }
    }

    /// Is this a program file?
    pub fn is_program(&self) -> bool {
        self.file_type == FileType::Program
    }

    /// Catalog label, derived from type and format when none was recorded
    pub fn label(&self) -> String {
        match (&self.type_label, self.file_type) {
            (Some(label), _) => label.clone(),
            (None, FileType::Program) => "PROGRAM".to_string(),
            (None, file_type) => format!("{}/{}", file_type, self.format),
        }
    }

    /// Number of records that fit in one sector (0 for programs)
    pub fn records_per_sector(&self) -> u16 {
        if self.is_program() || self.record_length == 0 {
            return 0;
        }
        let record_length = self.record_length as usize;
        let per_sector = match self.format {
            RecordFormat::Fixed => SECTOR_SIZE / record_length,
            // Each variable record carries a length byte, and the last byte
            // of the sector holds the 0xFF end marker
            RecordFormat::Variable => (SECTOR_SIZE - 1) / (record_length + 1),
        };
        per_sector as u16
    }

    /// Flags byte a TI directory stores for this file
    ///
    /// Type and format bits come from `file_type` and `format`; only the
    /// protection bit is carried over from `flags`.
    pub fn status_flags(&self) -> FileFlags {
        let mut bits = self.flags.bits() & FileFlags::PROTECTED;
        match self.file_type {
            FileType::Program => bits |= FileFlags::PROGRAM,
            FileType::Internal => bits |= FileFlags::INTERNAL,
            FileType::Display => {}
        }
        if !self.is_program() && self.format == RecordFormat::Variable {
            bits |= FileFlags::VARIABLE;
        }
        FileFlags::new(bits)
    }
}
