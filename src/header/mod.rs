/// TIFILES header codec
///
/// A TIFILES file is a 128-byte header followed by the raw sector data of a
/// single TI file. The header carries what a host filesystem cannot: type,
/// record format, record length and protection.
///
/// Layout (multi-byte fields big endian):
/// - 0x00: magic byte 0x07
/// - 0x01-0x07: "TIFILES"
/// - 0x08-0x09: used sectors
/// - 0x0A: flags
/// - 0x0B-0x0C: records per sector
/// - 0x0D: record length
/// - 0x0E-0x0F: EOF offset in the last sector
/// - 0x10-0x19: file name, space padded
/// - everything else zero

/// Flags byte definitions
pub mod flags;

pub use flags::FileFlags;

use crate::engine::FileDescriptor;
use crate::error::{FiadError, Result};
use crate::file::TiFile;
use crate::format::constants::*;

/// Decoded TIFILES header
///
/// Only the fields a reader can act on are kept. The file type is always
/// derived from `flags`, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiFilesHeader {
    file_name: String,
    record_length: u8,
    flags: FileFlags,
}

impl TiFilesHeader {
    /// Create a header from its decoded fields
    pub fn new(file_name: impl Into<String>, record_length: u8, flags: FileFlags) -> Self {
        Self {
            file_name: file_name.into(),
            record_length,
            flags,
        }
    }

    /// File name with trailing padding removed
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Catalog label: PROGRAM, INT/VAR, INT/FIX, DIS/VAR or DIS/FIX
    pub fn file_type(&self) -> &'static str {
        self.flags.type_label()
    }

    /// Logical record length
    pub fn record_length(&self) -> u8 {
        self.record_length
    }

    /// Raw flags
    pub fn flags(&self) -> FileFlags {
        self.flags
    }

    /// Check if this is a program file
    pub fn is_program(&self) -> bool {
        self.flags.is_program()
    }

    /// Check if this is internal data
    pub fn is_internal(&self) -> bool {
        self.flags.is_internal()
    }

    /// Check if this is display data
    pub fn is_display(&self) -> bool {
        self.flags.is_display()
    }

    /// Check if the file is write protected
    pub fn is_protected(&self) -> bool {
        self.flags.is_protected()
    }

    /// Check if the file has been modified
    pub fn is_modified(&self) -> bool {
        self.flags.is_modified()
    }

    /// Check if the file was written by an emulator
    pub fn is_emulated(&self) -> bool {
        self.flags.is_emulated()
    }

    /// Check if records are variable length
    pub fn is_variable(&self) -> bool {
        self.flags.is_variable()
    }

    /// Check if records are fixed length
    pub fn is_fixed(&self) -> bool {
        self.flags.is_fixed()
    }
}

/// Check whether `data` starts with a TIFILES header
///
/// Never fails: short or unrelated input simply yields `false`.
pub fn is_tifiles_header(data: &[u8]) -> bool {
    if data.len() < TIFILES_HEADER_SIZE {
        return false;
    }

    data[0] == TIFILES_MAGIC_BYTE && &data[1..8] == TIFILES_SIGNATURE
}

/// Parse the TIFILES header at the start of `data`
pub fn parse(data: &[u8]) -> Result<TiFilesHeader> {
    if !is_tifiles_header(data) {
        return Err(FiadError::InvalidHeaderFormat(format!(
            "expected 0x07 \"TIFILES\" followed by {} header bytes",
            TIFILES_HEADER_SIZE - 8
        )));
    }

    // Latin-1 style decoding keeps one char per byte so bad bytes stay visible
    let name_bytes = &data[HEADER_FILE_NAME_OFFSET..HEADER_FILE_NAME_OFFSET + MAX_NAME_LENGTH];
    let file_name: String = name_bytes
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end_matches([' ', '\0'])
        .to_string();

    Ok(TiFilesHeader {
        file_name,
        record_length: data[HEADER_RECORD_LENGTH_OFFSET],
        flags: FileFlags::new(data[HEADER_FLAGS_OFFSET]),
    })
}

/// Build a TIFILES header for `file`
///
/// Used sectors and EOF offset come from the engine's descriptor; flags, record
/// length and records per sector come from the file itself.
pub fn build<D>(file: &TiFile, descriptor: &D) -> [u8; TIFILES_HEADER_SIZE]
where
    D: FileDescriptor + ?Sized,
{
    let mut header = [0u8; TIFILES_HEADER_SIZE];

    header[0] = TIFILES_MAGIC_BYTE;
    header[1..8].copy_from_slice(TIFILES_SIGNATURE);

    header[HEADER_USED_SECTORS_OFFSET..HEADER_USED_SECTORS_OFFSET + 2]
        .copy_from_slice(&descriptor.used_sectors().to_be_bytes());

    header[HEADER_FLAGS_OFFSET] = file.flags.bits();

    header[HEADER_RECORDS_PER_SECTOR_OFFSET..HEADER_RECORDS_PER_SECTOR_OFFSET + 2]
        .copy_from_slice(&file.records_per_sector().to_be_bytes());

    header[HEADER_RECORD_LENGTH_OFFSET] = file.record_length;

    header[HEADER_EOF_OFFSET_OFFSET..HEADER_EOF_OFFSET_OFFSET + 2]
        .copy_from_slice(&(descriptor.eof_offset() as u16).to_be_bytes());

    let name_field = &mut header[HEADER_FILE_NAME_OFFSET..HEADER_FILE_NAME_OFFSET + MAX_NAME_LENGTH];
    name_field.fill(b' ');
    for (slot, c) in name_field.iter_mut().zip(file.name.chars()) {
        *slot = if c.is_ascii() {
            c.to_ascii_uppercase() as u8
        } else {
            b'?'
        };
    }

    header
}
