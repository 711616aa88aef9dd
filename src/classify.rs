/// Host file classification
///
/// Decides whether a host file is TIFILES-wrapped or a bare program image and
/// turns it into a [`TiFile`] ready for the engine.

use crate::error::{FiadError, Result};
use crate::file::TiFile;
use crate::format::constants::*;
use crate::header::{self, TiFilesHeader};
use crate::name::{is_valid_name_char, to_ti_file_name};
use std::path::Path;

/// How a host file was recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 128-byte TIFILES header followed by the payload
    TiFiles,
    /// No header, imported as a program
    RawProgram,
}

/// Detect the kind of host file without parsing it
pub fn detect(data: &[u8]) -> Classification {
    if data.len() >= TIFILES_HEADER_SIZE && header::is_tifiles_header(data) {
        Classification::TiFiles
    } else {
        Classification::RawProgram
    }
}

/// Classify the bytes of one host file
///
/// TIFILES files keep the name, flags and record length from their header and
/// lose the header itself. Anything else becomes a program named after the host
/// file.
pub fn classify(mut data: Vec<u8>, host_name: &str) -> Result<TiFile> {
    match detect(&data) {
        Classification::TiFiles => {
            let header = header::parse(&data)?;
            validate_header(&header)?;

            let content = data.split_off(TIFILES_HEADER_SIZE);
            Ok(TiFile::from_flags(
                header.file_name().to_string(),
                content,
                header.record_length(),
                header.flags(),
            ))
        }
        Classification::RawProgram => Ok(TiFile::program(to_ti_file_name(host_name), data)),
    }
}

/// Read and classify a host file
pub fn classify_path<P: AsRef<Path>>(path: P) -> Result<TiFile> {
    let path = path.as_ref();
    let host_name = path
        .file_name()
        .ok_or_else(|| FiadError::InvalidFilename(path.display().to_string()))?
        .to_string_lossy();

    let data = std::fs::read(path)?;
    classify(data, &host_name)
}

/// Reject headers whose fields contradict each other
fn validate_header(header: &TiFilesHeader) -> Result<()> {
    let name = header.file_name();
    if name.is_empty() {
        return Err(FiadError::malformed(HEADER_FILE_NAME_OFFSET, "file name is blank"));
    }
    if let Some(bad) = name.chars().find(|&c| !is_valid_name_char(c)) {
        return Err(FiadError::malformed(
            HEADER_FILE_NAME_OFFSET,
            format!("file name {:?} contains {:?}", name, bad),
        ));
    }

    if header.is_program() {
        return Ok(());
    }

    let record_length = header.record_length();
    if header.is_fixed() && record_length == 0 {
        return Err(FiadError::malformed(
            HEADER_RECORD_LENGTH_OFFSET,
            format!("{} file declares a record length of 0", header.file_type()),
        ));
    }
    if header.is_variable() && record_length > MAX_VARIABLE_RECORD_LENGTH {
        return Err(FiadError::malformed(
            HEADER_RECORD_LENGTH_OFFSET,
            format!(
                "{} record length {} exceeds {}",
                header.file_type(),
                record_length,
                MAX_VARIABLE_RECORD_LENGTH
            ),
        ));
    }

    Ok(())
}
