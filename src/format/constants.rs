/// TIFILES header and TI disk constants

/// Size of the TIFILES header in bytes
pub const TIFILES_HEADER_SIZE: usize = 128;

/// First byte of every TIFILES header
pub const TIFILES_MAGIC_BYTE: u8 = 0x07;

/// ASCII literal following the magic byte
pub const TIFILES_SIGNATURE: &[u8; 7] = b"TIFILES";

/// Offset of the used sector count (big endian, 2 bytes)
pub const HEADER_USED_SECTORS_OFFSET: usize = 0x08;

/// Offset of the flags byte
pub const HEADER_FLAGS_OFFSET: usize = 0x0A;

/// Offset of the records per sector count (big endian, 2 bytes)
pub const HEADER_RECORDS_PER_SECTOR_OFFSET: usize = 0x0B;

/// Offset of the logical record length
pub const HEADER_RECORD_LENGTH_OFFSET: usize = 0x0D;

/// Offset of the EOF offset within the last sector (big endian, 2 bytes)
pub const HEADER_EOF_OFFSET_OFFSET: usize = 0x0E;

/// Offset of the space padded file name
pub const HEADER_FILE_NAME_OFFSET: usize = 0x10;

/// Maximum length of a TI file or volume name
pub const MAX_NAME_LENGTH: usize = 10;

/// TI disk sector size in bytes
pub const SECTOR_SIZE: usize = 256;

/// Longest record a variable-length file can hold (0xFF marks end of sector)
pub const MAX_VARIABLE_RECORD_LENGTH: u8 = 254;
