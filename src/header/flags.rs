/// TIFILES flag byte definitions
///
/// The same bit layout is used by the TI disk controller in the status byte of
/// a file descriptor record, minus the modified and emulated bits.

use std::fmt;

/// TIFILES flags byte (header offset 0x0A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileFlags(pub u8);

impl FileFlags {
    /// Program (memory image) file - Bit 0
    pub const PROGRAM: u8 = 0x01;

    /// Internal (binary) data - Bit 1
    /// When clear on a data file the file is DISPLAY (text)
    pub const INTERNAL: u8 = 0x02;

    /// Write protected - Bit 3
    pub const PROTECTED: u8 = 0x08;

    /// Modified since last archived - Bit 4
    pub const MODIFIED: u8 = 0x10;

    /// Written by an emulator - Bit 5
    pub const EMULATED: u8 = 0x20;

    /// Variable length records - Bit 7
    /// When clear the file has fixed length records
    pub const VARIABLE: u8 = 0x80;

    /// Create a new FileFlags from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FileFlags(value)
    }

    /// Raw flags byte
    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Check if program bit is set
    #[inline]
    pub fn is_program(&self) -> bool {
        (self.0 & Self::PROGRAM) != 0
    }

    /// Check if internal bit is set
    #[inline]
    pub fn is_internal(&self) -> bool {
        (self.0 & Self::INTERNAL) != 0
    }

    /// Check if write protected bit is set
    #[inline]
    pub fn is_protected(&self) -> bool {
        (self.0 & Self::PROTECTED) != 0
    }

    /// Check if modified bit is set
    #[inline]
    pub fn is_modified(&self) -> bool {
        (self.0 & Self::MODIFIED) != 0
    }

    /// Check if emulated bit is set
    #[inline]
    pub fn is_emulated(&self) -> bool {
        (self.0 & Self::EMULATED) != 0
    }

    /// Check if variable length bit is set
    #[inline]
    pub fn is_variable(&self) -> bool {
        (self.0 & Self::VARIABLE) != 0
    }

    /// Fixed length records (variable bit clear)
    #[inline]
    pub fn is_fixed(&self) -> bool {
        !self.is_variable()
    }

    /// Display data: neither program nor internal
    #[inline]
    pub fn is_display(&self) -> bool {
        !self.is_program() && !self.is_internal()
    }

    /// Type label as shown in a TI catalog
    ///
    /// Precedence: program bit, then internal bit, then display; the variable
    /// bit only selects between the VAR and FIX forms of data files.
    pub fn type_label(&self) -> &'static str {
        if self.is_program() {
            "PROGRAM"
        } else if self.is_internal() {
            if self.is_variable() {
                "INT/VAR"
            } else {
                "INT/FIX"
            }
        } else if self.is_variable() {
            "DIS/VAR"
        } else {
            "DIS/FIX"
        }
    }
}

impl From<u8> for FileFlags {
    fn from(value: u8) -> Self {
        FileFlags(value)
    }
}

impl fmt::Display for FileFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_label())?;
        if self.is_protected() {
            write!(f, " P")?;
        }
        if self.is_modified() {
            write!(f, " M")?;
        }
        if self.is_emulated() {
            write!(f, " E")?;
        }
        Ok(())
    }
}
