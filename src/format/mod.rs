/// TIFILES constants and TI disk format presets

/// Format constants
pub mod constants;
/// Disk geometry presets
pub mod preset;

pub use constants::*;
pub use preset::DiskFormatPreset;
