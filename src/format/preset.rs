/// TI-99/4A disk format presets

use crate::format::constants::SECTOR_SIZE;

/// Disk geometry presets understood by TI disk controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiskFormatPreset {
    /// Single sided, single density (40 tracks, 9 sectors, 90 KB)
    TiSssd,
    /// Double sided, single density (40 tracks, 9 sectors, 180 KB)
    TiDssd,
    /// Single sided, double density (40 tracks, 18 sectors, 180 KB)
    TiSsdd,
    /// Double sided, double density (40 tracks, 18 sectors, 360 KB)
    #[default]
    TiDsdd,
}

impl DiskFormatPreset {
    /// All presets, smallest first
    pub const ALL: [DiskFormatPreset; 4] = [
        DiskFormatPreset::TiSssd,
        DiskFormatPreset::TiDssd,
        DiskFormatPreset::TiSsdd,
        DiskFormatPreset::TiDsdd,
    ];

    /// Number of sides
    pub fn num_sides(&self) -> u8 {
        match self {
            DiskFormatPreset::TiSssd | DiskFormatPreset::TiSsdd => 1,
            DiskFormatPreset::TiDssd | DiskFormatPreset::TiDsdd => 2,
        }
    }

    /// Number of tracks per side
    pub fn num_tracks(&self) -> u8 {
        40
    }

    /// Sectors per track
    pub fn sectors_per_track(&self) -> u8 {
        match self {
            DiskFormatPreset::TiSssd | DiskFormatPreset::TiDssd => 9,
            DiskFormatPreset::TiSsdd | DiskFormatPreset::TiDsdd => 18,
        }
    }

    /// Recording density code as stored in the volume sector (1 = SD, 2 = DD)
    pub fn density(&self) -> u8 {
        match self {
            DiskFormatPreset::TiSssd | DiskFormatPreset::TiDssd => 1,
            DiskFormatPreset::TiSsdd | DiskFormatPreset::TiDsdd => 2,
        }
    }

    /// Total number of sectors on the disk
    pub fn total_sectors(&self) -> usize {
        self.num_sides() as usize * self.num_tracks() as usize * self.sectors_per_track() as usize
    }

    /// Total capacity in bytes
    pub fn total_capacity(&self) -> usize {
        self.total_sectors() * SECTOR_SIZE
    }

    /// Total capacity in kilobytes
    pub fn total_capacity_kb(&self) -> usize {
        self.total_capacity() / 1024
    }

    /// Find the preset matching a side count and sectors per track
    pub fn from_geometry(num_sides: u8, sectors_per_track: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.num_sides() == num_sides && p.sectors_per_track() == sectors_per_track)
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            DiskFormatPreset::TiSssd => "TI SSSD",
            DiskFormatPreset::TiDssd => "TI DSSD",
            DiskFormatPreset::TiSsdd => "TI SSDD",
            DiskFormatPreset::TiDsdd => "TI DSDD",
        }
    }
}

impl std::fmt::Display for DiskFormatPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} KB)", self.name(), self.total_capacity_kb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_capacities() {
        assert_eq!(DiskFormatPreset::TiSssd.total_sectors(), 360);
        assert_eq!(DiskFormatPreset::TiSssd.total_capacity_kb(), 90);
        assert_eq!(DiskFormatPreset::TiDssd.total_capacity_kb(), 180);
        assert_eq!(DiskFormatPreset::TiSsdd.total_capacity_kb(), 180);
        assert_eq!(DiskFormatPreset::TiDsdd.total_sectors(), 1440);
        assert_eq!(DiskFormatPreset::TiDsdd.total_capacity_kb(), 360);
    }

    #[test]
    fn test_default_preset() {
        assert_eq!(DiskFormatPreset::default(), DiskFormatPreset::TiDsdd);
    }

    #[test]
    fn test_from_geometry() {
        assert_eq!(
            DiskFormatPreset::from_geometry(2, 18),
            Some(DiskFormatPreset::TiDsdd)
        );
        assert_eq!(
            DiskFormatPreset::from_geometry(1, 18),
            Some(DiskFormatPreset::TiSsdd)
        );
        assert_eq!(DiskFormatPreset::from_geometry(2, 10), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiskFormatPreset::TiDsdd.to_string(), "TI DSDD (360 KB)");
    }
}
