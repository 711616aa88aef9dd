/// In-memory disk engine
///
/// Keeps the whole image as a flat sector buffer laid out the way a TI disk
/// controller lays out a floppy:
/// - Sector 0: volume information block (name, geometry, allocation bitmap)
/// - Sector 1: file descriptor index (sector numbers of each FDR, sorted by name)
/// - Sectors 2+: one file descriptor record (FDR) per file
/// - Sectors 34+: file data
///
/// Each file occupies a single contiguous run of sectors. Fragmented files are
/// rejected on load and never produced on write.

use crate::engine::{DiskEngine, FileDescriptor};
use crate::file::{FileType, RecordFormat, TiFile};
use crate::format::{DiskFormatPreset, MAX_NAME_LENGTH, SECTOR_SIZE};
use crate::header::FileFlags;
use crate::name::is_valid_ti_name;
use thiserror::Error;

/// Volume information block sector
pub const VOLUME_SECTOR: usize = 0;

/// File descriptor index sector
pub const DIRECTORY_SECTOR: usize = 1;

/// First sector searched for a new FDR
pub const FIRST_FDR_SECTOR: usize = 2;

/// First sector searched for file data
pub const FIRST_DATA_SECTOR: usize = 34;

/// Maximum number of files (pointers in the index sector)
pub const MAX_FILES: usize = 127;

const VIB_TOTAL_SECTORS: usize = 0x0A;
const VIB_SECTORS_PER_TRACK: usize = 0x0C;
const VIB_SIGNATURE: usize = 0x0D;
const VIB_PROTECTION: usize = 0x10;
const VIB_TRACKS_PER_SIDE: usize = 0x11;
const VIB_SIDES: usize = 0x12;
const VIB_DENSITY: usize = 0x13;
const VIB_BITMAP: usize = 0x38;

const DISK_SIGNATURE: &[u8; 3] = b"DSK";

const FDR_FLAGS: usize = 0x0C;
const FDR_RECORDS_PER_SECTOR: usize = 0x0D;
const FDR_USED_SECTORS: usize = 0x0E;
const FDR_EOF_OFFSET: usize = 0x10;
const FDR_RECORD_LENGTH: usize = 0x11;
const FDR_LEVEL3_RECORDS: usize = 0x12;
const FDR_DATA_CHAIN: usize = 0x1C;

/// Errors raised by the in-memory engine
#[derive(Debug, Error)]
pub enum MemoryEngineError {
    /// Not enough contiguous free sectors
    #[error("Disk full: {needed} contiguous sectors needed")]
    DiskFull {
        /// Sectors requested (including the FDR)
        needed: usize,
    },

    /// Index sector has no free slot
    #[error("Directory full: at most {} files", MAX_FILES)]
    DirectoryFull,

    /// A file with the same name already exists
    #[error("File already exists: {0}")]
    DuplicateName(String),

    /// Name is not a valid TI name
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Image bytes are not a usable disk
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

type EngineResult<T> = std::result::Result<T, MemoryEngineError>;

/// Serialized disk image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    preset: DiskFormatPreset,
    data: Vec<u8>,
}

impl MemoryImage {
    /// Disk geometry
    pub fn preset(&self) -> DiskFormatPreset {
        self.preset
    }

    /// Volume name stored in sector 0
    pub fn volume_name(&self) -> String {
        decode_name(&self.data[..MAX_NAME_LENGTH])
    }

    /// Image size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the image holds no bytes (never true for a formatted image)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// File descriptor record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDescriptor {
    name: String,
    fdr_sector: u16,
    flags: FileFlags,
    records_per_sector: u8,
    used_sectors: u16,
    eof_offset: u8,
    record_length: u8,
    level3_records: u16,
    start_sector: u16,
}

impl MemoryDescriptor {
    /// Parse an FDR sector
    fn parse(data: &[u8], fdr_sector: u16) -> EngineResult<Self> {
        let name = decode_name(&data[..MAX_NAME_LENGTH]);
        if name.is_empty() {
            return Err(MemoryEngineError::InvalidImage(format!(
                "FDR in sector {} has no name",
                fdr_sector
            )));
        }
        if !is_valid_ti_name(&name) {
            return Err(MemoryEngineError::InvalidImage(format!(
                "FDR in sector {} has invalid name {:?}",
                fdr_sector, name
            )));
        }

        let used_sectors = u16::from_be_bytes([data[FDR_USED_SECTORS], data[FDR_USED_SECTORS + 1]]);
        let (start_sector, highest_offset) = decode_cluster(&data[FDR_DATA_CHAIN..FDR_DATA_CHAIN + 3]);
        if used_sectors > 0 && highest_offset + 1 != used_sectors {
            return Err(MemoryEngineError::InvalidImage(format!(
                "file {} is fragmented",
                name
            )));
        }

        Ok(Self {
            name,
            fdr_sector,
            flags: FileFlags::new(data[FDR_FLAGS]),
            records_per_sector: data[FDR_RECORDS_PER_SECTOR],
            used_sectors,
            eof_offset: data[FDR_EOF_OFFSET],
            record_length: data[FDR_RECORD_LENGTH],
            level3_records: u16::from_le_bytes([
                data[FDR_LEVEL3_RECORDS],
                data[FDR_LEVEL3_RECORDS + 1],
            ]),
            start_sector,
        })
    }

    /// Encode as an FDR sector
    fn encode(&self) -> [u8; SECTOR_SIZE] {
        let mut data = [0u8; SECTOR_SIZE];
        encode_name(&mut data[..MAX_NAME_LENGTH], &self.name);
        data[FDR_FLAGS] = self.flags.bits();
        data[FDR_RECORDS_PER_SECTOR] = self.records_per_sector;
        data[FDR_USED_SECTORS..FDR_USED_SECTORS + 2].copy_from_slice(&self.used_sectors.to_be_bytes());
        data[FDR_EOF_OFFSET] = self.eof_offset;
        data[FDR_RECORD_LENGTH] = self.record_length;
        data[FDR_LEVEL3_RECORDS..FDR_LEVEL3_RECORDS + 2]
            .copy_from_slice(&self.level3_records.to_le_bytes());
        if self.used_sectors > 0 {
            data[FDR_DATA_CHAIN..FDR_DATA_CHAIN + 3]
                .copy_from_slice(&encode_cluster(self.start_sector, self.used_sectors - 1));
        }
        data
    }

    /// Status flags
    pub fn flags(&self) -> FileFlags {
        self.flags
    }

    /// Logical record length
    pub fn record_length(&self) -> u8 {
        self.record_length
    }

    /// Sector holding this FDR
    pub fn fdr_sector(&self) -> u16 {
        self.fdr_sector
    }

    /// First data sector
    pub fn start_sector(&self) -> u16 {
        self.start_sector
    }

    /// Payload length in bytes
    pub fn content_length(&self) -> usize {
        match (self.used_sectors as usize, self.eof_offset as usize) {
            (0, _) => 0,
            (used, 0) => used * SECTOR_SIZE,
            (used, eof) => (used - 1) * SECTOR_SIZE + eof,
        }
    }
}

impl FileDescriptor for MemoryDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn used_sectors(&self) -> u16 {
        self.used_sectors
    }

    fn eof_offset(&self) -> u8 {
        self.eof_offset
    }

    fn records_per_sector(&self) -> u8 {
        self.records_per_sector
    }
}

/// Filesystem view of a [`MemoryImage`]
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    volume_name: String,
    preset: DiskFormatPreset,
    sectors: Vec<u8>,
    allocated: Vec<bool>,
    files: Vec<MemoryDescriptor>,
}

impl MemoryFileSystem {
    /// Volume name
    pub fn volume_name(&self) -> &str {
        &self.volume_name
    }

    /// Disk geometry
    pub fn preset(&self) -> DiskFormatPreset {
        self.preset
    }

    /// Files in name order
    pub fn files(&self) -> &[MemoryDescriptor] {
        &self.files
    }

    /// Number of unallocated sectors
    pub fn free_sectors(&self) -> usize {
        self.allocated.iter().filter(|&&used| !used).count()
    }

    fn sector(&self, sector: usize) -> &[u8] {
        &self.sectors[sector * SECTOR_SIZE..(sector + 1) * SECTOR_SIZE]
    }

    fn first_free(&self, from: usize) -> Option<usize> {
        (from..self.allocated.len()).find(|&s| !self.allocated[s])
    }

    fn find_run(&self, len: usize, from: usize) -> Option<usize> {
        let mut run_start = from;
        let mut run_len = 0;
        for sector in from..self.allocated.len() {
            if self.allocated[sector] {
                run_start = sector + 1;
                run_len = 0;
            } else {
                run_len += 1;
                if run_len == len {
                    return Some(run_start);
                }
            }
        }
        None
    }
}

/// Reference engine keeping everything in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryEngine;

impl MemoryEngine {
    /// Create a new engine
    pub fn new() -> Self {
        MemoryEngine
    }
}

impl DiskEngine for MemoryEngine {
    type Image = MemoryImage;
    type FileSystem = MemoryFileSystem;
    type Descriptor = MemoryDescriptor;
    type Error = MemoryEngineError;

    fn create_empty_image(
        &self,
        preset: DiskFormatPreset,
        volume_name: &str,
    ) -> EngineResult<MemoryImage> {
        if !is_valid_ti_name(volume_name) {
            return Err(MemoryEngineError::InvalidName(volume_name.to_string()));
        }

        let total = preset.total_sectors();
        let mut allocated = vec![false; total];
        allocated[VOLUME_SECTOR] = true;
        allocated[DIRECTORY_SECTOR] = true;

        let fs = MemoryFileSystem {
            volume_name: volume_name.to_string(),
            preset,
            sectors: vec![0u8; total * SECTOR_SIZE],
            allocated,
            files: Vec::new(),
        };

        let mut image = MemoryImage {
            preset,
            data: vec![0u8; total * SECTOR_SIZE],
        };
        self.save_filesystem(&mut image, &fs)?;
        Ok(image)
    }

    fn image_from_bytes(&self, data: Vec<u8>) -> EngineResult<MemoryImage> {
        if data.len() < 2 * SECTOR_SIZE || data.len() % SECTOR_SIZE != 0 {
            return Err(MemoryEngineError::InvalidImage(format!(
                "{} bytes is not a whole number of sectors",
                data.len()
            )));
        }

        let vib = &data[..SECTOR_SIZE];
        if &vib[VIB_SIGNATURE..VIB_SIGNATURE + 3] != DISK_SIGNATURE {
            return Err(MemoryEngineError::InvalidImage(
                "missing DSK signature".to_string(),
            ));
        }

        let preset = DiskFormatPreset::from_geometry(vib[VIB_SIDES], vib[VIB_SECTORS_PER_TRACK])
            .ok_or_else(|| {
                MemoryEngineError::InvalidImage(format!(
                    "unsupported geometry: {} sides, {} sectors per track",
                    vib[VIB_SIDES], vib[VIB_SECTORS_PER_TRACK]
                ))
            })?;

        let total = u16::from_be_bytes([vib[VIB_TOTAL_SECTORS], vib[VIB_TOTAL_SECTORS + 1]]) as usize;
        if total != preset.total_sectors() || total * SECTOR_SIZE != data.len() {
            return Err(MemoryEngineError::InvalidImage(format!(
                "sector count {} does not match {} ({} bytes)",
                total,
                preset.name(),
                data.len()
            )));
        }

        Ok(MemoryImage { preset, data })
    }

    fn load_filesystem(&self, image: &MemoryImage) -> EngineResult<MemoryFileSystem> {
        let total = image.preset.total_sectors();
        let vib = &image.data[..SECTOR_SIZE];

        let allocated = (0..total)
            .map(|s| (vib[VIB_BITMAP + s / 8] >> (s % 8)) & 1 != 0)
            .collect();

        let mut fs = MemoryFileSystem {
            volume_name: image.volume_name(),
            preset: image.preset,
            sectors: image.data.clone(),
            allocated,
            files: Vec::new(),
        };

        let index = fs.sector(DIRECTORY_SECTOR).to_vec();
        for pointer in index.chunks_exact(2).take(MAX_FILES) {
            let fdr_sector = u16::from_be_bytes([pointer[0], pointer[1]]);
            if fdr_sector == 0 {
                break;
            }
            if fdr_sector as usize >= total {
                return Err(MemoryEngineError::InvalidImage(format!(
                    "FDR pointer {} beyond end of disk",
                    fdr_sector
                )));
            }

            let descriptor = MemoryDescriptor::parse(fs.sector(fdr_sector as usize), fdr_sector)?;
            if descriptor.start_sector as usize + descriptor.used_sectors as usize > total {
                return Err(MemoryEngineError::InvalidImage(format!(
                    "file {} extends beyond end of disk",
                    descriptor.name
                )));
            }
            fs.files.push(descriptor);
        }

        Ok(fs)
    }

    fn save_filesystem(&self, image: &mut MemoryImage, fs: &MemoryFileSystem) -> EngineResult<()> {
        if fs.sectors.len() != image.data.len() {
            return Err(MemoryEngineError::InvalidImage(
                "filesystem does not belong to this image".to_string(),
            ));
        }

        let mut data = fs.sectors.clone();

        let vib = &mut data[..SECTOR_SIZE];
        vib.fill(0);
        encode_name(&mut vib[..MAX_NAME_LENGTH], &fs.volume_name);
        vib[VIB_TOTAL_SECTORS..VIB_TOTAL_SECTORS + 2]
            .copy_from_slice(&(fs.allocated.len() as u16).to_be_bytes());
        vib[VIB_SECTORS_PER_TRACK] = fs.preset.sectors_per_track();
        vib[VIB_SIGNATURE..VIB_SIGNATURE + 3].copy_from_slice(DISK_SIGNATURE);
        vib[VIB_PROTECTION] = b' ';
        vib[VIB_TRACKS_PER_SIDE] = fs.preset.num_tracks();
        vib[VIB_SIDES] = fs.preset.num_sides();
        vib[VIB_DENSITY] = fs.preset.density();

        // Sectors past the end of the disk are marked in use
        for bit in 0..(SECTOR_SIZE - VIB_BITMAP) * 8 {
            if fs.allocated.get(bit).copied().unwrap_or(true) {
                vib[VIB_BITMAP + bit / 8] |= 1 << (bit % 8);
            }
        }

        let index = &mut data[DIRECTORY_SECTOR * SECTOR_SIZE..(DIRECTORY_SECTOR + 1) * SECTOR_SIZE];
        index.fill(0);
        for (slot, descriptor) in index.chunks_exact_mut(2).zip(&fs.files) {
            slot.copy_from_slice(&descriptor.fdr_sector.to_be_bytes());
        }

        for descriptor in &fs.files {
            let offset = descriptor.fdr_sector as usize * SECTOR_SIZE;
            data[offset..offset + SECTOR_SIZE].copy_from_slice(&descriptor.encode());
        }

        image.data = data;
        Ok(())
    }

    fn create_file(&self, fs: &mut MemoryFileSystem, file: &TiFile) -> EngineResult<()> {
        if !is_valid_ti_name(&file.name) {
            return Err(MemoryEngineError::InvalidName(file.name.clone()));
        }
        if fs.files.iter().any(|f| f.name.eq_ignore_ascii_case(&file.name)) {
            return Err(MemoryEngineError::DuplicateName(file.name.clone()));
        }
        if fs.files.len() >= MAX_FILES {
            return Err(MemoryEngineError::DirectoryFull);
        }

        let data_sectors = file.content.len().div_ceil(SECTOR_SIZE);
        let disk_full = MemoryEngineError::DiskFull {
            needed: data_sectors + 1,
        };
        if data_sectors >= fs.allocated.len() {
            return Err(disk_full);
        }

        let fdr_sector = fs.first_free(FIRST_FDR_SECTOR).ok_or(disk_full)?;
        fs.allocated[fdr_sector] = true;

        let start_sector = if data_sectors == 0 {
            0
        } else {
            match fs.find_run(data_sectors, FIRST_DATA_SECTOR) {
                Some(start) => start,
                None => {
                    fs.allocated[fdr_sector] = false;
                    return Err(MemoryEngineError::DiskFull {
                        needed: data_sectors + 1,
                    });
                }
            }
        };

        for sector in start_sector..start_sector + data_sectors {
            fs.allocated[sector] = true;
        }
        let offset = start_sector * SECTOR_SIZE;
        let region = &mut fs.sectors[offset..offset + data_sectors * SECTOR_SIZE];
        region.fill(0);
        region[..file.content.len()].copy_from_slice(&file.content);

        let level3_records = match (file.file_type, file.format) {
            (FileType::Program, _) => 0,
            (_, RecordFormat::Variable) => data_sectors as u16,
            (_, RecordFormat::Fixed) if file.record_length > 0 => {
                (file.content.len() / file.record_length as usize) as u16
            }
            (_, RecordFormat::Fixed) => 0,
        };

        fs.files.push(MemoryDescriptor {
            name: file.name.clone(),
            fdr_sector: fdr_sector as u16,
            flags: file.status_flags(),
            records_per_sector: file.records_per_sector().min(u8::MAX as u16) as u8,
            used_sectors: data_sectors as u16,
            eof_offset: (file.content.len() % SECTOR_SIZE) as u8,
            record_length: file.record_length,
            level3_records,
            start_sector: start_sector as u16,
        });
        fs.files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(())
    }

    fn read_file(&self, fs: &MemoryFileSystem, descriptor: &MemoryDescriptor) -> EngineResult<TiFile> {
        let offset = descriptor.start_sector as usize * SECTOR_SIZE;
        let end = offset + descriptor.content_length();
        let content = fs.sectors.get(offset..end).ok_or_else(|| {
            MemoryEngineError::InvalidImage(format!(
                "file {} extends beyond end of disk",
                descriptor.name
            ))
        })?;

        Ok(TiFile::from_flags(
            descriptor.name.clone(),
            content.to_vec(),
            descriptor.record_length,
            descriptor.flags,
        ))
    }

    fn descriptors<'a>(&self, fs: &'a MemoryFileSystem) -> Vec<&'a MemoryDescriptor> {
        fs.files.iter().collect()
    }

    fn raw_bytes<'a>(&self, image: &'a MemoryImage) -> &'a [u8] {
        &image.data
    }
}

fn decode_name(data: &[u8]) -> String {
    data.iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end_matches([' ', '\0'])
        .to_string()
}

fn encode_name(field: &mut [u8], name: &str) {
    field.fill(b' ');
    for (slot, byte) in field.iter_mut().zip(name.bytes()) {
        *slot = byte;
    }
}

/// Data chain cluster: 12-bit start sector, 12-bit highest logical sector offset
fn encode_cluster(start: u16, highest_offset: u16) -> [u8; 3] {
    [
        (start & 0xFF) as u8,
        (((start >> 8) & 0x0F) as u8) | (((highest_offset & 0x0F) as u8) << 4),
        ((highest_offset >> 4) & 0xFF) as u8,
    ]
}

fn decode_cluster(data: &[u8]) -> (u16, u16) {
    let start = data[0] as u16 | ((data[1] as u16 & 0x0F) << 8);
    let highest_offset = (data[1] as u16 >> 4) | ((data[2] as u16) << 4);
    (start, highest_offset)
}
