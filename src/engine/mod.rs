/// Disk-image filesystem engine capability
///
/// Sector layout, allocation and descriptor storage all live behind
/// [`DiskEngine`]. Import and export only ever go through this trait, so any
/// TI disk implementation can be plugged in.

/// In-memory reference engine
pub mod memory;

pub use memory::{MemoryDescriptor, MemoryEngine, MemoryEngineError, MemoryFileSystem, MemoryImage};

use crate::file::TiFile;
use crate::format::DiskFormatPreset;

/// Per-file metadata owned by the engine
pub trait FileDescriptor {
    /// File name as stored on disk
    fn name(&self) -> &str;

    /// Number of data sectors in use
    fn used_sectors(&self) -> u16;

    /// Offset of the end of file within the last sector (0 = full sector)
    fn eof_offset(&self) -> u8;

    /// Records per sector
    fn records_per_sector(&self) -> u8;
}

/// Operations the converters need from a disk-image engine
///
/// A filesystem view is loaded from an image, mutated, and saved back. The
/// importer performs that cycle once per file; callers must not share an
/// image between concurrent importers.
pub trait DiskEngine {
    /// Whole-image container
    type Image;
    /// Filesystem view loaded from an image
    type FileSystem;
    /// File descriptor record
    type Descriptor: FileDescriptor;
    /// Engine-specific error
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a freshly formatted, empty image
    fn create_empty_image(
        &self,
        preset: DiskFormatPreset,
        volume_name: &str,
    ) -> Result<Self::Image, Self::Error>;

    /// Wrap serialized image bytes, e.g. a `.dsk` read from the host
    fn image_from_bytes(&self, data: Vec<u8>) -> Result<Self::Image, Self::Error>;

    /// Load the filesystem view of an image
    fn load_filesystem(&self, image: &Self::Image) -> Result<Self::FileSystem, Self::Error>;

    /// Write a filesystem view back into its image
    fn save_filesystem(
        &self,
        image: &mut Self::Image,
        fs: &Self::FileSystem,
    ) -> Result<(), Self::Error>;

    /// Create a new file; fails when out of space or on a name collision
    fn create_file(&self, fs: &mut Self::FileSystem, file: &TiFile) -> Result<(), Self::Error>;

    /// Reconstruct a full file record from its descriptor
    fn read_file(
        &self,
        fs: &Self::FileSystem,
        descriptor: &Self::Descriptor,
    ) -> Result<TiFile, Self::Error>;

    /// All file descriptors in directory order
    fn descriptors<'a>(&self, fs: &'a Self::FileSystem) -> Vec<&'a Self::Descriptor>;

    /// Find a descriptor by name, ignoring ASCII case
    fn find_descriptor_by_name<'a>(
        &self,
        fs: &'a Self::FileSystem,
        name: &str,
    ) -> Option<&'a Self::Descriptor> {
        self.descriptors(fs)
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// Serialized image bytes
    fn raw_bytes<'a>(&self, image: &'a Self::Image) -> &'a [u8];
}
