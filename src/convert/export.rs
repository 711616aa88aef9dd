/// Disk image to TIFILES conversion

use crate::engine::{DiskEngine, FileDescriptor};
use crate::error::{FiadError, Result};
use crate::format::TIFILES_HEADER_SIZE;
use crate::header;
use crate::name::is_valid_ti_name;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Extracts files from disk images as TIFILES byte streams
pub struct FiadExporter<E: DiskEngine> {
    engine: E,
}

impl<E: DiskEngine> FiadExporter<E> {
    /// Create an exporter
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Export `name` (any case) from `image` as header plus content
    ///
    /// Fails with [`FiadError::FileNotFound`] if the image has no such file.
    pub fn export_file(&self, image: &E::Image, name: &str) -> Result<Vec<u8>> {
        self.assemble(image, name).map(|(_, data)| data)
    }

    /// Read a `.dsk` from the host and export `name` from it
    pub fn export_from_path<P: AsRef<Path>>(&self, dsk_path: P, name: &str) -> Result<Vec<u8>> {
        let image = self.open_image(dsk_path)?;
        self.export_file(&image, name)
    }

    /// Export `name` into `dir` as a host file named after the TI file
    ///
    /// Fails with [`FiadError::InvalidFilename`] if the stored name is not a
    /// valid TI name, so nothing is written outside `dir`.
    pub fn export_to_dir<P: AsRef<Path>>(
        &self,
        image: &E::Image,
        name: &str,
        dir: P,
    ) -> Result<PathBuf> {
        let (stored_name, data) = self.assemble(image, name)?;
        if !is_valid_ti_name(&stored_name) {
            return Err(FiadError::InvalidFilename(stored_name));
        }
        let path = dir.as_ref().join(stored_name);
        fs::write(&path, &data)?;
        info!("Exported {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    /// Load a serialized image from the host
    pub fn open_image<P: AsRef<Path>>(&self, dsk_path: P) -> Result<E::Image> {
        let data = fs::read(dsk_path)?;
        self.engine.image_from_bytes(data).map_err(FiadError::engine)
    }

    fn assemble(&self, image: &E::Image, name: &str) -> Result<(String, Vec<u8>)> {
        let filesystem = self.engine.load_filesystem(image).map_err(FiadError::engine)?;

        let descriptor = self
            .engine
            .find_descriptor_by_name(&filesystem, name)
            .ok_or_else(|| FiadError::FileNotFound(name.to_string()))?;

        let file = self
            .engine
            .read_file(&filesystem, descriptor)
            .map_err(FiadError::engine)?;

        let header = header::build(&file, descriptor);

        let mut data = Vec::with_capacity(TIFILES_HEADER_SIZE + file.content.len());
        data.extend_from_slice(&header);
        data.extend_from_slice(&file.content);

        debug!(
            "Assembled {} ({}, {} sectors)",
            descriptor.name(),
            file.label(),
            descriptor.used_sectors()
        );
        Ok((descriptor.name().to_string(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryEngine, MemoryImage};
    use crate::file::TiFile;
    use crate::format::DiskFormatPreset;
    use crate::header::FileFlags;

    fn image_with(files: &[TiFile]) -> MemoryImage {
        let engine = MemoryEngine::new();
        let mut image = engine
            .create_empty_image(DiskFormatPreset::TiSssd, "EXPORT")
            .unwrap();
        for file in files {
            let mut filesystem = engine.load_filesystem(&image).unwrap();
            engine.create_file(&mut filesystem, file).unwrap();
            engine.save_filesystem(&mut image, &filesystem).unwrap();
        }
        image
    }

    #[test]
    fn test_export_program() {
        let content: Vec<u8> = (0..300u16).map(|i| (i % 251) as u8).collect();
        let image = image_with(&[TiFile::program("HELLO".to_string(), content.clone())]);
        let exporter = FiadExporter::new(MemoryEngine::new());

        let data = exporter.export_file(&image, "hello").unwrap();
        assert_eq!(data.len(), 128 + 300);
        assert_eq!(&data[128..], content.as_slice());

        let header = header::parse(&data).unwrap();
        assert_eq!(header.file_name(), "HELLO");
        assert_eq!(header.file_type(), "PROGRAM");
        assert_eq!(header.record_length(), 0);
        // Used sectors and EOF offset come from the descriptor
        assert_eq!(&data[8..10], &[0x00, 0x02]);
        assert_eq!(&data[14..16], &[0x00, 44]);
    }

    #[test]
    fn test_export_data_file() {
        let file = TiFile::from_flags("SCORES".to_string(), vec![7; 256], 64, FileFlags::new(0x02));
        let image = image_with(&[file]);
        let exporter = FiadExporter::new(MemoryEngine::new());

        let data = exporter.export_file(&image, "SCORES").unwrap();
        let header = header::parse(&data).unwrap();
        assert_eq!(header.file_type(), "INT/FIX");
        assert_eq!(header.record_length(), 64);
        assert_eq!(&data[11..13], &[0x00, 0x04]);
    }

    #[test]
    fn test_export_missing_file() {
        let image = image_with(&[TiFile::program("HELLO".to_string(), vec![1])]);
        let exporter = FiadExporter::new(MemoryEngine::new());

        let result = exporter.export_file(&image, "NOPE");
        assert!(matches!(result, Err(FiadError::FileNotFound(name)) if name == "NOPE"));
    }

    #[test]
    fn test_export_to_dir_uses_stored_name() {
        let image = image_with(&[TiFile::program("HELLO".to_string(), vec![1, 2, 3])]);
        let exporter = FiadExporter::new(MemoryEngine::new());
        let dir = tempfile::tempdir().unwrap();

        let path = exporter.export_to_dir(&image, "hello", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("HELLO"));
        assert_eq!(std::fs::read(&path).unwrap().len(), 131);
    }
}
