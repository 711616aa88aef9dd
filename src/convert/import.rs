/// FIAD directory to disk image conversion

use crate::classify::classify_path;
use crate::convert::report::{ImportReport, ImportedFile, SkippedFile};
use crate::engine::DiskEngine;
use crate::error::{FiadError, Result};
use crate::format::DiskFormatPreset;
use crate::name::to_ti_volume_name;
use log::{debug, info, trace, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Check if a path is a FIAD directory
pub fn is_fiad<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_dir()
}

/// Import settings
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Disk format of the new image
    pub preset: DiskFormatPreset,
    /// Fixed volume name instead of one derived from the directory
    pub volume_name: Option<String>,
    /// Image location instead of `<dir>.dsk`
    pub output_path: Option<PathBuf>,
}

impl ImportOptions {
    /// Default options: DSDD image named after the directory, written beside it
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disk format preset
    pub fn with_preset(mut self, preset: DiskFormatPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Use a fixed volume name instead of one derived from the directory
    pub fn with_volume_name(mut self, volume_name: impl Into<String>) -> Self {
        self.volume_name = Some(volume_name.into());
        self
    }

    /// Write the image here instead of `<dir>.dsk`
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }
}

/// Result of [`FiadImporter::import_dir`]
#[derive(Debug)]
pub struct ImportOutcome {
    /// Where the image was written
    pub image_path: PathBuf,
    /// What was imported and what was skipped
    pub report: ImportReport,
}

/// Builds disk images from FIAD directories
pub struct FiadImporter<E: DiskEngine> {
    engine: E,
    options: ImportOptions,
}

impl<E: DiskEngine> FiadImporter<E> {
    /// Create an importer with default options
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, ImportOptions::default())
    }

    /// Create an importer with the given options
    pub fn with_options(engine: E, options: ImportOptions) -> Self {
        Self { engine, options }
    }

    /// Underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Import settings
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Volume name the image for `dir` will get
    pub fn volume_name_for(&self, dir: &Path) -> Result<String> {
        match &self.options.volume_name {
            Some(name) => Ok(name.clone()),
            None => Ok(to_ti_volume_name(&dir_base_name(dir)?)),
        }
    }

    /// Path the image for `dir` will be written to
    pub fn image_path_for(&self, dir: &Path) -> Result<PathBuf> {
        if let Some(path) = &self.options.output_path {
            return Ok(path.clone());
        }
        let base = dir_base_name(dir)?;
        Ok(resolve_dir(dir)?.with_file_name(format!("{}.dsk", base)))
    }

    /// Convert `dir` and write the image beside it as `<dir>.dsk`
    ///
    /// Files that cannot be imported are skipped and listed in the report.
    pub fn import_dir<P: AsRef<Path>>(&self, dir: P) -> Result<ImportOutcome> {
        let dir = dir.as_ref();
        let image_path = self.image_path_for(dir)?;
        let (image, report) = self.build_image(dir)?;

        fs::write(&image_path, self.engine.raw_bytes(&image))?;
        info!(
            "Wrote {} ({} files, {} skipped)",
            image_path.display(),
            report.imported_count(),
            report.skipped_count()
        );

        Ok(ImportOutcome { image_path, report })
    }

    /// Convert `dir` into an image without writing it anywhere
    pub fn build_image<P: AsRef<Path>>(&self, dir: P) -> Result<(E::Image, ImportReport)> {
        let dir = dir.as_ref();
        let volume_name = self.volume_name_for(dir)?;

        let mut image = self
            .engine
            .create_empty_image(self.options.preset, &volume_name)
            .map_err(FiadError::engine)?;
        trace!("Created {} image {}", self.options.preset, volume_name);

        let mut report = ImportReport::new(volume_name);

        for entry in fs::read_dir(dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!("Could not read entry in {}: {}", dir.display(), err);
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            match self.import_file(&mut image, &path) {
                Ok(imported) => {
                    debug!(
                        "Imported {} as {} ({})",
                        path.display(),
                        imported.name,
                        imported.type_label
                    );
                    report.imported.push(imported);
                }
                Err(error) => {
                    warn!("Could not import {}: {}", path.display(), error);
                    report.skipped.push(SkippedFile {
                        host_path: path,
                        error,
                    });
                }
            }
        }

        Ok((image, report))
    }

    /// Import one host file into `image`
    ///
    /// Loads the filesystem, adds the file and saves it back. On error the
    /// image is left as it was.
    pub fn import_file(&self, image: &mut E::Image, path: &Path) -> Result<ImportedFile> {
        let file = classify_path(path)?;

        let mut filesystem = self.engine.load_filesystem(image).map_err(FiadError::engine)?;
        self.engine
            .create_file(&mut filesystem, &file)
            .map_err(FiadError::engine)?;
        self.engine
            .save_filesystem(image, &filesystem)
            .map_err(FiadError::engine)?;

        Ok(ImportedFile {
            host_path: path.to_path_buf(),
            type_label: file.label(),
            size: file.content.len(),
            name: file.name,
        })
    }

    /// Convert `path` if it is a FIAD directory, remembering the written image
    ///
    /// Returns `None` when `path` is not a directory.
    pub fn prepare<P: AsRef<Path>>(
        &self,
        path: P,
        temp_images: &mut Vec<PathBuf>,
    ) -> Result<Option<ImportReport>> {
        let path = path.as_ref();
        if !is_fiad(path) {
            return Ok(None);
        }

        let outcome = self.import_dir(path)?;
        temp_images.push(outcome.image_path);
        Ok(Some(outcome.report))
    }
}

/// Directory path with a usable final component
fn resolve_dir(dir: &Path) -> Result<PathBuf> {
    if dir.file_name().is_some() {
        Ok(dir.to_path_buf())
    } else {
        Ok(dir.canonicalize()?)
    }
}

/// Final component of a directory path, resolving `.` and `..`
fn dir_base_name(dir: &Path) -> Result<String> {
    let dir = resolve_dir(dir)?;
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| FiadError::InvalidFilename(dir.display().to_string()))
}
