/*!
# fiad

A Rust library for moving TI-99/4A files between a host directory
("files in a directory", FIAD) and a disk image.

## Features

- Detect, parse and build the 128-byte TIFILES header
- Classify host files as TIFILES-wrapped or raw programs
- Build a disk image from a FIAD directory, skipping files that cannot be
  imported and reporting why
- Export a file from a disk image as a TIFILES byte stream
- Pluggable disk-image engine, with an in-memory reference engine

## Quick Start

```rust,no_run
use fiad::{FiadExporter, FiadImporter, ImportOptions, DiskFormatPreset, MemoryEngine};

// Convert a directory into games.dsk
let importer = FiadImporter::with_options(
    MemoryEngine::new(),
    ImportOptions::new().with_preset(DiskFormatPreset::TiDsdd),
);
let outcome = importer.import_dir("games")?;
println!("{}", outcome.report);

// Pull a file back out with its TIFILES header
let exporter = FiadExporter::new(MemoryEngine::new());
let image = exporter.open_image(&outcome.image_path)?;
let tifiles = exporter.export_file(&image, "HELLO")?;
std::fs::write("HELLO.tfi", tifiles)?;
# Ok::<(), fiad::FiadError>(())
```

## Modules

- `header`: TIFILES header codec and flag byte
- `classify`: host file classification
- `convert`: directory import and file export
- `engine`: disk-image engine trait and in-memory engine
- `format`: constants and disk presets
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Host file classification
pub mod classify;
/// Directory import and file export
pub mod convert;
/// Disk-image engine trait and in-memory engine
pub mod engine;
/// Error types and Result alias
pub mod error;
/// TI file record
pub mod file;
/// TIFILES constants and disk presets
pub mod format;
/// TIFILES header codec
pub mod header;
/// TI file and volume name rules
pub mod name;

// Re-export common types
pub use classify::{classify, classify_path, Classification};
pub use convert::{
    is_fiad, FiadExporter, FiadImporter, ImportOptions, ImportOutcome, ImportReport, ImportedFile,
    SkippedFile,
};
pub use engine::{DiskEngine, FileDescriptor, MemoryEngine, MemoryEngineError};
pub use error::{FiadError, Result};
pub use file::{FileType, RecordFormat, TiFile};
pub use format::DiskFormatPreset;
pub use header::{FileFlags, TiFilesHeader};
pub use name::{to_ti_file_name, to_ti_volume_name};
