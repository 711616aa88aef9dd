/// Integration tests for fiad

use fiad::engine::MemoryImage;
use fiad::*;
use std::fs;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tifiles(name: &[u8], flags: u8, record_length: u8, content: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 128];
    data[0] = 0x07;
    data[1..8].copy_from_slice(b"TIFILES");
    data[0x0A] = flags;
    data[0x0D] = record_length;
    data[0x10..0x1A].fill(b' ');
    data[0x10..0x10 + name.len()].copy_from_slice(name);
    data.extend_from_slice(content);
    data
}

fn fiad_dir(parent: &Path, name: &str, files: &[(&str, Vec<u8>)]) -> std::path::PathBuf {
    let dir = parent.join(name);
    fs::create_dir(&dir).expect("Failed to create FIAD directory");
    for (file_name, data) in files {
        fs::write(dir.join(file_name), data).expect("Failed to write host file");
    }
    dir
}

fn names(image: &MemoryImage) -> Vec<String> {
    let engine = MemoryEngine::new();
    let fs = engine.load_filesystem(image).expect("Failed to load filesystem");
    engine
        .descriptors(&fs)
        .iter()
        .map(|d| d.name().to_string())
        .collect()
}

#[test]
fn test_raw_file_imports_as_program() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "raw", &[("HELLO.TXT", vec![0x42; 20])]);

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, report) = importer.build_image(&dir).expect("Failed to build image");

    assert!(report.is_complete());
    assert_eq!(names(&image), vec!["HELLO"]);

    let engine = MemoryEngine::new();
    let fs = engine.load_filesystem(&image).unwrap();
    let descriptor = engine.find_descriptor_by_name(&fs, "HELLO").unwrap();
    let file = engine.read_file(&fs, descriptor).unwrap();
    assert_eq!(file.file_type, FileType::Program);
    assert_eq!(file.record_length, 0);
    assert_eq!(file.content, vec![0x42; 20]);
}

#[test]
fn test_tifiles_file_keeps_header_metadata() {
    let temp = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..50).collect();
    let dir = fiad_dir(
        temp.path(),
        "wrapped",
        &[("readme", tifiles(b"README", 0x00, 80, &content))],
    );

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, report) = importer.build_image(&dir).unwrap();

    let imported = report.find_imported("README").expect("README not imported");
    assert_eq!(imported.type_label, "DIS/FIX");
    assert_eq!(imported.size, 50);

    let engine = MemoryEngine::new();
    let fs = engine.load_filesystem(&image).unwrap();
    let descriptor = engine.find_descriptor_by_name(&fs, "readme").unwrap();
    let file = engine.read_file(&fs, descriptor).unwrap();
    assert_eq!(file.file_type, FileType::Display);
    assert_eq!(file.format, RecordFormat::Fixed);
    assert_eq!(file.record_length, 80);
    assert_eq!(file.content, content);
}

#[test]
fn test_export_missing_file_fails() {
    let engine = MemoryEngine::new();
    let image = engine
        .create_empty_image(DiskFormatPreset::TiDsdd, "EMPTY")
        .unwrap();

    let exporter = FiadExporter::new(engine);
    let result = exporter.export_file(&image, "GHOST");
    assert!(matches!(result, Err(FiadError::FileNotFound(_))));
}

#[test]
fn test_malformed_file_is_skipped_not_fatal() {
    init_logging();
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(
        temp.path(),
        "mixed",
        &[
            ("good", tifiles(b"GOOD", 0x80, 80, &[1; 100])),
            // Fixed records of length 0
            ("bad", tifiles(b"BAD", 0x00, 0, &[2; 100])),
        ],
    );

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, report) = importer.build_image(&dir).expect("Import must not fail");

    assert_eq!(names(&image), vec!["GOOD"]);
    assert_eq!(report.imported_count(), 1);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].host_path, dir.join("bad"));
    assert!(matches!(
        report.skipped[0].error,
        FiadError::MalformedHeader { .. }
    ));
}

#[test]
fn test_engine_failures_are_skipped() {
    init_logging();
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(
        temp.path(),
        "dupes",
        &[
            ("HELLO.TXT", vec![1; 10]),
            ("hello.bin", vec![2; 10]),
            ("TOOBIG", vec![0; 400 * 256]),
        ],
    );

    let importer = FiadImporter::with_options(
        MemoryEngine::new(),
        ImportOptions::new().with_preset(DiskFormatPreset::TiSssd),
    );
    let (image, report) = importer.build_image(&dir).unwrap();

    // One of the two HELLO files wins, depending on directory order
    assert_eq!(names(&image), vec!["HELLO"]);
    assert_eq!(report.imported_count(), 1);
    assert_eq!(report.skipped_count(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|s| matches!(s.error, FiadError::Engine(_))));
}

#[test]
fn test_subdirectories_are_ignored() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "nested", &[("PROG", vec![9; 30])]);
    fs::create_dir(dir.join("SUBDIR")).unwrap();

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, report) = importer.build_image(&dir).unwrap();

    assert!(report.is_complete());
    assert_eq!(names(&image), vec!["PROG"]);
}

#[test]
fn test_import_dir_writes_sibling_image() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "games", &[("HELLO.TXT", vec![0x42; 20])]);

    let importer = FiadImporter::new(MemoryEngine::new());
    let outcome = importer.import_dir(&dir).expect("Failed to import");

    assert_eq!(outcome.image_path, temp.path().join("games.dsk"));
    let bytes = fs::read(&outcome.image_path).unwrap();
    assert_eq!(bytes.len(), DiskFormatPreset::TiDsdd.total_capacity());
    assert_eq!(&bytes[..5], b"GAMES");
}

#[test]
fn test_empty_directory_gives_empty_image() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "blank", &[]);

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, report) = importer.build_image(&dir).unwrap();

    assert_eq!(report.volume_name, "BLANK");
    assert_eq!(report.imported_count(), 0);
    assert!(names(&image).is_empty());
}

#[test]
fn test_missing_directory_fails() {
    let temp = tempfile::tempdir().unwrap();
    let importer = FiadImporter::new(MemoryEngine::new());

    let result = importer.build_image(temp.path().join("absent"));
    assert!(matches!(result, Err(FiadError::Io(_))));
}

#[test]
fn test_prepare_collects_images() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "disk1", &[("A", vec![1; 5])]);
    let plain = temp.path().join("plain.txt");
    fs::write(&plain, b"not a directory").unwrap();

    let importer = FiadImporter::new(MemoryEngine::new());
    let mut images = Vec::new();

    assert!(importer.prepare(&plain, &mut images).unwrap().is_none());
    assert!(images.is_empty());

    let report = importer.prepare(&dir, &mut images).unwrap();
    assert_eq!(report.map(|r| r.imported_count()), Some(1));
    assert_eq!(images, vec![temp.path().join("disk1.dsk")]);
}

#[test]
fn test_round_trip_through_host_directory() {
    let temp = tempfile::tempdir().unwrap();
    let original = tifiles(b"SCORES", 0x82, 40, &[0x5A; 256]);
    let dir = fiad_dir(temp.path(), "src", &[("SCORES", original.clone())]);

    let importer = FiadImporter::new(MemoryEngine::new());
    let outcome = importer.import_dir(&dir).unwrap();

    let exporter = FiadExporter::new(MemoryEngine::new());
    let exported = exporter
        .export_from_path(&outcome.image_path, "scores")
        .expect("Failed to export");

    let header = fiad::header::parse(&exported).unwrap();
    assert_eq!(header.file_name(), "SCORES");
    assert_eq!(header.file_type(), "INT/VAR");
    assert_eq!(header.record_length(), 40);
    assert_eq!(&exported[128..], &original[128..]);

    // Export output feeds straight back into classification
    let file = classify(exported, "SCORES").unwrap();
    assert_eq!(file.label(), "INT/VAR");
    assert_eq!(file.content.len(), 256);
}

#[test]
fn test_export_to_dir_then_reimport() {
    let temp = tempfile::tempdir().unwrap();
    let dir = fiad_dir(temp.path(), "first", &[("LOADER.BIN", vec![0x11; 600])]);

    let importer = FiadImporter::new(MemoryEngine::new());
    let (image, _) = importer.build_image(&dir).unwrap();

    let out_dir = temp.path().join("second");
    fs::create_dir(&out_dir).unwrap();
    let exporter = FiadExporter::new(MemoryEngine::new());
    let path = exporter.export_to_dir(&image, "LOADER", &out_dir).unwrap();
    assert_eq!(path, out_dir.join("LOADER"));

    let (image, report) = importer.build_image(&out_dir).unwrap();
    assert!(report.is_complete());
    assert_eq!(names(&image), vec!["LOADER"]);
    assert_eq!(report.imported[0].type_label, "PROGRAM");
    assert_eq!(report.imported[0].size, 600);
}

#[test]
fn test_export_to_dir_refuses_path_in_stored_name() {
    init_logging();
    let temp = tempfile::tempdir().unwrap();
    let engine = MemoryEngine::new();
    let mut image = engine
        .create_empty_image(DiskFormatPreset::TiSssd, "CRAFTED")
        .unwrap();
    let mut filesystem = engine.load_filesystem(&image).unwrap();
    engine
        .create_file(&mut filesystem, &TiFile::program("ESCAPE".to_string(), vec![7; 10]))
        .unwrap();
    engine.save_filesystem(&mut image, &filesystem).unwrap();

    // Rewrite the name in the first file descriptor sector
    let mut bytes = engine.raw_bytes(&image).to_vec();
    bytes[2 * 256..2 * 256 + 10].copy_from_slice(b"../ESCAPE ");
    let image = engine.image_from_bytes(bytes).unwrap();

    let out_dir = temp.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    let exporter = FiadExporter::new(MemoryEngine::new());
    let result = exporter.export_to_dir(&image, "../escape", &out_dir);

    assert!(result.is_err());
    assert!(!temp.path().join("ESCAPE").exists());
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}
