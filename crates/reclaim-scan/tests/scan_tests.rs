//! Integration tests for the scan engine.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use reclaim_core::{DuplicateScanOptions, EmptyScanOptions, LargeScanOptions};
use reclaim_rules::{PathRules, Platform};
use reclaim_scan::{DuplicateScanner, EmptyFolderScanner, JunkScanner, LargeFileScanner};

#[test]
fn test_empty_folder_scenario() {
    // root contains empty1 (no files, no subdirs) and hasfile/x.txt:
    // exactly empty1 is reported.
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("empty1")).unwrap();
    fs::create_dir(temp.path().join("hasfile")).unwrap();
    fs::write(temp.path().join("hasfile/x.txt"), b"data").unwrap();

    let scanner = EmptyFolderScanner::new();
    let report = scanner.scan(&EmptyScanOptions::new(temp.path()));

    let paths: Vec<PathBuf> = report.folders.iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![temp.path().join("empty1")]);
}

#[test]
fn test_duplicate_scenario_same_name_same_size() {
    // /a/doc.txt and /b/doc.txt, 500000 bytes, identical content:
    // one group, two members, 500000 wasted.
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("a")).unwrap();
    fs::create_dir(temp.path().join("b")).unwrap();
    let content = vec![42u8; 500_000];
    fs::write(temp.path().join("a/doc.txt"), &content).unwrap();
    fs::write(temp.path().join("b/doc.txt"), &content).unwrap();

    let scanner = DuplicateScanner::new();
    let mut options = DuplicateScanOptions::new(temp.path());
    options.min_size = 1000;
    let report = scanner.scan(&options);

    assert_eq!(report.total_groups, 1);
    assert_eq!(report.groups[0].files.len(), 2);
    assert_eq!(report.groups[0].wasted_size, 500_000);
}

#[test]
fn test_duplicate_group_invariants() {
    let temp = TempDir::new().unwrap();
    for sub in ["x", "y", "z"] {
        fs::create_dir(temp.path().join(sub)).unwrap();
        fs::write(temp.path().join(sub).join("photo.jpg"), vec![1u8; 2000]).unwrap();
    }

    let scanner = DuplicateScanner::new();
    let mut options = DuplicateScanOptions::new(temp.path());
    options.min_size = 1;
    let report = scanner.scan(&options);

    for group in &report.groups {
        assert!(group.files.len() >= 2);
        assert_eq!(
            group.wasted_size,
            group.files.iter().skip(1).map(|f| f.size).sum::<u64>()
        );
    }
}

#[test]
fn test_cancellation_stops_scan_before_completion() {
    let temp = TempDir::new().unwrap();
    for dir in 0..40 {
        let sub = temp.path().join(format!("d{dir:02}"));
        fs::create_dir(&sub).unwrap();
        for file in 0..50 {
            fs::write(sub.join(format!("f{file:02}.bin")), b"x").unwrap();
        }
    }

    let scanner = DuplicateScanner::new();
    let cancel = scanner.cancel_flag();
    let mut progress_rx = scanner.subscribe();
    let root = temp.path().to_path_buf();

    let handle = std::thread::spawn(move || {
        let options = DuplicateScanOptions::new(root);
        scanner.scan(&options)
    });

    // The scanner emits progress every 200 files; cancel as soon as the
    // first event proves the walk is mid-flight.
    loop {
        match progress_rx.try_recv() {
            Ok(_) => {
                cancel.cancel();
                break;
            }
            Err(tokio::sync::broadcast::error::TryRecvError::Empty) => {
                std::thread::yield_now();
            }
            Err(_) => break,
        }
    }

    let report = handle.join().unwrap();
    assert!(report.scanned_files < 2000);
}

#[test]
fn test_large_scan_priority_dirs_not_double_counted() {
    // Home inside the scan root: Downloads is scanned in the priority
    // pass and must be skipped by the full sweep.
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    fs::create_dir_all(home.join("Downloads")).unwrap();
    fs::write(home.join("Downloads/big.iso"), vec![0u8; 4096]).unwrap();
    fs::write(temp.path().join("elsewhere.iso"), vec![0u8; 2048]).unwrap();

    let rules = PathRules::with_home(Platform::Linux, &home);
    let scanner = LargeFileScanner::new(rules);
    let options = LargeScanOptions::builder()
        .root(temp.path())
        .min_size(1u64)
        .build()
        .unwrap();
    let report = scanner.scan(&options).unwrap();

    assert_eq!(report.file_count, 2);
    assert_eq!(report.files[0].file.name, "big.iso");
    assert_eq!(report.total_size, 4096 + 2048);
}

#[test]
fn test_report_json_key_contract() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("movie.mp4"), vec![0u8; 2048]).unwrap();

    let rules = PathRules::with_home(Platform::Linux, temp.path().join("nohome"));
    let scanner = LargeFileScanner::new(rules);
    let options = LargeScanOptions::builder()
        .root(temp.path())
        .min_size(1u64)
        .build()
        .unwrap();
    let report = scanner.scan(&options).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let file = &json["files"][0];
    for key in [
        "path",
        "name",
        "size",
        "sizeFormatted",
        "extension",
        "modified",
        "directory",
        "type",
    ] {
        assert!(file.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(file["type"], "video");
    assert!(json.get("typeStats").is_some());
    assert!(json.get("directoryStats").is_some());
}

#[test]
fn test_junk_scan_against_synthetic_registry() {
    let temp = TempDir::new().unwrap();
    let cache_dir = temp.path().join("cache");
    fs::create_dir(&cache_dir).unwrap();
    fs::write(cache_dir.join("stale.tmp"), vec![0u8; 64]).unwrap();
    fs::write(cache_dir.join("fresh.dat"), vec![0u8; 64]).unwrap();

    let defs = vec![reclaim_rules::JunkCategoryDef {
        key: "test_cache",
        name: "Test cache",
        icon: "",
        group: "system",
        description: "",
        scan_paths: vec![cache_dir],
        dynamic_paths: vec![],
        extensions: vec![".tmp"],
        name_patterns: vec![],
        min_age_days: None,
        safe_to_clean: true,
        warning: None,
    }];

    let scanner = JunkScanner::with_categories(defs).unwrap();
    let report = scanner.scan();

    assert_eq!(report.total_files, 1);
    assert_eq!(report.categories["test_cache"].files[0].name, "stale.tmp");

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["categories"]["test_cache"].get("safeToClean").is_some());
    assert!(json["categories"]["test_cache"].get("totalSize").is_some());
}
