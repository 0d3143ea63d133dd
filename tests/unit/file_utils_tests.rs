/*!
 * File and output-path tests
 */

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use subsetzer::file_utils::{resolve_outfile, FileManager};

#[test]
fn test_write_to_file_creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("a/b/c/output.srt");

    FileManager::write_to_file(&nested, "content").unwrap();
    assert!(FileManager::file_exists(&nested));
    assert_eq!(FileManager::read_to_string(&nested).unwrap(), "content");
}

#[test]
fn test_file_exists_distinguishes_files_from_dirs() {
    let tmp = TempDir::new().unwrap();
    assert!(!FileManager::file_exists(tmp.path()));

    let file = tmp.path().join("present.txt");
    fs::write(&file, "").unwrap();
    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(tmp.path().join("absent.txt")));
}

#[test]
fn test_default_template_shape() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("{basename}.{dst}.{fmt}");

    let path = resolve_outfile(
        &template.to_string_lossy(),
        Path::new("some/dir/movie.srt"),
        "auto",
        "German",
        "srt",
        Some("llama3.2:3b"),
    )
    .unwrap();

    assert_eq!(path.file_name().unwrap().to_string_lossy(), "movie.German.srt");
}

#[test]
fn test_collision_suffix_applies_to_basename_only() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("{dst}/{basename}.{fmt}");
    fs::create_dir_all(tmp.path().join("German")).unwrap();
    fs::write(tmp.path().join("German/movie.srt"), "").unwrap();

    let path = resolve_outfile(
        &template.to_string_lossy(),
        Path::new("movie.srt"),
        "auto",
        "German",
        "srt",
        None,
    )
    .unwrap();

    // The directory part stays fixed; only the basename gets the suffix
    assert!(path.ends_with("German/movie-1.srt"));
}
