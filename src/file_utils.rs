use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TranscriptError;

// @module: File and output-path utilities

// Any {placeholder} left after substitution is unknown
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}]*)\}").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

/// Resolve the output path from a template.
///
/// Recognized placeholders: `{basename}`, `{src}`, `{dst}`, `{fmt}` and
/// `{model}` (colons in model names are rewritten to `-` for filesystem
/// safety). Any other placeholder is an error. When the rendered candidate
/// already exists, the basename gets a numeric suffix (`-1`, `-2`, ...) and
/// the template is re-rendered until a free path is found. The parent
/// directory is created.
pub fn resolve_outfile(
    template: &str,
    input: &Path,
    source_language: &str,
    target_language: &str,
    format: &str,
    model: Option<&str>,
) -> Result<PathBuf, TranscriptError> {
    let basename = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let safe_model = model.map(|m| m.replace(':', "-")).unwrap_or_default();

    let render = |stem: &str| -> Result<String, TranscriptError> {
        let rendered = template
            .replace("{basename}", stem)
            .replace("{src}", source_language)
            .replace("{dst}", target_language)
            .replace("{fmt}", format)
            .replace("{model}", &safe_model);

        if let Some(caps) = PLACEHOLDER_REGEX.captures(&rendered) {
            return Err(TranscriptError::UnknownPlaceholder(caps[1].to_string()));
        }
        Ok(rendered)
    };

    let base = render(&basename)?;
    let mut candidate = PathBuf::from(&base);
    let mut suffix = 1;
    while candidate.exists() {
        let rendered = render(&format!("{}-{}", basename, suffix))?;
        // A template without {basename} renders the same path every time;
        // suffix the rendered file stem directly so the loop terminates
        candidate = if rendered == base {
            with_suffixed_stem(Path::new(&base), suffix)
        } else {
            PathBuf::from(rendered)
        };
        suffix += 1;
    }

    if let Some(parent) = candidate.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TranscriptError::Parse {
                format: "path".to_string(),
                message: format!("cannot create output directory {:?}: {}", parent, e),
            })?;
        }
    }

    Ok(candidate)
}

fn with_suffixed_stem(path: &Path, suffix: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}-{}", stem, suffix),
    };
    path.with_file_name(name)
}
