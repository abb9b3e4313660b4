//! Seeding a bucket from a content directory.
//!
//! The server loads the published site into its bucket once at startup;
//! after that the bucket serves read-only. Keys mirror the directory
//! layout: `root/docs/index.html` is stored under `/docs/index.html`.
//! Content types come from file extensions, with
//! `application/octet-stream` as the fallback.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::bucket::{ObjectBucket, StoredObject};

/// Walk `root` recursively and store every regular file in `bucket`.
///
/// Returns the number of objects stored. Symlinks and other non-regular
/// entries are skipped.
///
/// # Errors
///
/// Any I/O failure while walking or reading, with the offending path in
/// the context chain.
pub fn load_directory(bucket: &ObjectBucket, root: &Path) -> Result<usize> {
    let mut count = 0;
    load_entries(bucket, root, root, &mut count)?;
    info!(
        bucket = %bucket.name(),
        objects = count,
        root = %root.display(),
        "seeded origin bucket"
    );
    Ok(count)
}

fn load_entries(bucket: &ObjectBucket, root: &Path, dir: &Path, count: &mut usize) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", path.display()))?;
        if file_type.is_dir() {
            load_entries(bucket, root, &path, count)?;
        } else if file_type.is_file() {
            let body =
                fs::read(&path).with_context(|| format!("reading file {}", path.display()))?;
            let key = object_key(root, &path)?;
            let content_type = content_type_for(&path);
            debug!(%key, content_type, size = body.len(), "loading object");
            bucket.put(key, StoredObject::new(body, content_type));
            *count += 1;
        }
    }
    Ok(())
}

/// Bucket key for `path` under `root`: `/`-joined components with a
/// leading `/`, regardless of platform separators.
fn object_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("file {} outside content root", path.display()))?;
    let mut key = String::new();
    for component in relative.components() {
        key.push('/');
        key.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(key)
}

/// Content type for a file, derived from its extension.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "html" | "htm" => mime::TEXT_HTML_UTF_8.to_string(),
        "css" => mime::TEXT_CSS.to_string(),
        "js" | "mjs" => mime::TEXT_JAVASCRIPT.to_string(),
        "json" | "map" => mime::APPLICATION_JSON.to_string(),
        "txt" => mime::TEXT_PLAIN_UTF_8.to_string(),
        "xml" => mime::TEXT_XML.to_string(),
        "png" => mime::IMAGE_PNG.to_string(),
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "svg" => mime::IMAGE_SVG.to_string(),
        "pdf" => mime::APPLICATION_PDF.to_string(),
        "ico" => "image/x-icon".to_owned(),
        "webp" => "image/webp".to_owned(),
        "woff" => "font/woff".to_owned(),
        "woff2" => "font/woff2".to_owned(),
        "wasm" => "application/wasm".to_owned(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
