//! Save encoded output to disk, the native counterpart of a browser download.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{parse_data_url, Blob, ImageMime};
use crate::error::{Result, TransformError};

/// Something that can be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Downloadable {
    Blob(Blob),
    DataUrl(String),
}

impl From<Blob> for Downloadable {
    fn from(blob: Blob) -> Self {
        Downloadable::Blob(blob)
    }
}

/// Write `item` into `dir` and return the written path.
///
/// Without a filename one is generated as `download.<ext>`. Directory parts
/// of a given filename are ignored so the file always lands inside `dir`.
pub fn download(item: Downloadable, filename: Option<&str>, dir: &Path) -> Result<PathBuf> {
    let (extension, bytes) = match item {
        Downloadable::Blob(blob) => (blob.mime.extension(), blob.bytes),
        Downloadable::DataUrl(url) => {
            let (mime, bytes) = parse_data_url(&url)?;
            let extension = ImageMime::from_mime(&mime).map_or("bin", ImageMime::extension);
            (extension, bytes)
        }
    };

    let name = match filename {
        Some(name) => Path::new(name)
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| TransformError::InvalidOption(format!("invalid filename {name:?}")))?,
        None => PathBuf::from(format!("download.{extension}")),
    };

    let path = dir.join(name);
    fs::write(&path, &bytes)?;
    debug!(target: "pixform", "wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
