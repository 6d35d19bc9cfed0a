//! Image acquisition.
//!
//! Input is modeled as a capability with three variants (camera capture, a
//! bundled example image, or a user-supplied file), each reduced to a single
//! `fetch` operation that yields raw image bytes or nothing. The rest of the
//! tool never knows which path the bytes came from.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::PlastiscanError;

/// A source of raw image bytes.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Capture a frame by running a shell command that writes JPEG bytes to
    /// its stdout.
    Camera { command: String },
    /// A named image from the bundled example directory.
    Example { dir: PathBuf, name: String },
    /// A user-supplied image file.
    Upload { path: PathBuf },
}

impl ImageSource {
    /// Fetch the image bytes from this source.
    ///
    /// Returns `Ok(None)` when the source legitimately produced nothing (a
    /// camera command that exited cleanly without output); errors are reserved
    /// for misconfiguration and I/O failures.
    pub fn fetch(&self) -> Result<Option<Vec<u8>>, PlastiscanError> {
        match self {
            Self::Camera { command } => fetch_camera(command),
            Self::Example { dir, name } => fetch_example(dir, name).map(Some),
            Self::Upload { path } => fetch_upload(path).map(Some),
        }
    }
}

/// List the example image names available under `dir`, sorted.
///
/// Only supported image types are listed, matching what `fetch` will accept.
///
/// # Errors
/// Returns `MissingExampleDirectory` when the directory does not exist.
pub fn list_examples(dir: &Path) -> Result<Vec<String>, PlastiscanError> {
    if !dir.is_dir() {
        return Err(PlastiscanError::MissingExampleDirectory {
            dir: dir.to_path_buf(),
        });
    }

    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_supported_image(&entry.path()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    names.sort();
    Ok(names)
}

fn fetch_camera(command: &str) -> Result<Option<Vec<u8>>, PlastiscanError> {
    log::debug!("running capture command: {command}");

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| PlastiscanError::CameraCapture {
            message: format!("could not run '{command}': {source}"),
        })?;

    if !output.status.success() {
        return Err(PlastiscanError::CameraCapture {
            message: format!(
                "'{command}' exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    if output.stdout.is_empty() {
        log::info!("capture command produced no image");
        return Ok(None);
    }

    Ok(Some(output.stdout))
}

fn fetch_example(dir: &Path, name: &str) -> Result<Vec<u8>, PlastiscanError> {
    let names = list_examples(dir)?;
    if !names.iter().any(|candidate| candidate == name) {
        return Err(PlastiscanError::UnknownExample {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    Ok(std::fs::read(dir.join(name))?)
}

fn fetch_upload(path: &Path) -> Result<Vec<u8>, PlastiscanError> {
    if !is_supported_image(path) {
        return Err(PlastiscanError::UnsupportedImageType {
            path: path.to_path_buf(),
        });
    }

    Ok(std::fs::read(path)?)
}

/// Accepted upload types: JPEG and PNG.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false)
}
