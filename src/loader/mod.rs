//! Background probing of the base image's pixel size.
//!
//! Loading runs on a worker thread and reports back over a channel. Callers either poll
//! with [`PendingImage::try_take`] from their own event loop or block with a timeout via
//! [`PendingImage::wait`].

use std::io::{self, BufRead, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use thiserror::Error;

const FILE_URI_PREFIX: &str = "file://";
const HTTP_URI_PREFIXES: [&str; 2] = ["http://", "https://"];
const MAX_REMOTE_IMAGE_BYTES: u64 = 64 * 1024 * 1024;
const USER_AGENT: &str = concat!("pixmark/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported image uri `{uri}`: expected a local path, file:// or http(s):// URI")]
    UnsupportedUri { uri: String },
    #[error("failed to read image {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch image {uri}: {source}")]
    Request {
        uri: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("image request for {uri} returned HTTP {status}")]
    HttpStatus { uri: String, status: u16 },
    #[error("failed to decode image {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image {location} has no pixels")]
    EmptyImage { location: String },
    #[error("image load timed out after {0:?}")]
    TimedOut(Duration),
    #[error("image loader stopped before reporting a result")]
    WorkerLost,
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Where the base image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Remote(String),
}

/// Classifies a base image URI. Plain paths are taken as-is; `file://` URIs are
/// percent-decoded.
pub fn resolve_image_source(uri: &str) -> LoadResult<ImageSource> {
    let unsupported = || LoadError::UnsupportedUri {
        uri: uri.to_string(),
    };
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(unsupported());
    }
    if HTTP_URI_PREFIXES
        .iter()
        .any(|prefix| has_prefix_ignore_case(trimmed, prefix))
    {
        return Ok(ImageSource::Remote(trimmed.to_string()));
    }
    if let Some(rest) = trimmed.strip_prefix(FILE_URI_PREFIX) {
        // `file://localhost/path` and `file:///path` both name `/path`.
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        if !rest.starts_with('/') {
            return Err(unsupported());
        }
        let decoded = percent_decode(rest).ok_or_else(unsupported)?;
        return Ok(ImageSource::File(PathBuf::from(decoded)));
    }
    if trimmed.contains("://") || trimmed.starts_with("data:") {
        return Err(unsupported());
    }
    Ok(ImageSource::File(PathBuf::from(uri)))
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// `None` on a truncated or non-hex escape, or when the bytes are not UTF-8.
fn percent_decode(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let hex_digit = |offset: usize| {
                bytes
                    .get(index + offset)
                    .and_then(|byte| char::from(*byte).to_digit(16))
            };
            let value = hex_digit(1)? * 16 + hex_digit(2)?;
            decoded.push(u8::try_from(value).ok()?);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

/// Reads only as much of the image as its header needs to report a size.
pub fn read_image_info(uri: &str) -> LoadResult<ImageInfo> {
    match resolve_image_source(uri)? {
        ImageSource::File(path) => read_path_info(&path),
        ImageSource::Remote(url) => {
            let bytes = fetch_remote(&url)?;
            read_bytes_info(&url, &bytes)
        }
    }
}

fn read_path_info(path: &Path) -> LoadResult<ImageInfo> {
    let location = path.display().to_string();
    let io_error = |source| LoadError::Io {
        location: location.clone(),
        source,
    };
    let reader = image::ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;
    dimensions(&location, reader)
}

/// Size of an image already held in memory. `location` only labels errors.
pub fn read_bytes_info(location: &str, bytes: &[u8]) -> LoadResult<ImageInfo> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| LoadError::Io {
            location: location.to_string(),
            source,
        })?;
    dimensions(location, reader)
}

fn dimensions<R: BufRead + Seek>(
    location: &str,
    reader: image::ImageReader<R>,
) -> LoadResult<ImageInfo> {
    let (width, height) = reader
        .into_dimensions()
        .map_err(|source| LoadError::Decode {
            location: location.to_string(),
            source,
        })?;
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage {
            location: location.to_string(),
        });
    }
    Ok(ImageInfo { width, height })
}

fn fetch_remote(uri: &str) -> LoadResult<Vec<u8>> {
    let response = match ureq::get(uri).set("User-Agent", USER_AGENT).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(LoadError::HttpStatus {
                uri: uri.to_string(),
                status,
            })
        }
        Err(err) => {
            return Err(LoadError::Request {
                uri: uri.to_string(),
                source: Box::new(err),
            })
        }
    };

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_REMOTE_IMAGE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Io {
            location: uri.to_string(),
            source,
        })?;
    tracing::debug!(%uri, bytes = bytes.len(), "remote image fetched");
    Ok(bytes)
}

/// An image size lookup running in the background.
#[derive(Debug)]
pub struct PendingImage {
    uri: String,
    receiver: Receiver<LoadResult<ImageInfo>>,
}

pub fn spawn_load(uri: impl Into<String>) -> PendingImage {
    let uri = uri.into();
    let (sender, receiver) = mpsc::channel();
    let worker_uri = uri.clone();
    std::thread::spawn(move || {
        let result = read_image_info(&worker_uri);
        let _ = sender.send(result);
    });
    tracing::debug!(%uri, "image load started");
    PendingImage { uri, receiver }
}

impl PendingImage {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Non-blocking poll. `None` while the worker is still running.
    pub fn try_take(&self) -> Option<LoadResult<ImageInfo>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::WorkerLost)),
        }
    }

    pub fn wait(self, timeout: Duration) -> LoadResult<ImageInfo> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(LoadError::TimedOut(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(LoadError::WorkerLost),
        }
    }
}
