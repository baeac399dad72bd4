//! Content source abstraction: loose files on disk or a `.wxmx` ZIP bundle.
//!
//! The parser never touches the filesystem directly. Worksheet text and the
//! images referenced by `<img>` and `<slide>` tags are obtained through a
//! [`ContentSource`], so tests can substitute an in-memory source.

use crate::model::ImageSource;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Read;

/// An image lookup issued by the image and animation builders.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub name: &'a str,
    /// The image is a temporary file produced for this worksheet (`del` is not `"no"`).
    pub deletable: bool,
}

/// Trait for abstracting file I/O (filesystem vs. ZIP source).
pub trait ContentSource {
    /// Read a file at the given logical path.
    fn read_bytes(&mut self, path: &Utf8Path) -> Result<Vec<u8>>;

    /// Read a file at the given logical path and return its content as a string.
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).with_context(|| format!("Non-UTF8 content in {}", path))
    }

    /// Locate the bytes of an image referenced by name.
    fn resolve_image(&mut self, request: ImageRequest<'_>) -> ImageSource;
}

/// Reads files directly from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    working_dir: Option<Utf8PathBuf>,
}

impl FsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images given by a relative name that does not exist are looked up
    /// below `dir` as well.
    pub fn with_working_dir(dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            working_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn locate(&self, request: ImageRequest<'_>) -> Option<Utf8PathBuf> {
        let bare = Utf8PathBuf::from(request.name);
        if bare.is_file() {
            return Some(bare);
        }
        // Temporary files are always given with their full path.
        if request.deletable {
            return None;
        }
        let dir = self.working_dir.as_ref()?;
        let candidate = dir.join(request.name);
        candidate.is_file().then_some(candidate)
    }
}

impl ContentSource for FsSource {
    fn read_bytes(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        std::fs::read(path.as_std_path()).with_context(|| format!("Failed to read {}", path))
    }

    fn resolve_image(&mut self, request: ImageRequest<'_>) -> ImageSource {
        match self.locate(request) {
            Some(path) => ImageSource::Path { path },
            None => {
                tracing::warn!(name = request.name, "image not found on disk");
                ImageSource::Missing
            }
        }
    }
}

/// Reads files from a ZIP archive (used for `.wxmx` files).
pub struct ZipSource<R: Read + std::io::Seek> {
    zip: zip::ZipArchive<R>,
}

impl<R: Read + std::io::Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let zip = zip::ZipArchive::new(reader).context("Failed to open zip archive")?;
        Ok(Self { zip })
    }
}

impl<R: Read + std::io::Seek> std::fmt::Debug for ZipSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSource")
            .field("entries", &self.zip.len())
            .finish()
    }
}

impl<R: Read + std::io::Seek> ContentSource for ZipSource<R> {
    fn read_bytes(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        let p = path
            .as_str()
            .trim_start_matches("./")
            .trim_start_matches('/')
            .to_string();
        let mut f = self
            .zip
            .by_name(&p)
            .with_context(|| format!("File {} not found in zip", p))?;
        let mut bytes = Vec::new();
        f.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read {} from zip", p))?;
        Ok(bytes)
    }

    // Everything inside a bundle belongs to the bundle: nothing is deletable
    // and there is no working directory to fall back to.
    fn resolve_image(&mut self, request: ImageRequest<'_>) -> ImageSource {
        match self.read_bytes(Utf8Path::new(request.name)) {
            Ok(bytes) => ImageSource::Embedded {
                len: bytes.len(),
                bytes,
            },
            Err(err) => {
                tracing::warn!(name = request.name, "image not found in archive: {err:#}");
                ImageSource::Missing
            }
        }
    }
}
