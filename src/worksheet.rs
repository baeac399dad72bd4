//! Loading whole worksheets from disk.
//!
//! A `.wxmx` file is a ZIP archive holding `content.xml` next to the images
//! it references; anything else is treated as a loose `content.xml` whose
//! images live in the same directory.

use crate::config::ParserConfig;
use crate::model::Worksheet;
use crate::parser::{FsSource, MathParser, ZipSource};
use anyhow::{Context, Result};
use camino::Utf8Path;

/// Name of the document inside a `.wxmx` bundle.
pub const CONTENT_XML: &str = "content.xml";

impl Worksheet {
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        Self::open_with_config(path, ParserConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Utf8Path>, config: ParserConfig) -> Result<Self> {
        let path = path.as_ref();
        if path.extension() == Some("wxmx") {
            let file = std::fs::File::open(path).with_context(|| format!("Open {}", path))?;
            let reader = std::io::BufReader::new(file);
            let mut parser = MathParser::new(ZipSource::new(reader)?).with_config(config);
            parser
                .parse_document_file(CONTENT_XML)
                .with_context(|| format!("Failed to load {}", path))
        } else {
            let source = match path.parent() {
                Some(dir) if !dir.as_str().is_empty() => FsSource::with_working_dir(dir),
                _ => FsSource::new(),
            };
            let mut parser = MathParser::new(source).with_config(config);
            parser.parse_document_file(path)
        }
    }
}
