//! High-level scanning API
//!
//! [`Scanner`] picks the event source for the configured [`ParseMode`],
//! threads an optional byte-count callback under the parser, and reduces
//! the resulting event stream to the document's counting tree.
//!
//! ```rust,ignore
//! use xml_structure::scanner::{ScanOptions, Scanner};
//!
//! let schema = Scanner::new(ScanOptions::default()).scan_file("feed.xml")?;
//! print!("{}", xml_structure::report::render(&schema, RenderMode::Overview));
//! ```

use crate::error::Result;
use crate::limits::Limits;
use crate::loaders::open_input;
use crate::progress::ProgressReader;
use crate::reducer::reduce;
use crate::schema::SchemaNode;
use crate::sources::{HtmlEventSource, XmlEventSource};
use std::fmt;
use std::io::{BufReader, Read};
use std::path::Path;

/// Which parser produces the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Streaming XML parse
    #[default]
    Xml,
    /// Lenient HTML parse; buffers the whole document
    Html,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Xml => write!(f, "xml"),
            ParseMode::Html => write!(f, "html"),
        }
    }
}

/// Options for a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Parser to use
    pub mode: ParseMode,
    /// Resource limits
    pub limits: Limits,
}

impl ScanOptions {
    /// Default options (XML mode, default limits)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parse mode
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Scans documents into counting trees
pub struct Scanner {
    options: ScanOptions,
    on_progress: Option<Box<dyn FnMut(u64)>>,
}

impl Scanner {
    /// Create a scanner
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            on_progress: None,
        }
    }

    /// Call `callback` with the cumulative number of input bytes consumed.
    ///
    /// In HTML mode the whole input is read before any element is counted,
    /// so the reported position runs ahead of the actual work.
    pub fn with_progress(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// The options in use
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan the file at `path`
    pub fn scan_file(&mut self, path: impl AsRef<Path>) -> Result<SchemaNode> {
        let input = open_input(path)?;
        log::debug!(
            "scanning {} as {} ({} bytes)",
            input.path.display(),
            self.options.mode,
            input.size
        );
        // fail before reading; the source still counts what it actually reads
        if self.options.mode == ParseMode::Html {
            self.options.limits.check_buffered_size(input.size)?;
        }
        self.scan_reader(input.file)
    }

    /// Scan a document held in memory
    pub fn scan_str(&mut self, document: &str) -> Result<SchemaNode> {
        self.scan_reader(document.as_bytes())
    }

    /// Scan a document from any reader
    pub fn scan_reader<R: Read>(&mut self, reader: R) -> Result<SchemaNode> {
        let on_progress = &mut self.on_progress;
        let reader = ProgressReader::new(reader, |consumed| {
            if let Some(callback) = on_progress.as_mut() {
                callback(consumed);
            }
        });

        let limits = &self.options.limits;
        let schema = match self.options.mode {
            ParseMode::Xml => {
                let mut source =
                    XmlEventSource::new(BufReader::new(reader)).with_limits(limits.clone());
                reduce(&mut source, limits)?
            }
            ParseMode::Html => {
                log::debug!("HTML mode buffers the whole document; progress is approximate");
                let mut source = HtmlEventSource::from_reader(reader, limits)?;
                reduce(&mut source, limits)?
            }
        };

        log::debug!(
            "scan complete: document element {} with {} distinct child tag(s)",
            schema.display_name(),
            schema.child_count()
        );
        Ok(schema)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("options", &self.options)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}
