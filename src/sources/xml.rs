//! Streaming XML event source backed by `quick_xml::NsReader`

use super::{ElementStart, EventSource, ScanEvent};
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{resolve_identity, split_qname, NamespaceContext, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::reader::NsReader;
use std::io::BufRead;

/// Read buffer capacity kept across elements; anything larger is given back
const RETAINED_BUFFER_CAPACITY: usize = 8 * 1024;

/// Pulls scan events from an XML byte stream without building a tree
pub struct XmlEventSource<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    /// Prefix bindings in scope, tracked independently of the reader
    namespaces: NamespaceContext,
    limits: Limits,
    /// A self-closing element was entered and still needs its `Exit`
    pending_exit: bool,
}

impl<R: BufRead> XmlEventSource<R> {
    /// Create a source over a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::with_capacity(RETAINED_BUFFER_CAPACITY),
            namespaces: NamespaceContext::new(),
            limits: Limits::default(),
            pending_exit: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl<R: BufRead> EventSource for XmlEventSource<R> {
    fn next_event(&mut self) -> Result<Option<ScanEvent>> {
        if self.pending_exit {
            self.pending_exit = false;
            self.namespaces.pop_scope();
            return Ok(Some(ScanEvent::Exit));
        }

        loop {
            self.buf.clear();
            let read = self.reader.read_resolved_event_into(&mut self.buf);
            let (resolved, event) = match read {
                Ok(pair) => pair,
                Err(quick_xml::Error::Io(err)) => {
                    return Err(Error::Io(std::io::Error::new(err.kind(), err.to_string())))
                }
                Err(err) => {
                    return Err(ParseError::new(err.to_string())
                        .with_position(self.reader.buffer_position() as u64)
                        .into())
                }
            };
            let namespace = bound_namespace(resolved)?;

            match event {
                Event::Start(start) => {
                    let element =
                        element_start(&start, namespace, &mut self.namespaces, &self.limits)?;
                    return Ok(Some(ScanEvent::Enter(element)));
                }
                Event::Empty(start) => {
                    let element =
                        element_start(&start, namespace, &mut self.namespaces, &self.limits)?;
                    self.pending_exit = true;
                    return Ok(Some(ScanEvent::Enter(element)));
                }
                Event::End(_) => {
                    self.namespaces.pop_scope();
                    return Ok(Some(ScanEvent::Exit));
                }
                Event::Eof => {
                    log::debug!(
                        "reached end of XML input at byte {}",
                        self.reader.buffer_position()
                    );
                    return Ok(None);
                }
                // text, comments, PIs, doctype
                _ => {}
            }
        }
    }

    fn release(&mut self) {
        self.buf.clear();
        self.buf.shrink_to(RETAINED_BUFFER_CAPACITY);
    }
}

/// Owned namespace URI of a resolved element name
fn bound_namespace(resolved: ResolveResult) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(utf8(ns.as_ref(), "namespace URI")?.to_string())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(Error::Namespace(format!(
            "undeclared prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

/// Open a namespace scope for `start` and build its scan event
fn element_start(
    start: &BytesStart,
    namespace: Option<String>,
    namespaces: &mut NamespaceContext,
    limits: &Limits,
) -> Result<ElementStart> {
    namespaces.push_scope();

    let mut declarations = 0;
    let mut lexical_names = Vec::new();
    for attr_result in start.attributes() {
        let attr = attr_result
            .map_err(|e| ParseError::new(format!("Failed to parse attribute: {}", e)))?;

        match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => {
                let uri = attr.unescape_value().map_err(|e| {
                    ParseError::new(format!("Failed to unescape namespace URI: {}", e))
                })?;
                namespaces.set_default_namespace(uri.into_owned());
                declarations += 1;
            }
            Some(PrefixDeclaration::Named(prefix)) => {
                let uri = attr.unescape_value().map_err(|e| {
                    ParseError::new(format!("Failed to unescape namespace URI: {}", e))
                })?;
                namespaces.add_prefix(utf8(prefix, "namespace prefix")?, uri.into_owned());
                declarations += 1;
            }
            None => lexical_names.push(utf8(attr.key.into_inner(), "attribute name")?),
        }
    }
    limits.check_namespaces(declarations)?;

    // declarations may follow the attributes that use them
    let attributes = lexical_names
        .into_iter()
        .map(|name| namespaces.resolve_attribute(name))
        .collect::<Result<Vec<_>>>()?;

    let (prefix, local) = split_qname(utf8(start.name().into_inner(), "element name")?);
    let full_tag = match namespace {
        Some(uri) => QName::namespaced(uri, local),
        None => QName::local(local),
    }
    .to_string();

    let identity = resolve_identity(&full_tag, prefix, namespaces)?;
    Ok(ElementStart {
        identity,
        attributes,
    })
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| ParseError::new(format!("Invalid {}: {}", what, e)).into())
}
