//! HTML event source backed by `html5ever`
//!
//! html5ever has no pull interface, so the whole document is parsed into an
//! `RcDom` first and then walked. Each element's children are detached when
//! the element is entered, which frees a subtree as soon as the walk is done
//! with it even though the input was buffered.

use super::{ElementStart, EventSource, ScanEvent};
use crate::error::Result;
use crate::limits::Limits;
use crate::namespaces::{resolve_identity, NamespaceContext, QName, TagIdentity};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::Read;
use std::vec;

/// Walks a parsed HTML document as a stream of scan events
pub struct HtmlEventSource {
    /// Remaining siblings at each open level; the bottom frame is the document
    open: Vec<vec::IntoIter<Handle>>,
    /// Leftovers of the element that was just closed, until released
    closed: Option<vec::IntoIter<Handle>>,
    /// HTML tags are unqualified, so this only ever holds `xml`
    namespaces: NamespaceContext,
}

impl HtmlEventSource {
    /// Parse the whole of `reader` as HTML.
    ///
    /// At most one byte more than `limits.max_buffered_size` is read; an
    /// input that reaches it fails with `LimitExceeded`.
    pub fn from_reader<R: Read>(reader: R, limits: &Limits) -> Result<Self> {
        let cap = limits.max_buffered_size.saturating_add(1);
        let mut reader = reader.take(cap);
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut reader)?;

        let buffered = cap - reader.limit();
        limits.check_buffered_size(buffered)?;
        log::debug!("parsed {} bytes of HTML into memory", buffered);
        Ok(Self::from_dom(dom))
    }

    /// Walk an already parsed document
    pub fn from_dom(dom: RcDom) -> Self {
        let top_level = detach_children(&dom.document);
        Self {
            open: vec![top_level],
            closed: None,
            namespaces: NamespaceContext::new(),
        }
    }
}

impl EventSource for HtmlEventSource {
    fn next_event(&mut self) -> Result<Option<ScanEvent>> {
        loop {
            let Some(frame) = self.open.last_mut() else {
                return Ok(None);
            };

            match frame.next() {
                Some(handle) => {
                    // text, comments and doctypes are dropped here
                    if let NodeData::Element {
                        ref name,
                        ref attrs,
                        ..
                    } = handle.data
                    {
                        let attributes = attrs.borrow().iter().map(attribute_identity).collect();
                        let identity = resolve_identity(&name.local, None, &self.namespaces)?;
                        self.open.push(detach_children(&handle));
                        return Ok(Some(ScanEvent::Enter(ElementStart {
                            identity,
                            attributes,
                        })));
                    }
                }
                None => {
                    let finished = self.open.pop();
                    if self.open.is_empty() {
                        return Ok(None);
                    }
                    self.closed = finished;
                    return Ok(Some(ScanEvent::Exit));
                }
            }
        }
    }

    fn release(&mut self) {
        self.closed = None;
    }
}

fn detach_children(handle: &Handle) -> vec::IntoIter<Handle> {
    std::mem::take(&mut *handle.children.borrow_mut()).into_iter()
}

/// Foreign attributes (`xlink:href`, `xml:lang` in SVG and MathML) carry a
/// namespace; everything else is unqualified
fn attribute_identity(attr: &Attribute) -> TagIdentity {
    match &attr.name.prefix {
        Some(prefix) => TagIdentity {
            full_tag: QName::namespaced(attr.name.ns.to_string(), attr.name.local.to_string())
                .to_string(),
            prefix: prefix.to_string(),
            short_name: attr.name.local.to_string(),
        },
        None => TagIdentity::unqualified(attr.name.local.to_string()),
    }
}
