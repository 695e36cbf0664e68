//! Event sources
//!
//! A source turns some document representation into a well-nested stream of
//! [`ScanEvent`]s. Each `Enter` carries its own resolved tag identity, so
//! consumers never consult parser state.

mod html;
mod xml;

pub use html::HtmlEventSource;
pub use xml::XmlEventSource;

use crate::error::Result;
use crate::namespaces::TagIdentity;

/// An element opening, with everything needed to count it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStart {
    /// Resolved tag identity
    pub identity: TagIdentity,
    /// Resolved names of the attributes on this instance (namespace
    /// declarations excluded)
    pub attributes: Vec<TagIdentity>,
}

impl ElementStart {
    /// Element start for an unqualified tag
    pub fn unqualified<I, S>(name: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identity: TagIdentity::unqualified(name),
            attributes: attributes
                .into_iter()
                .map(TagIdentity::unqualified)
                .collect(),
        }
    }
}

/// One step of the document walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// An element was entered
    Enter(ElementStart),
    /// The innermost open element was closed
    Exit,
}

/// A pull-based stream of scan events
pub trait EventSource {
    /// Produce the next event, or `None` once the document is exhausted
    fn next_event(&mut self) -> Result<Option<ScanEvent>>;

    /// Drop raw data held for the element that was just closed.
    ///
    /// Called after every `Exit`; this is what keeps memory use independent
    /// of document size.
    fn release(&mut self) {}
}

impl EventSource for std::vec::IntoIter<ScanEvent> {
    fn next_event(&mut self) -> Result<Option<ScanEvent>> {
        Ok(self.next())
    }
}
