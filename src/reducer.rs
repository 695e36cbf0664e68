//! Folding a scan event stream into the counting tree

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::schema::SchemaNode;
use crate::sources::{EventSource, ScanEvent};

/// Builds a [`SchemaNode`] tree one event at a time.
///
/// The stack of open nodes is kept as a path of child slots from the
/// synthetic root; the empty path is the root itself.
#[derive(Debug)]
pub struct StreamReducer<'a> {
    root: SchemaNode,
    open: Vec<usize>,
    limits: &'a Limits,
    events: u64,
}

impl<'a> StreamReducer<'a> {
    /// Start a reduction with an empty synthetic root
    pub fn new(limits: &'a Limits) -> Self {
        Self {
            root: SchemaNode::root(),
            open: Vec::new(),
            limits,
            events: 0,
        }
    }

    /// Number of elements currently open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Apply one event to the tree
    pub fn fold(&mut self, event: ScanEvent) -> Result<()> {
        self.events += 1;
        match event {
            ScanEvent::Enter(start) => {
                self.limits.check_depth(self.open.len() + 1)?;
                self.limits.check_attributes(start.attributes.len())?;

                let parent = self.root.descend_mut(&self.open);
                let slot = parent.add_child_at(&start.identity, &start.attributes);
                self.open.push(slot);
            }
            ScanEvent::Exit => {
                if self.open.pop().is_none() {
                    return Err(Error::Structure(format!(
                        "exit without a matching enter (event {})",
                        self.events
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check the stream was balanced and return the document element
    pub fn finish(self) -> Result<SchemaNode> {
        if !self.open.is_empty() {
            return Err(Error::Structure(format!(
                "input ended with {} unclosed element(s)",
                self.open.len()
            )));
        }
        log::debug!("folded {} events", self.events);
        self.root.into_document_element()
    }
}

/// Drain `source` into a counting tree and return the document element.
///
/// The source is told to release the raw data of every element as soon as
/// that element is closed.
pub fn reduce<S: EventSource + ?Sized>(source: &mut S, limits: &Limits) -> Result<SchemaNode> {
    let mut reducer = StreamReducer::new(limits);
    while let Some(event) = source.next_event()? {
        let closes = event == ScanEvent::Exit;
        reducer.fold(event)?;
        if closes {
            source.release();
        }
    }
    reducer.finish()
}
