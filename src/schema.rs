//! The counting tree
//!
//! One [`SchemaNode`] exists per distinct tag path from the document root.
//! All instances of a tag under the same parent node collapse into a single
//! node that counts them and the attributes they carried.

use crate::error::{Error, Result};
use crate::namespaces::TagIdentity;
use indexmap::IndexMap;

/// How many instances of a node carried one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCount {
    /// Attribute name; the prefix shown is the first one seen
    pub identity: TagIdentity,
    /// Number of instances carrying it
    pub count: u64,
}

/// One distinct tag at one position in the tag hierarchy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    /// Clark-notation tag; empty for the synthetic root
    full_tag: String,
    prefix: String,
    short_name: String,
    count: u64,
    /// resolved attribute name -> instances that carried it
    attributes: IndexMap<String, AttributeCount>,
    /// full tag -> child node, in first-seen order
    children: IndexMap<String, SchemaNode>,
}

impl SchemaNode {
    /// Create the synthetic root of a scan
    pub fn root() -> Self {
        Self::default()
    }

    /// Create an empty node for a tag
    pub fn new(identity: &TagIdentity) -> Self {
        Self {
            full_tag: identity.full_tag.clone(),
            prefix: identity.prefix.clone(),
            short_name: identity.short_name.clone(),
            ..Self::default()
        }
    }

    /// Namespace-qualified tag this node groups by
    pub fn full_tag(&self) -> &str {
        &self.full_tag
    }

    /// Namespace prefix, empty when the tag was unprefixed
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tag name without its namespace qualifier
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// `prefix:short_name`, or `short_name` alone
    pub fn display_name(&self) -> String {
        if self.prefix.is_empty() {
            self.short_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.short_name)
        }
    }

    /// Number of instances seen at this position
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of instances that carried the attribute with resolved name
    /// `full_name` (`{uri}local` or plain `local`), 0 if none did
    pub fn attribute_count(&self, full_name: &str) -> u64 {
        self.attributes.get(full_name).map_or(0, |a| a.count)
    }

    /// Attribute counts sorted by resolved attribute name
    pub fn sorted_attributes(&self) -> Vec<&AttributeCount> {
        let mut attributes: Vec<_> = self.attributes.values().collect();
        attributes.sort_unstable_by(|a, b| a.identity.full_tag.cmp(&b.identity.full_tag));
        attributes
    }

    /// Whether any instance carried an attribute
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Child node for a full tag
    pub fn child(&self, full_tag: &str) -> Option<&SchemaNode> {
        self.children.get(full_tag)
    }

    /// Number of distinct child tags
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Children sorted by full tag
    pub fn sorted_children(&self) -> Vec<(&str, &SchemaNode)> {
        let mut children: Vec<_> = self
            .children
            .iter()
            .map(|(tag, node)| (tag.as_str(), node))
            .collect();
        children.sort_unstable_by(|a, b| a.0.cmp(b.0));
        children
    }

    /// Record one more instance carrying the given attributes.
    ///
    /// A name repeated within `attributes` is counted once, so an attribute
    /// count never exceeds the instance count.
    pub fn add_instance(&mut self, attributes: &[TagIdentity]) {
        self.count += 1;
        for (i, attribute) in attributes.iter().enumerate() {
            let key = &attribute.full_tag;
            if attributes[..i].iter().any(|seen| &seen.full_tag == key) {
                continue;
            }
            self.attributes
                .entry(key.clone())
                .or_insert_with(|| AttributeCount {
                    identity: attribute.clone(),
                    count: 0,
                })
                .count += 1;
        }
    }

    /// Find or create the child for `identity` and record an instance on it
    pub fn add_child(
        &mut self,
        identity: &TagIdentity,
        attributes: &[TagIdentity],
    ) -> &mut SchemaNode {
        let index = self.add_child_at(identity, attributes);
        &mut self.children[index]
    }

    /// Same as [`add_child`](Self::add_child) but returns the child's slot
    /// in this node, which stays valid because children are never removed
    pub(crate) fn add_child_at(
        &mut self,
        identity: &TagIdentity,
        attributes: &[TagIdentity],
    ) -> usize {
        let entry = self.children.entry(identity.full_tag.clone());
        let index = entry.index();
        entry
            .or_insert_with(|| SchemaNode::new(identity))
            .add_instance(attributes);
        index
    }

    /// Follow a path of child slots down from this node
    pub(crate) fn descend_mut(&mut self, path: &[usize]) -> &mut SchemaNode {
        path.iter().fold(self, |node, &index| &mut node.children[index])
    }

    /// Consume a scan root and return its single top-level element.
    ///
    /// Fails unless exactly one top-level instance was seen.
    pub fn into_document_element(self) -> Result<SchemaNode> {
        let mut top_level = self.children.into_values();
        match (top_level.next(), top_level.next()) {
            (Some(node), None) if node.count == 1 => Ok(node),
            (Some(node), None) => Err(Error::Structure(format!(
                "document element '{}' occurs {} times, expected exactly once",
                node.display_name(),
                node.count
            ))),
            (None, _) => Err(Error::Structure(
                "document contains no elements".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::Structure(format!(
                "document contains {} distinct top-level elements, expected exactly one",
                2 + top_level.count()
            ))),
        }
    }
}
