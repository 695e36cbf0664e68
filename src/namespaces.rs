//! XML namespace handling
//!
//! This module provides qualified names in Clark notation (`{uri}local`), a
//! scoped prefix → namespace mapping that follows element nesting, and the
//! tag identity resolver that turns a fully qualified tag back into the
//! `prefix:local` form used for display.

use crate::error::{Error, Result};
use crate::XML_NAMESPACE;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Split a lexical name into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Namespace context for resolving prefixes
///
/// Bindings are kept in declaration order and grouped into scopes; one scope
/// is pushed per open element, so lookups see the innermost declaration.
#[derive(Debug, Clone)]
pub struct NamespaceContext {
    /// (prefix, uri) pairs; `None` is the default namespace
    bindings: Vec<(Option<Prefix>, NamespaceUri)>,
    /// Length of `bindings` at the start of each open scope
    scopes: Vec<usize>,
}

impl NamespaceContext {
    /// Create a context with only the predeclared `xml` prefix
    pub fn new() -> Self {
        Self {
            bindings: vec![(Some("xml".to_string()), XML_NAMESPACE.to_string())],
            scopes: Vec::new(),
        }
    }

    /// Open a scope for a new element
    pub fn push_scope(&mut self) {
        self.scopes.push(self.bindings.len());
    }

    /// Close the innermost scope, dropping its declarations
    pub fn pop_scope(&mut self) {
        if let Some(len) = self.scopes.pop() {
            log::trace!("closing namespace scope with {} declaration(s)", self.bindings.len() - len);
            self.bindings.truncate(len);
        }
    }

    /// Number of currently open scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.bindings.push((Some(prefix.into()), namespace.into()));
    }

    /// Set the default namespace; an empty URI undeclares it
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.bindings.push((None, namespace.into()));
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.lookup(Some(prefix))
    }

    /// Find the innermost binding for `prefix` (`None` = default namespace)
    pub fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// Resolve a lexical attribute name to its identity.
    ///
    /// Unprefixed attributes are in no namespace; the default namespace does
    /// not apply to them. Prefixed attributes are keyed `{uri}local`, so two
    /// prefixes bound to one URI name the same attribute.
    pub fn resolve_attribute(&self, lexical_name: &str) -> Result<TagIdentity> {
        match split_qname(lexical_name) {
            (Some(prefix), local) => {
                let namespace = self.get_namespace(prefix).ok_or_else(|| {
                    Error::Namespace(format!(
                        "undeclared prefix '{}' on attribute '{}'",
                        prefix, lexical_name
                    ))
                })?;
                Ok(TagIdentity {
                    full_tag: QName::namespaced(namespace, local).to_string(),
                    prefix: prefix.to_string(),
                    short_name: local.to_string(),
                })
            }
            (None, local) => Ok(TagIdentity::unqualified(local)),
        }
    }
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a tag: grouping key plus display parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIdentity {
    /// Namespace-qualified tag in Clark notation, used as the grouping key
    pub full_tag: String,
    /// Declared prefix, empty for unprefixed tags
    pub prefix: String,
    /// Tag name with the `{uri}` qualifier removed
    pub short_name: String,
}

impl TagIdentity {
    /// Identity of an unqualified tag
    pub fn unqualified(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_tag: name.clone(),
            prefix: String::new(),
            short_name: name,
        }
    }

    /// `prefix:short_name`, or just `short_name` when there is no prefix
    pub fn display_name(&self) -> String {
        if self.prefix.is_empty() {
            self.short_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.short_name)
        }
    }
}

/// Derive `(prefix, short name)` for a fully qualified tag.
///
/// The qualifier on `full_tag` must be exactly the one bound to `prefix` in
/// `namespaces`. Any disagreement means the parser and the prefix mapping
/// have drifted apart, which is reported as [`Error::NamespaceMismatch`].
pub fn resolve_identity(
    full_tag: &str,
    prefix: Option<&str>,
    namespaces: &NamespaceContext,
) -> Result<TagIdentity> {
    let qualifier = match namespaces.lookup(prefix) {
        Some(uri) => format!("{{{}}}", uri),
        None => String::new(),
    };

    let short_name = full_tag
        .strip_prefix(qualifier.as_str())
        .filter(|rest| !rest.is_empty() && !rest.starts_with('{'))
        .ok_or_else(|| Error::NamespaceMismatch {
            tag: full_tag.to_string(),
            expected: qualifier.clone(),
        })?;

    Ok(TagIdentity {
        full_tag: full_tag.to_string(),
        prefix: prefix.unwrap_or_default().to_string(),
        short_name: short_name.to_string(),
    })
}
