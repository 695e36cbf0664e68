//! Limits for document scanning
//!
//! The counting tree only grows with the number of distinct tag paths, but a
//! hostile or broken document can still nest without end or pile thousands of
//! attributes onto one element. These limits turn such inputs into errors.

use crate::error::{Error, Result};

/// Scan limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum number of attributes per element
    pub max_attributes: usize,

    /// Maximum number of namespace declarations per element
    pub max_namespaces: usize,

    /// Maximum input size in bytes for parsers that buffer the whole document
    pub max_buffered_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_attributes: 1000,
            max_namespaces: 1000,
            max_buffered_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl Limits {
    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_depth: 100,
            max_attributes: 100,
            max_namespaces: 100,
            max_buffered_size: 10 * 1024 * 1024, // 10 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_depth: 10000,
            max_attributes: 10000,
            max_namespaces: 10000,
            max_buffered_size: 1024 * 1024 * 1024, // 1 GB
        }
    }

    /// Override the nesting depth limit
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check if element depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "element depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        if count > self.max_attributes {
            Err(Error::LimitExceeded(format!(
                "attribute count {} exceeds maximum {}",
                count, self.max_attributes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of namespace declarations is within limits
    pub fn check_namespaces(&self, count: usize) -> Result<()> {
        if count > self.max_namespaces {
            Err(Error::LimitExceeded(format!(
                "namespace declaration count {} exceeds maximum {}",
                count, self.max_namespaces
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a fully buffered input is within limits
    pub fn check_buffered_size(&self, size: u64) -> Result<()> {
        if size > self.max_buffered_size {
            Err(Error::LimitExceeded(format!(
                "input size {} bytes exceeds maximum {} bytes for a buffered parse",
                size, self.max_buffered_size
            )))
        } else {
            Ok(())
        }
    }
}
