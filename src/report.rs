//! Rendering a finished counting tree
//!
//! Both text views walk the tree depth-first with children in lexicographic
//! order of their full tag, so the output depends only on the tree and never
//! on the order tags were met in the document.
//!
//! Overview:
//!
//! ```text
//! feed{1}:
//!   entry{12}:
//!     dc:title{12}:
//! ```
//!
//! Details add the attribute counts of every node that has any:
//!
//! ```text
//! feed{1}:
//!   entry{12} (
//!    id{12}
//!    xml:lang{3}
//!   ):
//!     dc:title{12}:
//! ```

use crate::schema::SchemaNode;
use serde::Serialize;
use std::io::{self, Write};

/// Indentation added per tree level
const INDENT: usize = 2;

/// Which text view to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Tag counts only
    Overview,
    /// Tag counts plus attribute counts
    Detailed,
}

/// Render `node` and everything below it
pub fn render(node: &SchemaNode, mode: RenderMode) -> String {
    let mut out = String::new();
    let mut pending = vec![(node, 0)];

    while let Some((node, indent)) = pending.pop() {
        render_node(&mut out, node, indent, mode);
        pending.extend(
            node.sorted_children()
                .into_iter()
                .rev()
                .map(|(_, child)| (child, indent + INDENT)),
        );
    }

    out
}

fn render_node(out: &mut String, node: &SchemaNode, indent: usize, mode: RenderMode) {
    push_indent(out, indent);
    out.push_str(&format!("{}{{{}}}", node.display_name(), node.count()));

    if mode == RenderMode::Detailed && node.has_attributes() {
        out.push_str(" (");
        for attribute in node.sorted_attributes() {
            out.push('\n');
            push_indent(out, indent + 1);
            out.push_str(&format!(
                "{}{{{}}}",
                attribute.identity.display_name(),
                attribute.count
            ));
        }
        out.push('\n');
        push_indent(out, indent);
        out.push_str("):\n");
    } else {
        out.push_str(":\n");
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

/// Write the overview followed by the detailed view, each under a heading
pub fn write_report<W: Write>(out: &mut W, node: &SchemaNode) -> io::Result<()> {
    writeln!(out, "Overview")?;
    writeln!(out, "========")?;
    writeln!(out, "{}", render(node, RenderMode::Overview))?;
    writeln!(out)?;
    writeln!(out, "Details")?;
    writeln!(out, "=======")?;
    writeln!(out, "{}", render(node, RenderMode::Detailed))?;
    Ok(())
}

/// Serializable view of a counting tree, for machine-readable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    /// Namespace-qualified tag (`{uri}local` or plain `local`)
    pub tag: String,
    /// Namespace prefix used in the document
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    /// Tag name without namespace
    pub name: String,
    /// Number of instances at this position
    pub count: u64,
    /// Attributes, sorted by namespace-qualified name
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSummary>,
    /// Child tags, sorted by full tag
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSummary>,
}

/// Serializable attribute count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSummary {
    /// Namespace-qualified name (`{uri}local` or plain `local`)
    pub tag: String,
    /// Name as first spelled in the document
    pub name: String,
    /// Number of instances carrying it
    pub count: u64,
}

/// Build the serializable view of `node`
pub fn summarize(node: &SchemaNode) -> ElementSummary {
    ElementSummary {
        tag: node.full_tag().to_string(),
        prefix: node.prefix().to_string(),
        name: node.short_name().to_string(),
        count: node.count(),
        attributes: node
            .sorted_attributes()
            .into_iter()
            .map(|attribute| AttributeSummary {
                tag: attribute.identity.full_tag.clone(),
                name: attribute.identity.display_name(),
                count: attribute.count,
            })
            .collect(),
        children: node
            .sorted_children()
            .into_iter()
            .map(|(_, child)| summarize(child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::TagIdentity;
    use pretty_assertions::assert_eq;

    /// `<r><a x="1"/><a/><b/></r>`, with `b` seen before `a`
    fn sample() -> SchemaNode {
        let mut root = SchemaNode::root();
        let r = root.add_child(&TagIdentity::unqualified("r"), &[]);
        r.add_child(&TagIdentity::unqualified("b"), &[]);
        r.add_child(&TagIdentity::unqualified("a"), &[TagIdentity::unqualified("x")]);
        r.add_child(&TagIdentity::unqualified("a"), &[]);
        root.into_document_element().unwrap()
    }

    #[test]
    fn test_overview() {
        assert_eq!(
            render(&sample(), RenderMode::Overview),
            "r{1}:\n  a{2}:\n  b{1}:\n"
        );
    }

    #[test]
    fn test_detailed() {
        assert_eq!(
            render(&sample(), RenderMode::Detailed),
            "r{1}:\n  a{2} (\n   x{1}\n  ):\n  b{1}:\n"
        );
    }

    #[test]
    fn test_attributes_sorted_and_nested() {
        let mut root = SchemaNode::root();
        let doc = root.add_child(
            &TagIdentity::unqualified("doc"),
            &[TagIdentity::unqualified("z"), TagIdentity::unqualified("id")],
        );
        let ns = TagIdentity {
            full_tag: "{urn:m}meta".to_string(),
            prefix: "m".to_string(),
            short_name: "meta".to_string(),
        };
        doc.add_child(&ns, &[TagIdentity::unqualified("name")])
            .add_child(&TagIdentity::unqualified("leaf"), &[]);

        let doc = root.into_document_element().unwrap();
        assert_eq!(
            render(&doc, RenderMode::Detailed),
            concat!(
                "doc{1} (\n",
                " id{1}\n",
                " z{1}\n",
                "):\n",
                "  m:meta{1} (\n",
                "   name{1}\n",
                "  ):\n",
                "    leaf{1}:\n",
            )
        );
        assert_eq!(
            render(&doc, RenderMode::Overview),
            "doc{1}:\n  m:meta{1}:\n    leaf{1}:\n"
        );
    }

    #[test]
    fn test_children_sorted_by_full_tag() {
        let mut root = SchemaNode::root();
        let doc = root.add_child(&TagIdentity::unqualified("doc"), &[]);
        // '{' sorts after ASCII letters, so qualified tags come last
        doc.add_child(
            &TagIdentity {
                full_tag: "{urn:z}a".to_string(),
                prefix: "z".to_string(),
                short_name: "a".to_string(),
            },
            &[],
        );
        doc.add_child(&TagIdentity::unqualified("b"), &[]);

        let doc = root.into_document_element().unwrap();
        assert_eq!(
            render(&doc, RenderMode::Overview),
            "doc{1}:\n  b{1}:\n  z:a{1}:\n"
        );
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &sample()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            concat!(
                "Overview\n",
                "========\n",
                "r{1}:\n",
                "  a{2}:\n",
                "  b{1}:\n",
                "\n",
                "\n",
                "Details\n",
                "=======\n",
                "r{1}:\n",
                "  a{2} (\n",
                "   x{1}\n",
                "  ):\n",
                "  b{1}:\n",
                "\n",
            )
        );
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.tag, "r");
        assert_eq!(summary.count, 1);
        let names: Vec<_> = summary.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            summary.children[0].attributes,
            vec![AttributeSummary {
                tag: "x".to_string(),
                name: "x".to_string(),
                count: 1,
            }]
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["children"][0]["count"], 2);
        assert_eq!(json["children"][0]["attributes"][0]["name"], "x");
        assert!(json.get("prefix").is_none());
        assert!(json["children"][1].get("attributes").is_none());
    }
}
