//! Name utilities for tree analysis.

use crate::token::TokenType;
use crate::tree::Node;

/// Builds the dotted name of an `IDENT` or a `DOT` chain.
///
/// # Example
///
/// ```ignore
/// // For `java.lang.Override` parsed as DOT(DOT(java, lang), Override)
/// assert_eq!(qualified_name(dot), "java.lang.Override");
/// ```
#[must_use]
pub fn qualified_name(node: Node<'_>) -> String {
    match node.token_type() {
        TokenType::Dot => node
            .children()
            .filter(|c| !matches!(c.token_type(), TokenType::TypeArguments))
            .map(qualified_name)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("."),
        TokenType::Ident | TokenType::Star => node.text().to_string(),
        _ => String::new(),
    }
}

/// Name of a declaration: the text of its `IDENT` child.
#[must_use]
pub fn declared_name<'t>(declaration: Node<'t>) -> Option<&'t str> {
    declaration
        .find_first_token(TokenType::Ident)
        .map(Node::text)
}

/// Extracts the last segment from a dotted name.
#[must_use]
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Returns true if `name` equals `simple` or is a qualified form of it.
#[must_use]
pub fn matches_simple_name(name: &str, simple: &str) -> bool {
    name == simple || last_segment(name) == simple
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Span, TreeBuilder};

    #[test]
    fn test_qualified_name_from_dot_chain() {
        let mut b = TreeBuilder::new();
        b.open(TokenType::CompilationUnit, "", Span::at(1, 0, 0));
        b.open(TokenType::Dot, ".", Span::at(1, 9, 1));
        b.open(TokenType::Dot, ".", Span::at(1, 4, 1));
        b.leaf(TokenType::Ident, "java", Span::at(1, 0, 4));
        b.leaf(TokenType::Ident, "lang", Span::at(1, 5, 4));
        b.close();
        b.leaf(TokenType::Ident, "Override", Span::at(1, 10, 8));
        b.close();
        b.close();
        let tree = b.finish().unwrap();
        let dot = tree.root().first_child().unwrap();
        assert_eq!(qualified_name(dot), "java.lang.Override");
        assert_eq!(qualified_name(tree.root()), "");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("java.lang.Override"), "Override");
        assert_eq!(last_segment("Override"), "Override");
    }

    #[test]
    fn test_matches_simple_name() {
        assert!(matches_simple_name("java.lang.SuppressWarnings", "SuppressWarnings"));
        assert!(matches_simple_name("SuppressWarnings", "SuppressWarnings"));
        assert!(!matches_simple_name("my.Suppress", "SuppressWarnings"));
    }
}
