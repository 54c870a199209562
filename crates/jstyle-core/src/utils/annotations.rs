//! Annotation utilities for check implementations.

use crate::aggregator::SuppressionRegion;
use crate::token::TokenType;
use crate::tree::{Node, Tree};
use crate::utils::names::{matches_simple_name, qualified_name};

/// Prefix that scopes `@SuppressWarnings` values to this tool.
pub const SUPPRESS_PREFIX: &str = "jstyle:";

/// Annotations attached to a declaration (children of its `MODIFIERS`).
pub fn annotations<'t>(declaration: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    declaration
        .find_first_token(TokenType::Modifiers)
        .into_iter()
        .flat_map(Node::children)
        .filter(|n| n.token_type() == TokenType::Annotation)
}

/// Name of an annotation as written, possibly qualified.
#[must_use]
pub fn annotation_name(annotation: Node<'_>) -> String {
    annotation
        .children()
        .find(|c| matches!(c.token_type(), TokenType::Ident | TokenType::Dot))
        .map(qualified_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| annotation.text().to_string())
}

/// Checks if a declaration carries an annotation with the given simple name.
#[must_use]
pub fn has_annotation(declaration: Node<'_>, simple_name: &str) -> bool {
    annotations(declaration).any(|a| matches_simple_name(&annotation_name(a), simple_name))
}

/// String values of an annotation's arguments, without quotes.
pub fn string_values<'t>(annotation: Node<'t>) -> impl Iterator<Item = String> + 't {
    annotation
        .descendants()
        .filter(|n| n.token_type() == TokenType::StringLiteral)
        .map(|n| unquote(n.text()).to_string())
}

/// Collects suppression regions from `@SuppressWarnings` annotations.
///
/// A value of `"all"` suppresses every check; `"jstyle:<name>"` (or a bare
/// check name) suppresses one check. The region covers the annotated
/// declaration.
#[must_use]
pub fn suppress_warnings_regions(tree: &Tree) -> Vec<SuppressionRegion> {
    let mut regions = Vec::new();
    for annotation in tree
        .iter()
        .filter(|n| n.token_type() == TokenType::Annotation)
    {
        if !matches_simple_name(&annotation_name(annotation), "SuppressWarnings") {
            continue;
        }
        let Some(target) = annotation
            .parent()
            .filter(|p| p.token_type() == TokenType::Modifiers)
            .and_then(Node::parent)
        else {
            continue;
        };

        for value in string_values(annotation) {
            let value = value.trim().to_ascii_lowercase();
            let check = if value == "all" {
                None
            } else {
                Some(value.strip_prefix(SUPPRESS_PREFIX).unwrap_or(&value).to_string())
            };
            regions.push(SuppressionRegion {
                first_line: target.line(),
                last_line: target.end_line(),
                check,
            });
        }
    }
    regions
}

fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Span, TreeBuilder};

    /// `@SuppressWarnings({"jstyle:throws-count", "all"}) void m() {}` on lines 3-6.
    fn annotated_method() -> Tree {
        let mut b = TreeBuilder::new();
        b.open(TokenType::CompilationUnit, "", Span::at(1, 0, 0));
        b.open(TokenType::MethodDef, "m", Span::new(3, 2, 6, 3));
        b.open(TokenType::Modifiers, "", Span::at(3, 2, 0));
        b.open(TokenType::Annotation, "SuppressWarnings", Span::at(3, 2, 17));
        b.leaf(TokenType::At, "@", Span::at(3, 2, 1));
        b.leaf(TokenType::Ident, "SuppressWarnings", Span::at(3, 3, 16));
        b.open(TokenType::AnnotationArrayInit, "{", Span::at(3, 20, 1));
        b.leaf(TokenType::StringLiteral, "\"jstyle:throws-count\"", Span::at(3, 21, 21));
        b.leaf(TokenType::StringLiteral, "\"all\"", Span::at(3, 44, 5));
        b.close();
        b.close();
        b.leaf(TokenType::LiteralPublic, "public", Span::at(4, 2, 6));
        b.close();
        b.leaf(TokenType::Ident, "m", Span::at(4, 14, 1));
        b.close();
        b.close();
        b.finish().unwrap()
    }

    #[test]
    fn test_has_annotation() {
        let tree = annotated_method();
        let method = tree.root().first_child().unwrap();
        assert!(has_annotation(method, "SuppressWarnings"));
        assert!(!has_annotation(method, "Override"));
        assert_eq!(annotations(method).count(), 1);
    }

    #[test]
    fn test_string_values() {
        let tree = annotated_method();
        let method = tree.root().first_child().unwrap();
        let annotation = annotations(method).next().unwrap();
        let values: Vec<_> = string_values(annotation).collect();
        assert_eq!(values, vec!["jstyle:throws-count", "all"]);
    }

    #[test]
    fn test_suppress_warnings_regions() {
        let tree = annotated_method();
        let regions = suppress_warnings_regions(&tree);
        assert_eq!(
            regions,
            vec![
                SuppressionRegion::for_check(3, 6, "throws-count"),
                SuppressionRegion::all(3, 6),
            ]
        );
    }
}
