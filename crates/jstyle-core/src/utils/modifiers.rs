//! Modifier queries on declarations.

use crate::token::TokenType;
use crate::tree::Node;
use crate::utils::scope::AccessModifier;

/// The `MODIFIERS` child of a declaration.
#[derive(Debug, Clone, Copy)]
pub struct Modifiers<'t> {
    node: Option<Node<'t>>,
}

impl<'t> Modifiers<'t> {
    /// Modifiers of `declaration`; empty when it has no `MODIFIERS` child.
    #[must_use]
    pub fn of(declaration: Node<'t>) -> Self {
        Self {
            node: declaration.find_first_token(TokenType::Modifiers),
        }
    }

    /// The `MODIFIERS` node itself.
    #[must_use]
    pub fn node(self) -> Option<Node<'t>> {
        self.node
    }

    /// Returns true if the modifier keyword is present.
    #[must_use]
    pub fn has(self, modifier: TokenType) -> bool {
        self.keywords().any(|m| m.token_type() == modifier)
    }

    /// Modifier keywords, without annotations.
    pub fn keywords(self) -> impl Iterator<Item = Node<'t>> {
        self.node
            .into_iter()
            .flat_map(Node::children)
            .filter(|n| n.token_type().is_modifier())
    }

    /// `public`.
    #[must_use]
    pub fn is_public(self) -> bool {
        self.has(TokenType::LiteralPublic)
    }

    /// `protected`.
    #[must_use]
    pub fn is_protected(self) -> bool {
        self.has(TokenType::LiteralProtected)
    }

    /// `private`.
    #[must_use]
    pub fn is_private(self) -> bool {
        self.has(TokenType::LiteralPrivate)
    }

    /// `static`.
    #[must_use]
    pub fn is_static(self) -> bool {
        self.has(TokenType::LiteralStatic)
    }

    /// `final`.
    #[must_use]
    pub fn is_final(self) -> bool {
        self.has(TokenType::Final)
    }

    /// `abstract`.
    #[must_use]
    pub fn is_abstract(self) -> bool {
        self.has(TokenType::Abstract)
    }

    /// Access level written in source, `None` when no access keyword is present.
    #[must_use]
    pub fn explicit_access(self) -> Option<AccessModifier> {
        if self.is_public() {
            Some(AccessModifier::Public)
        } else if self.is_protected() {
            Some(AccessModifier::Protected)
        } else if self.is_private() {
            Some(AccessModifier::Private)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Span, Tree, TreeBuilder};

    fn method_with(modifiers: &[(TokenType, &str)]) -> Tree {
        let mut b = TreeBuilder::new();
        b.open(TokenType::CompilationUnit, "", Span::at(1, 0, 0));
        b.open(TokenType::MethodDef, "m", Span::at(1, 0, 1));
        b.open(TokenType::Modifiers, "", Span::at(1, 0, 0));
        for (i, (token, text)) in modifiers.iter().enumerate() {
            b.leaf(*token, *text, Span::at(1, i * 8, text.len()));
        }
        b.close();
        b.close();
        b.close();
        b.finish().unwrap()
    }

    #[test]
    fn detects_keywords() {
        let tree = method_with(&[
            (TokenType::LiteralPrivate, "private"),
            (TokenType::LiteralStatic, "static"),
        ]);
        let modifiers = Modifiers::of(tree.root().first_child().unwrap());
        assert!(modifiers.is_private());
        assert!(modifiers.is_static());
        assert!(!modifiers.is_final());
        assert_eq!(modifiers.explicit_access(), Some(AccessModifier::Private));
        assert_eq!(modifiers.keywords().count(), 2);
    }

    #[test]
    fn missing_modifiers_are_empty() {
        let tree = method_with(&[]);
        let modifiers = Modifiers::of(tree.root());
        assert!(modifiers.node().is_none());
        assert_eq!(modifiers.explicit_access(), None);
    }
}
