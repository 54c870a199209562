//! Access scope and enclosing-block queries.

use crate::token::TokenType;
use crate::tree::Node;
use crate::utils::modifiers::Modifiers;
use serde::Serialize;
use std::fmt;

/// Java access levels, from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No keyword.
    Package,
    /// `private`
    Private,
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Package => "package",
            Self::Private => "private",
        })
    }
}

/// Effective access of a declaration, applying the implicit `public` of
/// interface and annotation members and enum constants.
#[must_use]
pub fn declared_access(declaration: Node<'_>) -> AccessModifier {
    if declaration.token_type() == TokenType::EnumConstantDef {
        return AccessModifier::Public;
    }
    Modifiers::of(declaration)
        .explicit_access()
        .unwrap_or_else(|| {
            if in_interface_or_annotation_block(declaration) {
                AccessModifier::Public
            } else {
                AccessModifier::Package
            }
        })
}

/// The most restrictive access among the type declarations enclosing `node`.
/// Anonymous classes count as private.
#[must_use]
pub fn surrounding_access(node: Node<'_>) -> Option<AccessModifier> {
    let mut result: Option<AccessModifier> = None;
    for ancestor in node.ancestors() {
        let access = if ancestor.token_type().is_type_declaration() {
            declared_access(ancestor)
        } else if ancestor.token_type() == TokenType::LiteralNew
            && ancestor.find_first_token(TokenType::ObjBlock).is_some()
        {
            AccessModifier::Private
        } else {
            continue;
        };
        result = Some(result.map_or(access, |r| r.max(access)));
    }
    result
}

/// The nearest enclosing type-like block: a type declaration, or a
/// `LITERAL_NEW` with a body for anonymous classes.
#[must_use]
pub fn enclosing_type(node: Node<'_>) -> Option<Node<'_>> {
    node.ancestors().find(|a| {
        a.token_type().is_type_declaration()
            || (a.token_type() == TokenType::LiteralNew
                && a.find_first_token(TokenType::ObjBlock).is_some())
    })
}

/// Returns true if the nearest enclosing type is an interface.
#[must_use]
pub fn in_interface_block(node: Node<'_>) -> bool {
    enclosing_type(node).is_some_and(|t| t.token_type() == TokenType::InterfaceDef)
}

/// Returns true if the nearest enclosing type is an interface or an
/// annotation type.
#[must_use]
pub fn in_interface_or_annotation_block(node: Node<'_>) -> bool {
    enclosing_type(node).is_some_and(|t| {
        matches!(
            t.token_type(),
            TokenType::InterfaceDef | TokenType::AnnotationDef
        )
    })
}

/// Returns true if the nearest enclosing type is an enum.
#[must_use]
pub fn in_enum_block(node: Node<'_>) -> bool {
    enclosing_type(node).is_some_and(|t| t.token_type() == TokenType::EnumDef)
}

/// Returns true if the nearest enclosing type is an anonymous class body.
#[must_use]
pub fn in_anonymous_class(node: Node<'_>) -> bool {
    enclosing_type(node).is_some_and(|t| t.token_type() == TokenType::LiteralNew)
}

/// Returns true if `node` sits inside a method, constructor, initializer or
/// lambda body.
#[must_use]
pub fn in_code_block(node: Node<'_>) -> bool {
    node.ancestors().any(|a| {
        matches!(
            a.token_type(),
            TokenType::Slist
                | TokenType::StaticInit
                | TokenType::InstanceInit
                | TokenType::Lambda
        )
    })
}
