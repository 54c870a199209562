//! Utility functions for check implementations.

pub mod annotations;
pub mod format;
pub mod modifiers;
pub mod names;
pub mod scope;
pub mod stack;
pub mod suppress_comments;

// Re-export commonly used utilities for check implementations
#[doc(inline)]
pub use annotations::{annotation_name, annotations, has_annotation};
#[doc(inline)]
pub use format::PatternMatcher;
#[doc(inline)]
pub use modifiers::Modifiers;
#[doc(inline)]
pub use names::{declared_name, qualified_name};
#[doc(inline)]
pub use scope::AccessModifier;
#[doc(inline)]
pub use stack::ScopeStack;
#[doc(inline)]
pub use suppress_comments::CommentMarkers;
