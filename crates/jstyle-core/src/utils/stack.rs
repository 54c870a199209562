//! Owned stack for checks that track nested scopes.

/// A stack of per-scope state, pushed on `visit_token` and popped on the
/// matching `leave_token`.
///
/// Checks must [`clear`](Self::clear) it in `reset_for_file`.
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    frames: Vec<T>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> ScopeStack<T> {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a scope.
    pub fn push(&mut self, frame: T) {
        self.frames.push(frame);
    }

    /// Leaves the innermost scope.
    pub fn pop(&mut self) -> Option<T> {
        self.frames.pop()
    }

    /// Innermost scope.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.frames.last()
    }

    /// Innermost scope, mutably.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.frames.last_mut()
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true when no scope is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops every scope.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Scopes from innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter().rev()
    }

    /// Scopes from innermost to outermost, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.frames.iter_mut().rev()
    }
}
