//! Traversal engine dispatching tree nodes to checks.

use crate::aggregator::ViolationAggregator;
use crate::check::{CheckBox, CheckError};
use crate::comments::CommentIndex;
use crate::config::ConfigError;
use crate::contents::{FileContents, DEFAULT_TAB_WIDTH};
use crate::context::{CheckContext, Reporter};
use crate::token::TokenType;
use crate::tree::{Node, Tree};
use crate::types::{FileError, Severity, Violation};
use tracing::{debug, trace};

/// A check together with its configured severity and token selection.
pub struct ConfiguredCheck {
    check: CheckBox,
    severity: Option<Severity>,
    tokens: Option<Vec<TokenType>>,
}

impl ConfiguredCheck {
    /// Uses the check's default severity and tokens.
    #[must_use]
    pub fn new(check: CheckBox) -> Self {
        Self {
            check,
            severity: None,
            tokens: None,
        }
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Replaces the default tokens; each must be acceptable to the check.
    #[must_use]
    pub fn with_tokens(mut self, tokens: Vec<TokenType>) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

impl<C: crate::check::Check + 'static> From<C> for ConfiguredCheck {
    fn from(check: C) -> Self {
        Self::new(Box::new(check))
    }
}

struct Registered {
    check: CheckBox,
    reporter: Reporter<'static>,
    tokens: Vec<TokenType>,
    buffer: Vec<Violation>,
}

/// Walks token trees and drives the registered checks.
///
/// A walker owns its check instances and is reused across files; it is not
/// shared between threads.
pub struct TreeWalker {
    checks: Vec<Registered>,
    by_token: Vec<Vec<usize>>,
    tab_width: usize,
}

impl TreeWalker {
    /// Registers `checks` in order against a parser's token universe.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IllegalToken`] when a configured token is not
    /// acceptable to its check, and [`ConfigError::UnsupportedToken`] when a
    /// registered or required token is outside `universe`.
    pub fn new(checks: Vec<ConfiguredCheck>, universe: &[TokenType]) -> Result<Self, ConfigError> {
        let mut registered = Vec::with_capacity(checks.len());
        let mut by_token = vec![Vec::new(); TokenType::COUNT];

        for (index, configured) in checks.into_iter().enumerate() {
            let check = configured.check;
            let mut tokens = match configured.tokens {
                Some(selected) => {
                    if let Some(bad) = selected
                        .iter()
                        .find(|t| !check.acceptable_tokens().contains(t))
                    {
                        return Err(ConfigError::IllegalToken {
                            check: check.name().to_string(),
                            token: bad.name().to_string(),
                        });
                    }
                    selected
                }
                None => check.default_tokens().to_vec(),
            };
            tokens.extend(check.required_tokens());
            let mut seen = [false; TokenType::COUNT];
            tokens.retain(|t| !std::mem::replace(&mut seen[t.index()], true));

            if let Some(bad) = tokens.iter().find(|t| !universe.contains(t)) {
                return Err(ConfigError::UnsupportedToken {
                    check: check.name().to_string(),
                    token: bad.name().to_string(),
                });
            }

            for token in &tokens {
                by_token[token.index()].push(index);
            }
            debug!(
                "Registered check {} ({}) for {} token type(s)",
                check.name(),
                check.code(),
                tokens.len()
            );

            registered.push(Registered {
                reporter: Reporter {
                    name: check.name(),
                    code: check.code(),
                    severity: configured.severity.unwrap_or_else(|| check.default_severity()),
                    messages: check.messages(),
                },
                check,
                tokens,
                buffer: Vec::new(),
            });
        }

        Ok(Self {
            checks: registered,
            by_token,
            tab_width: DEFAULT_TAB_WIDTH,
        })
    }

    /// Sets the tab width used for reported columns.
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Number of registered checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Names of the registered checks in registration order.
    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|c| c.reporter.name)
    }

    /// Token types registered for the check at `index`.
    #[must_use]
    pub fn registered_tokens(&self, index: usize) -> Option<&[TokenType]> {
        self.checks.get(index).map(|c| c.tokens.as_slice())
    }

    /// Walks one file and returns the violations of every check, tagged with
    /// the check's registration order.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Check`] when a check fails; everything collected
    /// for the file is discarded.
    pub fn walk(
        &mut self,
        tree: &Tree,
        contents: &FileContents,
        comments: &CommentIndex<'_>,
    ) -> Result<ViolationAggregator, FileError> {
        let result = self.process(tree, contents, comments);
        let mut aggregator = ViolationAggregator::new();
        for (order, registered) in self.checks.iter_mut().enumerate() {
            let violations = std::mem::take(&mut registered.buffer);
            if result.is_ok() {
                aggregator.extend(order, violations);
            }
        }
        result.map(|()| aggregator)
    }

    fn process(
        &mut self,
        tree: &Tree,
        contents: &FileContents,
        comments: &CommentIndex<'_>,
    ) -> Result<(), FileError> {
        let root = tree.root();
        trace!("Walking {} ({} nodes)", contents.path().display(), tree.len());

        for index in 0..self.checks.len() {
            let registered = &mut self.checks[index];
            registered.check.reset_for_file();
            registered.buffer.clear();
            self.notify(index, root, contents, comments, Phase::Begin)?;
        }

        let mut current = Some(root);
        while let Some(node) = current {
            self.dispatch(node, contents, comments, Phase::Visit)?;
            if let Some(child) = node.first_child() {
                current = Some(child);
                continue;
            }
            let mut done = node;
            current = loop {
                self.dispatch(done, contents, comments, Phase::Leave)?;
                if let Some(sibling) = done.next_sibling() {
                    break Some(sibling);
                }
                match done.parent() {
                    Some(parent) => done = parent,
                    None => break None,
                }
            };
        }

        for index in 0..self.checks.len() {
            self.notify(index, root, contents, comments, Phase::Finish)?;
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        node: Node<'_>,
        contents: &FileContents,
        comments: &CommentIndex<'_>,
        phase: Phase,
    ) -> Result<(), FileError> {
        let interested = std::mem::take(&mut self.by_token[node.token_type().index()]);
        let result = interested
            .iter()
            .try_for_each(|&index| self.notify(index, node, contents, comments, phase));
        self.by_token[node.token_type().index()] = interested;
        result
    }

    fn notify(
        &mut self,
        index: usize,
        node: Node<'_>,
        contents: &FileContents,
        comments: &CommentIndex<'_>,
        phase: Phase,
    ) -> Result<(), FileError> {
        let Registered {
            check,
            reporter,
            buffer,
            ..
        } = &mut self.checks[index];
        let mut ctx = CheckContext::new(contents, comments, self.tab_width, *reporter, buffer);
        let outcome = match phase {
            Phase::Begin => check.begin_tree(node, &mut ctx),
            Phase::Visit => check.visit_token(node, &mut ctx),
            Phase::Leave => check.leave_token(node, &mut ctx),
            Phase::Finish => check.finish_tree(node, &mut ctx),
        };
        outcome.map_err(|e: CheckError| FileError::Check {
            check: reporter.name.to_string(),
            line: node.line(),
            column: node.column(),
            message: e.message,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Begin,
    Visit,
    Leave,
    Finish,
}
