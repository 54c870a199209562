//! Check limiting the number of `return` statements per method, constructor
//! or lambda.
//!
//! # Rationale
//!
//! Many exit points make a method hard to follow. Void bodies get a
//! stricter limit since a bare `return;` is mostly early-exit flow control.
//!
//! # Configuration
//!
//! - `max`: Maximum returns in non-void methods and lambdas (default: 2)
//! - `max_for_void`: Maximum returns in void methods, constructors and
//!   lambdas (default: 1)
//! - `format`: Names of methods to skip (default: `^equals$`)
//!
//! Whether a body is void is decided by its last `return`.

use jstyle_core::utils::{PatternMatcher, ScopeStack};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for return-count.
pub const CODE: &str = "JS007";

/// Check name for return-count.
pub const NAME: &str = "return-count";

/// Message key for non-void bodies.
pub const MSG_KEY: &str = "return.count";

/// Message key for void bodies.
pub const MSG_KEY_VOID: &str = "return.countVoid";

const DEFAULT_FORMAT: &str = "^equals$";

#[derive(Debug)]
struct Context {
    checking: bool,
    count: usize,
    max_allowed: Option<usize>,
    void: bool,
}

impl Context {
    fn new(checking: bool) -> Self {
        Self {
            checking,
            count: 0,
            max_allowed: None,
            void: false,
        }
    }
}

/// Limits `return` statements per body.
#[derive(Debug)]
pub struct ReturnCount {
    /// Maximum returns in non-void bodies.
    pub max: usize,
    /// Maximum returns in void bodies.
    pub max_for_void: usize,
    /// Method names to skip.
    pub format: PatternMatcher,
    contexts: ScopeStack<Context>,
}

impl ReturnCount {
    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails on malformed numbers or an invalid `format` pattern.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            max: options.usize("max", 2)?,
            max_for_void: options.usize("max_for_void", 1)?,
            format: PatternMatcher::from_options(options, "format", DEFAULT_FORMAT)?,
            contexts: ScopeStack::new(),
        }))
    }
}

impl Check for ReturnCount {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of return statements per method, constructor or lambda"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::CtorDef,
            TokenType::MethodDef,
            TokenType::Lambda,
            TokenType::LiteralReturn,
        ]
    }

    fn required_tokens(&self) -> &'static [TokenType] {
        &[TokenType::LiteralReturn]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                MSG_KEY,
                "Return count is {0} (max allowed for non-void methods/lambdas is {1}).",
            ),
            (
                MSG_KEY_VOID,
                "Return count is {0} (max allowed for void methods/constructors/lambdas is {1}).",
            ),
        ]
    }

    fn reset_for_file(&mut self) {
        self.contexts.clear();
    }

    fn visit_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        match node.token_type() {
            TokenType::CtorDef | TokenType::MethodDef => {
                let name = node
                    .find_first_token(TokenType::Ident)
                    .ok_or_else(|| CheckError::unexpected(node))?;
                self.contexts
                    .push(Context::new(!self.format.matches(name.text())));
            }
            TokenType::Lambda => self.contexts.push(Context::new(true)),
            TokenType::LiteralReturn => {
                let void = node
                    .first_child()
                    .is_some_and(|c| c.token_type() == TokenType::Semi);
                let max = if void { self.max_for_void } else { self.max };
                // returns in initializers belong to no checked body
                if let Some(context) = self.contexts.peek_mut() {
                    context.void = void;
                    context.max_allowed = Some(max);
                    context.count += 1;
                }
            }
            _ => return Err(CheckError::unexpected(node)),
        }
        Ok(())
    }

    fn leave_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.token_type() == TokenType::LiteralReturn {
            return Ok(());
        }
        let context = self
            .contexts
            .pop()
            .ok_or_else(|| CheckError::new("return context stack underflow"))?;
        if let Some(max) = context.max_allowed {
            if context.checking && context.count > max {
                let key = if context.void { MSG_KEY_VOID } else { MSG_KEY };
                ctx.log(node, key, args![context.count, max]);
            }
        }
        Ok(())
    }
}
