//! Check for the placement of left curly braces.
//!
//! # Configuration
//!
//! - `option`: Brace policy (default: `eol`)
//!   - `eol`: the brace ends the line of the construct it opens
//!   - `nl`: the brace starts a new line
//!   - `nlow`: `eol` when the construct fits on one line, `nl` when it wraps
//! - `ignore_enums`: Skip the line-break-after rule for enum bodies
//!   (default: true)
//!
//! Empty blocks written as `{}` are never reported.

use jstyle_core::utils::annotations;
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};
use std::fmt;
use std::str::FromStr;

/// Check code for left-curly.
pub const CODE: &str = "JS010";

/// Check name for left-curly.
pub const NAME: &str = "left-curly";

/// Message key for a brace that should start a new line.
pub const MSG_KEY_LINE_NEW: &str = "line.new";

/// Message key for a brace that should end the previous line.
pub const MSG_KEY_LINE_PREVIOUS: &str = "line.previous";

/// Message key for a brace not followed by a line break.
pub const MSG_KEY_LINE_BREAK_AFTER: &str = "line.break.after";

const OPEN_CURLY_BRACE: &str = "{";

const TOKENS: &[TokenType] = &[
    TokenType::AnnotationDef,
    TokenType::ClassDef,
    TokenType::CtorDef,
    TokenType::EnumConstantDef,
    TokenType::EnumDef,
    TokenType::InterfaceDef,
    TokenType::Lambda,
    TokenType::LiteralCase,
    TokenType::LiteralCatch,
    TokenType::LiteralDefault,
    TokenType::LiteralDo,
    TokenType::LiteralElse,
    TokenType::LiteralFinally,
    TokenType::LiteralFor,
    TokenType::LiteralIf,
    TokenType::LiteralSwitch,
    TokenType::LiteralSynchronized,
    TokenType::LiteralTry,
    TokenType::LiteralWhile,
    TokenType::MethodDef,
    TokenType::ObjBlock,
    TokenType::StaticInit,
    TokenType::RecordDef,
    TokenType::CompactCtorDef,
];

/// Brace placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftCurlyOption {
    /// End of line.
    Eol,
    /// New line.
    Nl,
    /// New line on wrap.
    Nlow,
}

impl FromStr for LeftCurlyOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eol" => Ok(Self::Eol),
            "nl" => Ok(Self::Nl),
            "nlow" => Ok(Self::Nlow),
            other => Err(format!("expected one of eol, nl, nlow, got `{other}`")),
        }
    }
}

impl fmt::Display for LeftCurlyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eol => "eol",
            Self::Nl => "nl",
            Self::Nlow => "nlow",
        })
    }
}

fn whitespace_before(column: usize, line: &str) -> bool {
    line.chars().take(column).all(char::is_whitespace)
}

fn first_slist_child(node: Option<Node<'_>>) -> Option<Node<'_>> {
    node.and_then(Node::first_child)
        .filter(|c| c.token_type() == TokenType::Slist)
}

/// The first token of a declaration once leading annotations are skipped.
fn skip_modifier_annotations(declaration: Node<'_>) -> Node<'_> {
    let Some(modifiers) = declaration.find_first_token(TokenType::Modifiers) else {
        return declaration;
    };
    let Some(first) = annotations(declaration).next() else {
        return declaration;
    };
    let mut last = first;
    while let Some(next) = last
        .next_sibling()
        .filter(|n| n.token_type() == TokenType::Annotation)
    {
        last = next;
    }
    last.next_sibling()
        .or_else(|| modifiers.next_sibling())
        .unwrap_or(declaration)
}

/// The block of a `case`/`default` label, if it opens one.
fn switch_member_brace(label: Node<'_>) -> Option<Node<'_>> {
    let parent = label.parent()?;
    if parent.token_type() == TokenType::SwitchRule {
        return parent.find_first_token(TokenType::Slist);
    }
    let mut next = label.next_sibling();
    while let Some(sibling) = next.filter(|n| n.token_type() == TokenType::Colon) {
        next = sibling.next_sibling();
    }
    first_slist_child(next.filter(|n| n.token_type() == TokenType::Slist))
}

/// Checks the placement of `{`.
#[derive(Debug, Clone)]
pub struct LeftCurly {
    /// Brace placement policy.
    pub option: LeftCurlyOption,
    /// Skip the line-break-after rule for enum bodies.
    pub ignore_enums: bool,
}

impl Default for LeftCurly {
    fn default() -> Self {
        Self::new()
    }
}

impl LeftCurly {
    /// Creates a new check using `eol`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            option: LeftCurlyOption::Eol,
            ignore_enums: true,
        }
    }

    /// Sets the brace placement policy.
    #[must_use]
    pub fn option(mut self, option: LeftCurlyOption) -> Self {
        self.option = option;
        self
    }

    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails on an unknown policy or a malformed flag.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        let mut check = Self::new().option(options.choice("option", LeftCurlyOption::Eol)?);
        check.ignore_enums = options.bool("ignore_enums", true)?;
        Ok(Box::new(check))
    }

    /// Start token and brace for a visited node.
    fn locate<'t>(node: Node<'t>) -> (Node<'t>, Option<Node<'t>>) {
        match node.token_type() {
            TokenType::CtorDef | TokenType::MethodDef | TokenType::CompactCtorDef => (
                skip_modifier_annotations(node),
                node.find_first_token(TokenType::Slist),
            ),
            TokenType::InterfaceDef
            | TokenType::ClassDef
            | TokenType::AnnotationDef
            | TokenType::EnumDef
            | TokenType::EnumConstantDef
            | TokenType::RecordDef => (
                skip_modifier_annotations(node),
                node.find_first_token(TokenType::ObjBlock)
                    .and_then(|block| block.find_first_token(TokenType::Lcurly)),
            ),
            TokenType::LiteralElse => (node, first_slist_child(Some(node))),
            TokenType::LiteralCase | TokenType::LiteralDefault => {
                (node, switch_member_brace(node))
            }
            TokenType::ObjBlock | TokenType::LiteralSwitch => {
                (node, node.find_first_token(TokenType::Lcurly))
            }
            _ => (node, node.find_first_token(TokenType::Slist)),
        }
    }

    fn has_line_break_after(&self, brace: Node<'_>) -> bool {
        let next = if brace.token_type() == TokenType::Slist {
            brace.first_child()
        } else {
            let enum_body = brace
                .parent()
                .and_then(Node::parent)
                .is_some_and(|owner| owner.token_type() == TokenType::EnumDef);
            if !self.ignore_enums && enum_body {
                brace.next_sibling()
            } else {
                None
            }
        };
        next.map_or(true, |next| {
            next.token_type() == TokenType::Rcurly || next.line() != brace.line()
        })
    }

    fn verify(&self, brace: Node<'_>, start: Node<'_>, ctx: &mut CheckContext<'_>) {
        let line = ctx.line(brace.line());
        let column = brace.column();
        if line.chars().nth(column + 1) == Some('}') {
            return;
        }
        let brace_args = || args![OPEN_CURLY_BRACE, column + 1];
        let on_own_line = whitespace_before(column, line);
        match self.option {
            LeftCurlyOption::Nl => {
                if !on_own_line {
                    ctx.log(brace, MSG_KEY_LINE_NEW, brace_args());
                }
            }
            LeftCurlyOption::Eol => {
                if on_own_line {
                    ctx.log(brace, MSG_KEY_LINE_PREVIOUS, brace_args());
                }
                if !self.has_line_break_after(brace) {
                    ctx.log(brace, MSG_KEY_LINE_BREAK_AFTER, brace_args());
                }
            }
            LeftCurlyOption::Nlow => {
                if start.line() == brace.line() {
                    return;
                }
                if start.line() + 1 == brace.line() {
                    let key = if on_own_line {
                        MSG_KEY_LINE_PREVIOUS
                    } else {
                        MSG_KEY_LINE_NEW
                    };
                    ctx.log(brace, key, brace_args());
                } else if !on_own_line {
                    ctx.log(brace, MSG_KEY_LINE_NEW, brace_args());
                }
            }
        }
    }
}

impl Check for LeftCurly {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks the placement of left curly braces"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        TOKENS
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (MSG_KEY_LINE_NEW, "'{0}' at column {1} should be on a new line."),
            (
                MSG_KEY_LINE_PREVIOUS,
                "'{0}' at column {1} should be on the previous line.",
            ),
            (
                MSG_KEY_LINE_BREAK_AFTER,
                "'{0}' at column {1} should have line break after.",
            ),
        ]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let (start, brace) = Self::locate(node);
        if let Some(brace) = brace {
            self.verify(brace, start, ctx);
        }
        Ok(())
    }
}
