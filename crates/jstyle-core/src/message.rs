//! Message arguments and template rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One positional argument of a violation message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageArg {
    /// Integer argument (counts, limits).
    Int(i64),
    /// Text argument (names, patterns).
    Str(String),
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MessageArg {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<usize> for MessageArg {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for MessageArg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Builds a `Vec<MessageArg>` from heterogeneous values.
///
/// ```
/// use jstyle_core::{args, MessageArg};
///
/// let a = args![3usize, "Foo"];
/// assert_eq!(a, vec![MessageArg::Int(3), MessageArg::Str("Foo".into())]);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::MessageArg>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::MessageArg::from($arg)),+]
    };
}

/// Substitutes `{0}`, `{1}`, ... in `template` with `args`.
///
/// Placeholders without a matching argument are left as they are.
#[must_use]
pub fn render(template: &str, args: &[MessageArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
        match placeholder {
            Some((i, close)) if i < args.len() => {
                out.push_str(&args[i].to_string());
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_positional_placeholders() {
        let text = render(
            "Throws count is {0} (max allowed is {1}).",
            &args![3usize, 1usize],
        );
        assert_eq!(text, "Throws count is 3 (max allowed is 1).");
    }

    #[test]
    fn keeps_unmatched_placeholders() {
        assert_eq!(render("{0} and {1}", &args!["a"]), "a and {1}");
        assert_eq!(render("{x} {", &[]), "{x} {");
    }
}
