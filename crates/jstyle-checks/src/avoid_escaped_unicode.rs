//! Check forbidding Unicode escapes in string, char and text block literals.
//!
//! # Rationale
//!
//! `"\u03bc"` is harder to read than `"μ"`. Escapes remain acceptable for
//! characters that cannot be typed or seen, which the options below allow.
//!
//! # Configuration
//!
//! - `allow_escapes_for_control_characters`: Allow literals whose escapes
//!   are all control characters (default: false)
//! - `allow_by_tail_comment`: Allow literals followed by a trailing comment
//!   on the same line (default: false)
//! - `allow_if_all_characters_escaped`: Allow literals consisting of escapes
//!   only (default: false)
//! - `allow_non_printable_escapes`: Allow literals whose escapes are all
//!   non-printable characters (default: false)

use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for avoid-escaped-unicode.
pub const CODE: &str = "JS002";

/// Check name for avoid-escaped-unicode.
pub const NAME: &str = "avoid-escaped-unicode";

/// Message key.
pub const MSG_KEY: &str = "forbid.escaped.unicode.char";

/// Code points treated as control characters (inclusive ranges).
const CONTROL: &[(u32, u32)] = &[
    (0x0000, 0x001F),
    (0x007F, 0x009F),
    (0x00AD, 0x00AD),
    (0x034F, 0x034F),
    (0x070F, 0x070F),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
];

/// Code points that render as nothing or as blank space.
const NON_PRINTABLE: &[(u32, u32)] = &[
    (0x0000, 0x0000),
    (0x0009, 0x0009),
    (0x000B, 0x000C),
    (0x0020, 0x0020),
    (0x007F, 0x007F),
    (0x0085, 0x0085),
    (0x009F, 0x00A0),
    (0x00AD, 0x00AD),
    (0x04F9, 0x04F9),
    (0x05BE, 0x05BE),
    (0x05D0, 0x05D0),
    (0x05EA, 0x05EA),
    (0x05F3, 0x05F4),
    (0x0600, 0x0600),
    (0x0604, 0x0604),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x06FF, 0x06FF),
    (0x070F, 0x070F),
    (0x0750, 0x0750),
    (0x077F, 0x077F),
    (0x0E00, 0x0E00),
    (0x0E7F, 0x0E7F),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x1E00, 0x1E00),
    (0x2000, 0x200A),
    (0x200F, 0x200F),
    (0x2025, 0x2025),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x2064, 0x2064),
    (0x2066, 0x206A),
    (0x206F, 0x206F),
    (0x20AF, 0x20AF),
    (0x2100, 0x2100),
    (0x213A, 0x213A),
    (0x3000, 0x3000),
    (0xD800, 0xD800),
    (0xF8FF, 0xF8FF),
    (0xFB50, 0xFB50),
    (0xFDFF, 0xFDFF),
    (0xFE70, 0xFE70),
    (0xFEFF, 0xFEFF),
    (0xFF0E, 0xFF0E),
    (0xFF61, 0xFF61),
    (0xFFDC, 0xFFDC),
    (0xFFF9, 0xFFFB),
    (0xFFFF, 0xFFFF),
];

fn in_ranges(ranges: &[(u32, u32)], code_point: u32) -> bool {
    ranges
        .iter()
        .any(|&(low, high)| (low..=high).contains(&code_point))
}

/// Length in bytes of the Unicode escape starting at `at` (`\` followed by
/// one or more `u` and four hex digits), if any.
fn unicode_escape_len(text: &str, at: usize) -> Option<(usize, u32)> {
    let rest = text.get(at..)?.strip_prefix('\\')?;
    let digits_at = rest.len() - rest.trim_start_matches('u').len();
    if digits_at == 0 {
        return None;
    }
    let hex = rest.get(digits_at..digits_at + 4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let code_point = u32::from_str_radix(hex, 16).ok()?;
    Some((1 + digits_at + 4, code_point))
}

/// Code points of the Unicode escapes in `text`. A backslash preceded by an
/// odd number of backslashes is itself escaped and starts nothing.
fn unicode_escapes(text: &str) -> Vec<u32> {
    let mut escapes = Vec::new();
    let mut index = 0;
    while let Some(offset) = text.get(index..).and_then(|rest| rest.find('\\')) {
        let start = index + offset;
        let run = text[start..].len() - text[start..].trim_start_matches('\\').len();
        let last = start + run - 1;
        index = start + run;
        if run % 2 == 1 {
            if let Some((len, code_point)) = unicode_escape_len(text, last) {
                escapes.push(code_point);
                index = last + len;
            }
        }
    }
    escapes
}

/// Returns true when `literal` holds nothing but escape sequences, quotes
/// and line breaks.
fn only_escapes(literal: &str) -> bool {
    let mut rest = literal;
    while !rest.is_empty() {
        if let Some((len, _)) = unicode_escape_len(rest, 0) {
            rest = &rest[len..];
            continue;
        }
        let mut chars = rest.chars();
        rest = match chars.next() {
            Some('"' | '\'' | '\n' | '\r') => chars.as_str(),
            Some('\\') => match chars.next() {
                Some('b' | 'f' | 'n' | 'r' | 's' | 't' | '\\') => chars.as_str(),
                _ => return false,
            },
            _ => return false,
        };
    }
    true
}

/// Forbids Unicode escapes in literals.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AvoidEscapedUnicode {
    /// Allow escapes of control characters.
    pub allow_escapes_for_control_characters: bool,
    /// Allow literals with a trailing comment.
    pub allow_by_tail_comment: bool,
    /// Allow literals consisting of escapes only.
    pub allow_if_all_characters_escaped: bool,
    /// Allow escapes of non-printable characters.
    pub allow_non_printable_escapes: bool,
}

impl AvoidEscapedUnicode {
    /// Creates a new check with every allowance disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails on malformed option values.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            allow_escapes_for_control_characters: options
                .bool("allow_escapes_for_control_characters", false)?,
            allow_by_tail_comment: options.bool("allow_by_tail_comment", false)?,
            allow_if_all_characters_escaped: options
                .bool("allow_if_all_characters_escaped", false)?,
            allow_non_printable_escapes: options.bool("allow_non_printable_escapes", false)?,
        }))
    }

    fn is_allowed(&self, node: Node<'_>, escapes: &[u32], ctx: &CheckContext<'_>) -> bool {
        (self.allow_by_tail_comment && ctx.comments().trailing_comment_after(node).is_some())
            || (self.allow_if_all_characters_escaped && only_escapes(node.text()))
            || (self.allow_escapes_for_control_characters
                && escapes.iter().all(|&c| in_ranges(CONTROL, c)))
            || (self.allow_non_printable_escapes
                && escapes.iter().all(|&c| in_ranges(NON_PRINTABLE, c)))
    }
}

impl Check for AvoidEscapedUnicode {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids Unicode escapes in string, char and text block literals"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::StringLiteral,
            TokenType::CharLiteral,
            TokenType::TextBlockContent,
        ]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_KEY, "Unicode escape(s) usage should be avoided.")]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let escapes = unicode_escapes(node.text());
        if !escapes.is_empty() && !self.is_allowed(node, &escapes, ctx) {
            ctx.log(node, MSG_KEY, args![]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_with};
    use jstyle_core::CheckSettings;

    fn lines(settings: CheckSettings, source: &str) -> Vec<usize> {
        run_with(settings, source).iter().map(|v| v.line()).collect()
    }

    #[test]
    fn finds_unescaped_escapes_only() {
        assert_eq!(unicode_escapes(r"a\u00e9b"), vec![0xE9]);
        assert_eq!(unicode_escapes(r"\uuu0041"), vec![0x41]);
        assert!(unicode_escapes(r"\\u00e9").is_empty());
        assert_eq!(unicode_escapes(r"\\\u00e9"), vec![0xE9]);
        assert!(unicode_escapes(r"\u00g9").is_empty());
    }

    #[test]
    fn recognises_escape_only_content() {
        assert!(only_escapes(r#""\u0041\n\t""#));
        assert!(!only_escapes(r#""\u0041x""#));
    }

    const SOURCE: &str = r#"class A {
    String a = "\u03bc";
    String b = "\u200b"; // zero width space
    String c = "\u0009\n";
    char d = '\\';
    String e = "plain";
}
"#;

    #[test]
    fn reports_every_escape_by_default() {
        let violations = run(NAME, SOURCE);
        let lines: Vec<_> = violations.iter().map(|v| v.line()).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert_eq!(violations[0].message, "Unicode escape(s) usage should be avoided.");
    }

    #[test]
    fn tail_comment_allows() {
        let settings = CheckSettings::named(NAME).option("allow_by_tail_comment", "true");
        assert_eq!(lines(settings, SOURCE), vec![2, 4]);
    }

    #[test]
    fn control_characters_allowed() {
        let settings =
            CheckSettings::named(NAME).option("allow_escapes_for_control_characters", "true");
        assert_eq!(lines(settings, SOURCE), vec![2]);
    }

    #[test]
    fn all_escaped_allowed() {
        let settings = CheckSettings::named(NAME).option("allow_if_all_characters_escaped", "true");
        assert_eq!(lines(settings, SOURCE), Vec::<usize>::new());
    }

    #[test]
    fn non_printable_allowed() {
        let settings = CheckSettings::named(NAME).option("allow_non_printable_escapes", "true");
        assert_eq!(lines(settings, SOURCE), vec![2, 3]);
    }

    #[test]
    fn text_block_content_checked() {
        let source = "class A {\n    String s = \"\"\"\n        \\u03bc\n        \"\"\";\n}\n";
        assert_eq!(lines(CheckSettings::named(NAME), source), vec![2]);
    }

    fn tail_allowed() -> CheckSettings {
        CheckSettings::named(NAME).option("allow_by_tail_comment", "true")
    }

    #[test]
    fn text_block_tail_comment_counts_after_closing_delimiter() {
        let source = "\
class A {
    String s = \"\"\"
        \\u03bc
        \"\"\"; // why
}
";
        assert_eq!(lines(CheckSettings::named(NAME), source), vec![2]);
        assert!(lines(tail_allowed(), source).is_empty());
    }

    #[test]
    fn text_block_content_line_is_not_a_tail_comment() {
        let source = "\
class A {
    String s = \"\"\"
        \\u03bc // not a comment
        \"\"\";
}
";
        assert_eq!(lines(tail_allowed(), source), vec![2]);

        let followed_by_code = "\
class A {
    String s = \"\"\"
        \\u03bc
        \"\"\"; /* c */ int x;
}
";
        assert_eq!(lines(tail_allowed(), followed_by_code), vec![2]);
    }
}
