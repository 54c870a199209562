//! Java source parser using Tree-sitter.

use crate::comments;
use crate::convert::{position, Converter};
use jstyle_core::{FileContents, ParseError, ParsedFile, SourceParser, TokenType};
use tree_sitter::{Language, Node, Parser};

/// Longest source excerpt quoted in a syntax error message.
const SNIPPET_CHARS: usize = 24;

/// Parses `.java` files into token trees.
pub struct JavaParser {
    language: Language,
}

impl JavaParser {
    /// Creates a new Java parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn syntax_error(node: Node<'_>, contents: &FileContents) -> ParseError {
        let (line, column) = position(contents, node.start_position());
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            let text = contents
                .text()
                .get(node.start_byte()..node.end_byte())
                .unwrap_or_default();
            let snippet: String = text
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(SNIPPET_CHARS)
                .collect();
            if snippet.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected `{snippet}`")
            }
        };
        ParseError::Syntax {
            line,
            column,
            message,
        }
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JavaParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaParser").finish_non_exhaustive()
    }
}

/// First error or missing node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let candidates: Vec<_> = node
        .children(&mut cursor)
        .filter(|c| c.has_error() || c.is_missing())
        .collect();
    candidates.into_iter().find_map(first_error)
}

impl SourceParser for JavaParser {
    fn language(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn token_universe(&self) -> &'static [TokenType] {
        TokenType::ALL
    }

    fn parse(&self, contents: &FileContents) -> Result<ParsedFile, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Setup(e.to_string()))?;

        let Some(syntax) = parser.parse(contents.text(), None) else {
            return Err(ParseError::Setup(format!(
                "tree-sitter returned no tree for {}",
                contents.path().display()
            )));
        };
        let root = syntax.root_node();

        if root.has_error() {
            let error = first_error(root).unwrap_or(root);
            let error = Self::syntax_error(error, contents);
            tracing::debug!(path = %contents.path().display(), %error, "rejected source");
            return Err(error);
        }

        let tree = Converter::new(contents).convert(root)?;
        let comments = comments::collect(root, contents);
        tracing::trace!(
            path = %contents.path().display(),
            nodes = tree.len(),
            comments = comments.len(),
            "parsed"
        );
        Ok(ParsedFile { tree, comments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstyle_core::{CommentKind, Node as TokenNode, Tree};

    fn parse(src: &str) -> ParsedFile {
        JavaParser::new()
            .parse(&FileContents::new("A.java", src))
            .unwrap()
    }

    fn first(tree: &Tree, token_type: TokenType) -> TokenNode<'_> {
        tree.iter()
            .find(|n| n.token_type() == token_type)
            .unwrap_or_else(|| panic!("no {token_type} in\n{}", tree.dump()))
    }

    fn child_types(node: TokenNode<'_>) -> Vec<TokenType> {
        node.children().map(TokenNode::token_type).collect()
    }

    #[test]
    fn handles_java_extension() {
        let parser = JavaParser::new();
        assert!(parser.handles(std::path::Path::new("src/A.java")));
        assert!(!parser.handles(std::path::Path::new("src/A.kt")));
        assert_eq!(parser.language(), "java");
    }

    #[test]
    fn dumps_minimal_class() {
        let parsed = parse("class A {}");
        insta::assert_snapshot!(parsed.tree.dump(), @r#"
        COMPILATION_UNIT 1:0 ""
          CLASS_DEF 1:0 "CLASS_DEF"
            MODIFIERS 1:0 "MODIFIERS"
            LITERAL_CLASS 1:0 "class"
            IDENT 1:6 "A"
            OBJBLOCK 1:8 "{"
              LCURLY 1:8 "{"
              RCURLY 1:9 "}"
        "#);
    }

    #[test]
    fn class_modifiers_and_clauses() {
        let parsed = parse("public final class A extends B implements C, D {}\n");
        let class = first(&parsed.tree, TokenType::ClassDef);
        assert_eq!(
            child_types(class),
            vec![
                TokenType::Modifiers,
                TokenType::LiteralClass,
                TokenType::Ident,
                TokenType::ExtendsClause,
                TokenType::ImplementsClause,
                TokenType::ObjBlock,
            ]
        );
        let modifiers = first(&parsed.tree, TokenType::Modifiers);
        assert_eq!(
            child_types(modifiers),
            vec![TokenType::LiteralPublic, TokenType::Final]
        );
        let implements = first(&parsed.tree, TokenType::ImplementsClause);
        assert_eq!(implements.child_count(), 3);
    }

    #[test]
    fn throws_clause_children() {
        let parsed = parse("class A {\n    void m() throws X, Y, Z {}\n}\n");
        let throws = first(&parsed.tree, TokenType::LiteralThrows);
        assert_eq!(throws.line(), 2);
        assert_eq!(throws.column(), 13);
        assert_eq!(throws.text(), "throws");
        assert_eq!(throws.child_count(), 5);
    }

    #[test]
    fn positions_agree_with_contents_across_line_endings() {
        for src in [
            "class A {\r\n    void m() throws X {}\r\n}\r\n",
            "class A {\r    void m() {}\n    void n() throws X {}\n}\n",
        ] {
            let contents = FileContents::new("A.java", src);
            let parsed = JavaParser::new().parse(&contents).unwrap();
            let throws = first(&parsed.tree, TokenType::LiteralThrows);
            let line = contents.line(throws.line()).unwrap();
            assert!(
                line.chars().skip(throws.column()).collect::<String>().starts_with("throws"),
                "{src:?}: {}:{} in {line:?}",
                throws.line(),
                throws.column()
            );
        }
    }

    #[test]
    fn method_shape() {
        let parsed = parse("class A {\n    void m(int a, String... b) {}\n}\n");
        let method = first(&parsed.tree, TokenType::MethodDef);
        assert_eq!(
            child_types(method),
            vec![
                TokenType::Modifiers,
                TokenType::Type,
                TokenType::Ident,
                TokenType::Lparen,
                TokenType::Parameters,
                TokenType::Rparen,
                TokenType::Slist,
            ]
        );
        let parameters = first(&parsed.tree, TokenType::Parameters);
        assert_eq!(
            child_types(parameters),
            vec![TokenType::ParameterDef, TokenType::Comma, TokenType::ParameterDef]
        );
        assert!(parameters
            .children()
            .last()
            .is_some_and(|p| p.branch_contains(TokenType::Ellipsis)));
    }

    #[test]
    fn one_variable_def_per_declarator() {
        let parsed = parse("class A {\n    private int a = 1, b;\n}\n");
        let defs: Vec<_> = parsed
            .tree
            .iter()
            .filter(|n| n.token_type() == TokenType::VariableDef)
            .collect();
        assert_eq!(defs.len(), 2);
        assert_eq!(
            child_types(defs[0]),
            vec![
                TokenType::Modifiers,
                TokenType::Type,
                TokenType::Ident,
                TokenType::Assign,
                TokenType::Comma,
            ]
        );
        assert_eq!(
            child_types(defs[1]),
            vec![
                TokenType::Modifiers,
                TokenType::Type,
                TokenType::Ident,
                TokenType::Semi,
            ]
        );
        assert!(defs[1].branch_contains(TokenType::LiteralPrivate));
    }

    #[test]
    fn void_return_starts_with_semi() {
        let parsed = parse("class A {\n    void m() { return; }\n    int n() { return 1; }\n}\n");
        let returns: Vec<_> = parsed
            .tree
            .iter()
            .filter(|n| n.token_type() == TokenType::LiteralReturn)
            .map(|n| n.first_child().map(TokenNode::token_type))
            .collect();
        assert_eq!(
            returns,
            vec![Some(TokenType::Semi), Some(TokenType::Expr)]
        );
    }

    #[test]
    fn method_call_positioned_at_paren() {
        let parsed = parse("class A {\n    void m() { foo.bar(1); }\n}\n");
        let call = first(&parsed.tree, TokenType::MethodCall);
        assert_eq!((call.line(), call.column(), call.text()), (2, 22, "("));
        assert_eq!(
            child_types(call),
            vec![TokenType::Dot, TokenType::Elist, TokenType::Rparen]
        );
    }

    #[test]
    fn text_block_positions() {
        let src = "class A {\n    String s = \"\"\"\n        hi\"\"\";\n}\n";
        let parsed = parse(src);
        let begin = first(&parsed.tree, TokenType::TextBlockLiteralBegin);
        assert_eq!((begin.line(), begin.column()), (2, 15));
        let content = first(&parsed.tree, TokenType::TextBlockContent);
        assert_eq!((content.line(), content.column()), (2, 18));
        assert_eq!(content.text(), "\n        hi");
        let end = first(&parsed.tree, TokenType::TextBlockLiteralEnd);
        assert_eq!((end.line(), end.column()), (3, 10));
    }

    #[test]
    fn columns_count_characters() {
        let parsed = parse("class A { String s = \"éé\"; int x; }");
        let x = parsed
            .tree
            .iter()
            .find(|n| n.token_type() == TokenType::Ident && n.text() == "x")
            .unwrap();
        assert_eq!(x.column(), 31);
    }

    #[test]
    fn collects_comments() {
        let parsed = parse("// head\nclass A { /* body */ }\n");
        assert_eq!(parsed.comments.len(), 2);
        assert_eq!(parsed.comments[0].kind, CommentKind::Line);
        assert_eq!(parsed.comments[0].text, "// head");
        assert_eq!(
            (parsed.comments[1].start_line, parsed.comments[1].start_column),
            (2, 10)
        );
        assert_eq!(parsed.comments[1].kind, CommentKind::Block);
        assert!(!parsed.tree.iter().any(|n| n.text().contains("body")));
    }

    #[test]
    fn reports_syntax_errors() {
        let err = JavaParser::new()
            .parse(&FileContents::new("A.java", "class A {\n    void m( {\n}\n"))
            .unwrap_err();
        assert!(
            matches!(err, ParseError::Syntax { line, .. } if line >= 2),
            "{err}"
        );
    }
}
