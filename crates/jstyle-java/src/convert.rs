//! Conversion of tree-sitter Java syntax trees into token trees.
//!
//! The resulting shape follows the classic checkstyle layout: declarations
//! carry a `MODIFIERS` child (possibly empty) and an `IDENT` name, blocks are
//! `SLIST` nodes positioned at their `{`, class bodies are `OBJBLOCK` nodes
//! bracketed by `LCURLY`/`RCURLY`, and operators are parents of their
//! operands. Keywords that introduce a construct are absorbed into the
//! construct's node (`LITERAL_IF`, `LITERAL_THROWS`, ...).

use jstyle_core::{FileContents, Span, TokenType, Tree, TreeBuilder, TreeError};
use tree_sitter::{Node as SyntaxNode, Point};

/// Named children and punctuation of `node`, without comments.
pub(crate) fn children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    let nodes = node
        .children(&mut cursor)
        .filter(|c| !c.is_extra())
        .collect();
    nodes
}

/// Converts a tree-sitter point (0-based row, byte column) into a 1-based
/// line and 0-based character column.
pub(crate) fn position(contents: &FileContents, point: Point) -> (usize, usize) {
    let line = point.row + 1;
    let column = contents
        .line(line)
        .and_then(|text| text.get(..point.column))
        .map_or(point.column, |prefix| prefix.chars().count());
    (line, column)
}

fn is_type_kind(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
            | "annotated_type"
    )
}

fn punctuation(text: &str) -> Option<TokenType> {
    Some(match text {
        "(" => TokenType::Lparen,
        ")" => TokenType::Rparen,
        "[" => TokenType::Lbrack,
        "]" => TokenType::Rbrack,
        "{" => TokenType::Lcurly,
        "}" => TokenType::Rcurly,
        ";" => TokenType::Semi,
        "," => TokenType::Comma,
        ":" => TokenType::Colon,
        "..." => TokenType::Ellipsis,
        "::" => TokenType::DoubleColon,
        "->" => TokenType::Arrow,
        "@" => TokenType::At,
        "?" => TokenType::Question,
        "<" => TokenType::Lt,
        ">" => TokenType::Gt,
        "&" => TokenType::Band,
        "|" => TokenType::Bor,
        _ => return None,
    })
}

fn modifier_keyword(text: &str) -> Option<TokenType> {
    Some(match text {
        "public" => TokenType::LiteralPublic,
        "protected" => TokenType::LiteralProtected,
        "private" => TokenType::LiteralPrivate,
        "static" => TokenType::LiteralStatic,
        "final" => TokenType::Final,
        "abstract" => TokenType::Abstract,
        "transient" => TokenType::LiteralTransient,
        "volatile" => TokenType::LiteralVolatile,
        "native" => TokenType::LiteralNative,
        "strictfp" => TokenType::Strictfp,
        "synchronized" => TokenType::LiteralSynchronized,
        "default" => TokenType::LiteralDefault,
        "sealed" => TokenType::LiteralSealed,
        "non-sealed" => TokenType::LiteralNonSealed,
        _ => return None,
    })
}

fn primitive(text: &str) -> TokenType {
    match text {
        "boolean" => TokenType::LiteralBoolean,
        "byte" => TokenType::LiteralByte,
        "short" => TokenType::LiteralShort,
        "long" => TokenType::LiteralLong,
        "char" => TokenType::LiteralChar,
        "float" => TokenType::LiteralFloat,
        "double" => TokenType::LiteralDouble,
        "void" => TokenType::LiteralVoid,
        _ => TokenType::LiteralInt,
    }
}

fn binary_operator(text: &str) -> TokenType {
    match text {
        "+" => TokenType::Plus,
        "-" => TokenType::Minus,
        "*" => TokenType::Star,
        "/" => TokenType::Div,
        "%" => TokenType::Mod,
        "==" => TokenType::Equal,
        "!=" => TokenType::NotEqual,
        "<" => TokenType::Lt,
        ">" => TokenType::Gt,
        "<=" => TokenType::Le,
        ">=" => TokenType::Ge,
        "&&" => TokenType::Land,
        "||" => TokenType::Lor,
        "&" => TokenType::Band,
        "|" => TokenType::Bor,
        "^" => TokenType::Bxor,
        "<<" => TokenType::Sl,
        ">>" => TokenType::Sr,
        ">>>" => TokenType::Bsr,
        "+=" => TokenType::PlusAssign,
        "-=" => TokenType::MinusAssign,
        "*=" => TokenType::StarAssign,
        "/=" => TokenType::DivAssign,
        "%=" => TokenType::ModAssign,
        "&=" => TokenType::BandAssign,
        "|=" => TokenType::BorAssign,
        "^=" => TokenType::BxorAssign,
        "<<=" => TokenType::SlAssign,
        ">>=" => TokenType::SrAssign,
        ">>>=" => TokenType::BsrAssign,
        _ => TokenType::Assign,
    }
}

/// Builds a token tree from one parsed file.
pub(crate) struct Converter<'s> {
    source: &'s str,
    contents: &'s FileContents,
    builder: TreeBuilder,
}

impl<'s> Converter<'s> {
    pub(crate) fn new(contents: &'s FileContents) -> Self {
        Self {
            source: contents.text(),
            contents,
            builder: TreeBuilder::new(),
        }
    }

    /// Converts a `program` node into a tree rooted at `COMPILATION_UNIT`.
    pub(crate) fn convert(mut self, program: SyntaxNode<'_>) -> Result<Tree, TreeError> {
        let (end_line, end_column) = self.point(program.end_position());
        self.builder.open(
            TokenType::CompilationUnit,
            "",
            Span::new(1, 0, end_line.max(1), end_column),
        );
        for child in children(program) {
            self.node(child);
        }
        self.builder.close();
        self.builder.finish()
    }

    fn point(&self, point: Point) -> (usize, usize) {
        position(self.contents, point)
    }

    fn span(&self, node: SyntaxNode<'_>) -> Span {
        let (line, column) = self.point(node.start_position());
        let (end_line, end_column) = self.point(node.end_position());
        Span::new(line, column, end_line, end_column)
    }

    fn text(&self, node: SyntaxNode<'_>) -> &'s str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    /// Opens a structural node named after its token type.
    fn open(&mut self, token_type: TokenType, node: SyntaxNode<'_>) {
        let span = self.span(node);
        self.builder.open(token_type, token_type.name(), span);
    }

    /// Opens a node at `at` with explicit text.
    fn open_at(&mut self, token_type: TokenType, text: &str, at: SyntaxNode<'_>) {
        let span = self.span(at);
        self.builder.open(token_type, text, span);
    }

    /// Opens a keyword-introduced construct: positioned at `node`, text of
    /// its first token.
    fn open_keyword(&mut self, token_type: TokenType, node: SyntaxNode<'_>) {
        let keyword = node.child(0).map_or("", |k| self.text(k));
        let span = self.span(node);
        self.builder.open(token_type, keyword, span);
    }

    fn leaf(&mut self, token_type: TokenType, node: SyntaxNode<'_>) {
        let text = self.text(node);
        let span = self.span(node);
        self.builder.leaf(token_type, text, span);
    }

    fn empty(&mut self, token_type: TokenType, at: Point) {
        let (line, column) = self.point(at);
        self.builder
            .leaf(token_type, token_type.name(), Span::at(line, column, 0));
    }

    fn close(&mut self) {
        self.builder.close();
    }

    /// Converts any construct.
    fn node(&mut self, node: SyntaxNode<'_>) {
        if !node.is_named() {
            if let Some(token_type) = punctuation(node.kind()) {
                self.leaf(token_type, node);
            }
            return;
        }
        match node.kind() {
            "package_declaration" => self.package(node),
            "import_declaration" => self.import(node),
            "class_declaration" => self.type_declaration(node, TokenType::ClassDef),
            "interface_declaration" => self.type_declaration(node, TokenType::InterfaceDef),
            "enum_declaration" => self.type_declaration(node, TokenType::EnumDef),
            "record_declaration" => self.type_declaration(node, TokenType::RecordDef),
            "annotation_type_declaration" => {
                self.type_declaration(node, TokenType::AnnotationDef);
            }
            "class_body" | "interface_body" | "enum_body" | "annotation_type_body" => {
                self.object_block(node);
            }
            "enum_constant" => self.enum_constant(node),
            "field_declaration" | "constant_declaration" | "local_variable_declaration" => {
                self.variables(node);
            }
            "method_declaration" => self.method(node, TokenType::MethodDef),
            "constructor_declaration" => self.method(node, TokenType::CtorDef),
            "compact_constructor_declaration" => self.method(node, TokenType::CompactCtorDef),
            "annotation_type_element_declaration" => self.annotation_field(node),
            "static_initializer" => {
                self.open_keyword(TokenType::StaticInit, node);
                for child in children(node).into_iter().filter(|c| c.kind() == "block") {
                    self.slist(child);
                }
                self.close();
            }
            "modifiers" => self.modifiers(node),
            "marker_annotation" | "annotation" => self.annotation(node),
            "formal_parameters" => self.parameters(node),
            "formal_parameter" | "spread_parameter" | "receiver_parameter"
            | "catch_formal_parameter" => self.parameter(node),
            "throws" => self.throws(node),
            "type_parameters" => self.type_parameters(node),
            "type_arguments" => self.type_arguments(node),
            "dimensions" => self.dimensions(node),
            "block" | "constructor_body" => self.slist(node),
            "explicit_constructor_invocation" => self.constructor_call(node),

            "expression_statement" => {
                for child in children(node) {
                    if child.is_named() {
                        self.expr(child);
                    } else {
                        self.node(child);
                    }
                }
            }
            "if_statement" => self.if_statement(node),
            "while_statement" => self.keyword_statement(node, TokenType::LiteralWhile),
            "do_statement" => self.keyword_statement(node, TokenType::LiteralDo),
            "for_statement" => self.for_statement(node),
            "enhanced_for_statement" => self.enhanced_for(node),
            "try_statement" | "try_with_resources_statement" => self.try_statement(node),
            "switch_expression" | "switch_statement" => self.switch(node),
            "return_statement" => self.keyword_statement(node, TokenType::LiteralReturn),
            "break_statement" => self.keyword_statement(node, TokenType::LiteralBreak),
            "continue_statement" => self.keyword_statement(node, TokenType::LiteralContinue),
            "throw_statement" => self.keyword_statement(node, TokenType::LiteralThrow),
            "yield_statement" => self.keyword_statement(node, TokenType::LiteralYield),
            "assert_statement" => self.keyword_statement(node, TokenType::LiteralAssert),
            "synchronized_statement" => {
                self.keyword_statement(node, TokenType::LiteralSynchronized);
            }
            "labeled_statement" => self.labeled(node),

            "binary_expression" | "assignment_expression" => self.binary(node),
            "unary_expression" => self.unary(node),
            "update_expression" => self.update(node),
            "ternary_expression" => self.ternary(node),
            "instanceof_expression" => self.instance_of(node),
            "cast_expression" => self.cast(node),
            "parenthesized_expression" => self.parenthesized(node),
            "method_invocation" => self.method_call(node),
            "object_creation_expression" => self.object_creation(node),
            "array_creation_expression" => self.array_creation(node),
            "array_initializer" => self.array_initializer(node),
            "lambda_expression" => self.lambda(node),
            "method_reference" => self.method_reference(node),
            "field_access" => self.field_access(node),
            "array_access" => self.array_access(node),
            "class_literal" => self.class_literal(node),
            "scoped_identifier" => self.name(node),

            "identifier" => self.leaf(TokenType::Ident, node),
            "this" => self.leaf(TokenType::LiteralThis, node),
            "super" => self.leaf(TokenType::LiteralSuper, node),
            "asterisk" => self.leaf(TokenType::Star, node),
            "true" => self.leaf(TokenType::LiteralTrue, node),
            "false" => self.leaf(TokenType::LiteralFalse, node),
            "null_literal" => self.leaf(TokenType::LiteralNull, node),
            "character_literal" => self.leaf(TokenType::CharLiteral, node),
            "string_literal" => self.string(node),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => {
                let long = self.text(node).ends_with(['l', 'L']);
                let token_type = if long {
                    TokenType::NumLong
                } else {
                    TokenType::NumInt
                };
                self.leaf(token_type, node);
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                let float = self.text(node).ends_with(['f', 'F']);
                let token_type = if float {
                    TokenType::NumFloat
                } else {
                    TokenType::NumDouble
                };
                self.leaf(token_type, node);
            }
            kind if is_type_kind(kind) => self.type_expr(node),
            _ => {
                for child in children(node) {
                    self.node(child);
                }
            }
        }
    }

    /// An expression wrapped in `EXPR`, as in conditions, arguments and
    /// expression statements.
    fn expr(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::Expr, node);
        self.node(node);
        self.close();
    }

    fn package(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::PackageDef, node);
        for child in children(node) {
            match child.kind() {
                "identifier" | "scoped_identifier" => self.name(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn import(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let token_type = if parts.iter().any(|c| c.kind() == "static") {
            TokenType::StaticImport
        } else {
            TokenType::Import
        };
        self.open_keyword(token_type, node);
        let star = parts.iter().position(|c| c.kind() == "asterisk");
        let dot = star
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| parts.get(i))
            .filter(|c| c.kind() == ".");
        if let Some(dot) = dot {
            self.open_at(TokenType::Dot, ".", *dot);
        }
        for child in &parts {
            match child.kind() {
                "identifier" | "scoped_identifier" => self.name(*child),
                "asterisk" => {
                    self.leaf(TokenType::Star, *child);
                    if dot.is_some() {
                        self.close();
                    }
                }
                _ => self.node(*child),
            }
        }
        self.close();
    }

    /// `IDENT` for a simple name, a `DOT` chain for a qualified one.
    fn name(&mut self, node: SyntaxNode<'_>) {
        match node.kind() {
            "identifier" | "type_identifier" => self.leaf(TokenType::Ident, node),
            "scoped_identifier" | "scoped_type_identifier" => {
                let parts = children(node);
                let dot = parts.iter().find(|c| c.kind() == ".").copied();
                if let Some(dot) = dot {
                    self.open_at(TokenType::Dot, ".", dot);
                }
                for part in parts.into_iter().filter(SyntaxNode::is_named) {
                    self.name(part);
                }
                if dot.is_some() {
                    self.close();
                }
            }
            _ => self.node(node),
        }
    }

    /// Emits the declaration's `MODIFIERS`, or an empty one at its start.
    fn modifiers_of(&mut self, declaration: SyntaxNode<'_>) {
        match children(declaration)
            .into_iter()
            .find(|c| c.kind() == "modifiers")
        {
            Some(modifiers) => self.modifiers(modifiers),
            None => self.empty(TokenType::Modifiers, declaration.start_position()),
        }
    }

    fn modifiers(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::Modifiers, node);
        for child in children(node) {
            match child.kind() {
                "annotation" | "marker_annotation" => self.annotation(child),
                kind => {
                    if let Some(token_type) = modifier_keyword(kind) {
                        self.leaf(token_type, child);
                    }
                }
            }
        }
        self.close();
    }

    fn annotation(&mut self, node: SyntaxNode<'_>) {
        let name = node
            .child_by_field_name("name")
            .map_or("", |n| self.text(n));
        self.open_at(TokenType::Annotation, name, node);
        for child in children(node) {
            match child.kind() {
                "identifier" | "scoped_identifier" => self.name(child),
                "annotation_argument_list" => {
                    for argument in children(child) {
                        match argument.kind() {
                            "element_value_pair" => self.annotation_pair(argument),
                            _ if argument.is_named() => self.annotation_value(argument),
                            _ => self.node(argument),
                        }
                    }
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn annotation_pair(&mut self, node: SyntaxNode<'_>) {
        let key = node
            .child_by_field_name("key")
            .map_or("", |k| self.text(k));
        self.open_at(TokenType::AnnotationMemberValuePair, key, node);
        let value = node.child_by_field_name("value");
        for child in children(node) {
            if Some(child) == value {
                self.annotation_value(child);
            } else if child.kind() == "=" {
                self.leaf(TokenType::Assign, child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn annotation_value(&mut self, node: SyntaxNode<'_>) {
        match node.kind() {
            "element_value_array_initializer" => {
                self.open_at(TokenType::AnnotationArrayInit, "{", node);
                for child in children(node) {
                    match child.kind() {
                        "{" => {}
                        _ if child.is_named() => self.annotation_value(child),
                        _ => self.node(child),
                    }
                }
                self.close();
            }
            "annotation" | "marker_annotation" => self.annotation(node),
            _ => self.expr(node),
        }
    }

    fn type_declaration(&mut self, node: SyntaxNode<'_>, token_type: TokenType) {
        self.open(token_type, node);
        self.modifiers_of(node);
        for child in children(node) {
            match child.kind() {
                "modifiers" => {}
                "class" => self.leaf(TokenType::LiteralClass, child),
                "interface" | "@interface" => self.leaf(TokenType::LiteralInterface, child),
                "enum" => self.leaf(TokenType::Enum, child),
                "record" => self.leaf(TokenType::LiteralRecord, child),
                "identifier" => self.leaf(TokenType::Ident, child),
                "superclass" | "extends_interfaces" => {
                    self.clause(child, TokenType::ExtendsClause);
                }
                "super_interfaces" => self.clause(child, TokenType::ImplementsClause),
                "permits" => self.clause(child, TokenType::PermitsClause),
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// `extends`, `implements` and `permits` lists.
    fn clause(&mut self, node: SyntaxNode<'_>, token_type: TokenType) {
        self.open_keyword(token_type, node);
        for child in children(node) {
            if child.kind() == "type_list" {
                for item in children(child) {
                    self.node(item);
                }
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn object_block(&mut self, node: SyntaxNode<'_>) {
        self.open_at(TokenType::ObjBlock, "{", node);
        for child in children(node) {
            match child.kind() {
                "block" => self.instance_init(child),
                "enum_body_declarations" => {
                    for member in children(child) {
                        if member.kind() == "block" {
                            self.instance_init(member);
                        } else {
                            self.node(member);
                        }
                    }
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn instance_init(&mut self, block: SyntaxNode<'_>) {
        self.open(TokenType::InstanceInit, block);
        self.slist(block);
        self.close();
    }

    fn enum_constant(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::EnumConstantDef, node);
        self.modifiers_of(node);
        for child in children(node) {
            match child.kind() {
                "modifiers" => {}
                "argument_list" => self.arguments(child, true),
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// One `VARIABLE_DEF` per declarator; each repeats the declaration's
    /// modifiers and type.
    fn variables(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let modifiers = parts.iter().find(|c| c.kind() == "modifiers").copied();
        let value_type = node.child_by_field_name("type");
        let declarators: Vec<_> = parts
            .iter()
            .filter(|c| c.kind() == "variable_declarator")
            .copied()
            .collect();
        let commas: Vec<_> = parts.iter().filter(|c| c.kind() == ",").copied().collect();
        let semi = parts.iter().find(|c| c.kind() == ";").copied();

        for (index, declarator) in declarators.iter().enumerate() {
            let (line, column) = self.point(node.start_position());
            let (end_line, end_column) = self.point(declarator.end_position());
            self.builder.open(
                TokenType::VariableDef,
                TokenType::VariableDef.name(),
                Span::new(line, column, end_line, end_column),
            );
            match modifiers {
                Some(m) => self.modifiers(m),
                None => self.empty(TokenType::Modifiers, node.start_position()),
            }
            if let Some(value_type) = value_type {
                self.type_node(value_type);
            }
            self.declarator(*declarator);
            if index + 1 < declarators.len() {
                if let Some(comma) = commas.get(index) {
                    self.leaf(TokenType::Comma, *comma);
                }
            } else if let Some(semi) = semi {
                self.leaf(TokenType::Semi, semi);
            }
            self.close();
        }
    }

    fn declarator(&mut self, node: SyntaxNode<'_>) {
        if let Some(name) = node.child_by_field_name("name") {
            self.leaf(TokenType::Ident, name);
        }
        if let Some(dimensions) = node.child_by_field_name("dimensions") {
            self.dimensions(dimensions);
        }
        let assign = children(node).into_iter().find(|c| c.kind() == "=");
        if let (Some(assign), Some(value)) = (assign, node.child_by_field_name("value")) {
            self.open_at(TokenType::Assign, "=", assign);
            if value.kind() == "array_initializer" {
                self.node(value);
            } else {
                self.expr(value);
            }
            self.close();
        }
    }

    fn method(&mut self, node: SyntaxNode<'_>, token_type: TokenType) {
        self.open(token_type, node);
        self.modifiers_of(node);
        let return_type = node.child_by_field_name("type");
        for child in children(node) {
            match child.kind() {
                "modifiers" => {}
                _ if Some(child) == return_type => self.type_node(child),
                ";" => self.leaf(TokenType::Semi, child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn annotation_field(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::AnnotationFieldDef, node);
        self.modifiers_of(node);
        let value_type = node.child_by_field_name("type");
        for child in children(node) {
            match child.kind() {
                "modifiers" => {}
                _ if Some(child) == value_type => self.type_node(child),
                "default_value" => {
                    self.open_keyword(TokenType::LiteralDefault, child);
                    for value in children(child).into_iter().filter(SyntaxNode::is_named) {
                        self.annotation_value(value);
                    }
                    self.close();
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// `LPAREN PARAMETERS RPAREN`.
    fn parameters(&mut self, node: SyntaxNode<'_>) {
        for child in children(node) {
            match child.kind() {
                "(" => {
                    self.leaf(TokenType::Lparen, child);
                    let (line, column) = self.point(child.end_position());
                    self.builder.open(
                        TokenType::Parameters,
                        TokenType::Parameters.name(),
                        Span::at(line, column, 0),
                    );
                }
                ")" => {
                    self.close();
                    self.leaf(TokenType::Rparen, child);
                }
                "identifier" => {
                    // inferred lambda parameters
                    self.open(TokenType::ParameterDef, child);
                    self.empty(TokenType::Modifiers, child.start_position());
                    self.leaf(TokenType::Ident, child);
                    self.close();
                }
                _ => self.node(child),
            }
        }
    }

    fn parameter(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::ParameterDef, node);
        self.modifiers_of(node);
        for child in children(node) {
            match child.kind() {
                "modifiers" => {}
                "catch_type" => {
                    self.open(TokenType::Type, child);
                    for alternative in children(child) {
                        if alternative.kind() == "|" {
                            self.leaf(TokenType::Bor, alternative);
                        } else {
                            self.type_expr(alternative);
                        }
                    }
                    self.close();
                }
                "variable_declarator" => self.declarator(child),
                kind if is_type_kind(kind) => self.type_node(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn throws(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralThrows, node);
        for child in children(node) {
            if is_type_kind(child.kind()) {
                self.type_expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    /// A type wrapped in `TYPE`.
    fn type_node(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::Type, node);
        self.type_expr(node);
        self.close();
    }

    fn type_expr(&mut self, node: SyntaxNode<'_>) {
        match node.kind() {
            "type_identifier" => {
                let token_type = if self.text(node) == "var" {
                    TokenType::LiteralVar
                } else {
                    TokenType::Ident
                };
                self.leaf(token_type, node);
            }
            "scoped_type_identifier" => self.name(node),
            "generic_type" | "annotated_type" | "array_type" => {
                for child in children(node) {
                    if is_type_kind(child.kind()) {
                        self.type_expr(child);
                    } else {
                        self.node(child);
                    }
                }
            }
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                let token_type = primitive(self.text(node));
                self.leaf(token_type, node);
            }
            "wildcard" => {
                self.open_at(TokenType::Question, "?", node);
                for child in children(node).into_iter().filter(SyntaxNode::is_named) {
                    self.type_expr(child);
                }
                self.close();
            }
            _ => self.node(node),
        }
    }

    fn type_arguments(&mut self, node: SyntaxNode<'_>) {
        self.open_at(TokenType::TypeArguments, "<", node);
        for child in children(node) {
            if is_type_kind(child.kind()) || child.kind() == "wildcard" {
                self.type_expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn type_parameters(&mut self, node: SyntaxNode<'_>) {
        self.open_at(TokenType::TypeParameters, "<", node);
        for child in children(node) {
            if child.kind() == "type_parameter" {
                self.open(TokenType::TypeParameter, child);
                for part in children(child) {
                    match part.kind() {
                        "type_identifier" | "identifier" => self.leaf(TokenType::Ident, part),
                        "type_bound" => {
                            for bound in children(part) {
                                if is_type_kind(bound.kind()) {
                                    self.type_expr(bound);
                                } else {
                                    self.node(bound);
                                }
                            }
                        }
                        _ => self.node(part),
                    }
                }
                self.close();
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    /// `[]` pairs become `ARRAY_DECLARATOR` nodes holding their `RBRACK`.
    fn dimensions(&mut self, node: SyntaxNode<'_>) {
        let mut open = false;
        for child in children(node) {
            match child.kind() {
                "[" => {
                    self.open_at(TokenType::ArrayDeclarator, "[", child);
                    open = true;
                }
                "]" if open => {
                    self.leaf(TokenType::Rbrack, child);
                    self.close();
                    open = false;
                }
                _ => self.node(child),
            }
        }
        if open {
            self.close();
        }
    }

    /// `SLIST` positioned at `{`, ending with `RCURLY`.
    fn slist(&mut self, node: SyntaxNode<'_>) {
        self.open_at(TokenType::Slist, "{", node);
        for child in children(node) {
            match child.kind() {
                "{" => {}
                ";" => self.leaf(TokenType::EmptyStat, child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn constructor_call(&mut self, node: SyntaxNode<'_>) {
        let is_super = node
            .child_by_field_name("constructor")
            .is_some_and(|c| c.kind() == "super");
        let token_type = if is_super {
            TokenType::SuperCtorCall
        } else {
            TokenType::CtorCall
        };
        let keyword = node.child_by_field_name("constructor").unwrap_or(node);
        self.open_at(token_type, self.text(keyword), node);
        for child in children(node) {
            match child.kind() {
                "this" | "super" | "." => {}
                "argument_list" => self.arguments(child, true),
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// `ELIST RPAREN`, preceded by `LPAREN` when requested.
    fn arguments(&mut self, node: SyntaxNode<'_>, with_lparen: bool) {
        let mut open = false;
        for child in children(node) {
            match child.kind() {
                "(" => {
                    if with_lparen {
                        self.leaf(TokenType::Lparen, child);
                    }
                    let (line, column) = self.point(child.end_position());
                    self.builder
                        .open(TokenType::Elist, TokenType::Elist.name(), Span::at(line, column, 0));
                    open = true;
                }
                ")" => {
                    if open {
                        self.close();
                        open = false;
                    }
                    self.leaf(TokenType::Rparen, child);
                }
                _ if child.is_named() => self.expr(child),
                _ => self.node(child),
            }
        }
        if open {
            self.close();
        }
    }

    /// `LPAREN EXPR RPAREN` of a condition.
    fn condition(&mut self, node: SyntaxNode<'_>) {
        for child in children(node) {
            if child.is_named() {
                self.expr(child);
            } else {
                self.node(child);
            }
        }
    }

    /// Statements of the form `keyword (condition)? body? ;?`.
    fn keyword_statement(&mut self, node: SyntaxNode<'_>, token_type: TokenType) {
        self.open_keyword(token_type, node);
        for child in children(node) {
            match child.kind() {
                "parenthesized_expression" => self.condition(child),
                "while" if token_type == TokenType::LiteralDo => {
                    self.leaf(TokenType::DoWhile, child);
                }
                "block" => self.slist(child),
                "identifier" if matches!(
                    token_type,
                    TokenType::LiteralBreak | TokenType::LiteralContinue
                ) =>
                {
                    self.leaf(TokenType::Ident, child);
                }
                kind if child.is_named() && !kind.ends_with("statement") => self.expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn if_statement(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralIf, node);
        let alternative = node.child_by_field_name("alternative");
        for child in children(node) {
            match child.kind() {
                "parenthesized_expression" => self.condition(child),
                "else" => {
                    let (line, column) = self.point(child.start_position());
                    let end = alternative.unwrap_or(child).end_position();
                    let (end_line, end_column) = self.point(end);
                    self.builder.open(
                        TokenType::LiteralElse,
                        "else",
                        Span::new(line, column, end_line, end_column),
                    );
                }
                _ if Some(child) == alternative => {
                    self.node(child);
                    self.close();
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn for_statement(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralFor, node);
        let body = node.child_by_field_name("body");
        for child in children(node) {
            if Some(child) == body || child.kind() == "local_variable_declaration" {
                self.node(child);
            } else if child.is_named() {
                self.expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn enhanced_for(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralFor, node);
        let value_type = node.child_by_field_name("type");
        let name = node.child_by_field_name("name");
        let value = node.child_by_field_name("value");
        let mut variable_done = false;
        for child in children(node) {
            let is_variable_part = child.kind() == "modifiers"
                || child.kind() == "dimensions"
                || Some(child) == value_type
                || Some(child) == name;
            if is_variable_part {
                if variable_done {
                    continue;
                }
                variable_done = true;
                let start = child.start_position();
                let end = name.unwrap_or(child).end_position();
                let (line, column) = self.point(start);
                let (end_line, end_column) = self.point(end);
                self.builder.open(
                    TokenType::VariableDef,
                    TokenType::VariableDef.name(),
                    Span::new(line, column, end_line, end_column),
                );
                self.modifiers_of(node);
                if let Some(value_type) = value_type {
                    self.type_node(value_type);
                }
                if let Some(name) = name {
                    self.leaf(TokenType::Ident, name);
                }
                self.close();
            } else if Some(child) == value {
                self.expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn try_statement(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralTry, node);
        for child in children(node) {
            match child.kind() {
                "resource_specification" => {
                    self.open_at(TokenType::ResourceSpecification, "(", child);
                    for resource in children(child) {
                        if resource.kind() == "resource" {
                            self.resource(resource);
                        } else {
                            self.node(resource);
                        }
                    }
                    self.close();
                }
                "catch_clause" => {
                    self.open_keyword(TokenType::LiteralCatch, child);
                    for part in children(child) {
                        self.node(part);
                    }
                    self.close();
                }
                "finally_clause" => {
                    self.open_keyword(TokenType::LiteralFinally, child);
                    for part in children(child) {
                        self.node(part);
                    }
                    self.close();
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn resource(&mut self, node: SyntaxNode<'_>) {
        let Some(value_type) = node.child_by_field_name("type") else {
            for child in children(node).into_iter().filter(SyntaxNode::is_named) {
                self.expr(child);
            }
            return;
        };
        self.open(TokenType::VariableDef, node);
        self.modifiers_of(node);
        self.type_node(value_type);
        if let Some(name) = node.child_by_field_name("name") {
            self.leaf(TokenType::Ident, name);
        }
        let assign = children(node).into_iter().find(|c| c.kind() == "=");
        if let (Some(assign), Some(value)) = (assign, node.child_by_field_name("value")) {
            self.open_at(TokenType::Assign, "=", assign);
            self.expr(value);
            self.close();
        }
        self.close();
    }

    fn switch(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralSwitch, node);
        for child in children(node) {
            match child.kind() {
                "parenthesized_expression" => self.condition(child),
                "switch_block" => {
                    for entry in children(child) {
                        match entry.kind() {
                            "switch_block_statement_group" => self.case_group(entry),
                            "switch_rule" => self.switch_rule(entry),
                            _ => self.node(entry),
                        }
                    }
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// `CASE_GROUP` with its labels followed by an `SLIST` of statements.
    fn case_group(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::CaseGroup, node);
        let parts = children(node);
        let first_statement = parts
            .iter()
            .position(|c| c.is_named() && c.kind() != "switch_label");
        for (index, child) in parts.iter().enumerate() {
            if Some(index) == first_statement {
                let (line, column) = self.point(child.start_position());
                self.builder
                    .open(TokenType::Slist, TokenType::Slist.name(), Span::at(line, column, 0));
            }
            match child.kind() {
                "switch_label" => self.switch_label(*child),
                _ => self.node(*child),
            }
        }
        if first_statement.is_some() {
            self.close();
        }
        self.close();
    }

    fn switch_rule(&mut self, node: SyntaxNode<'_>) {
        self.open(TokenType::SwitchRule, node);
        for child in children(node) {
            match child.kind() {
                "switch_label" => self.switch_label(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn switch_label(&mut self, node: SyntaxNode<'_>) {
        let token_type = if self.text(node).starts_with("default") {
            TokenType::LiteralDefault
        } else {
            TokenType::LiteralCase
        };
        self.open_keyword(token_type, node);
        for child in children(node) {
            if child.is_named() && !child.kind().ends_with("pattern") {
                self.expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn labeled(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let label = parts.first().copied();
        let text = label.map_or("", |l| self.text(l));
        self.open_at(TokenType::LabeledStat, text, node);
        for (index, child) in parts.into_iter().enumerate() {
            if index == 0 && child.kind() == "identifier" {
                self.leaf(TokenType::Ident, child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn binary(&mut self, node: SyntaxNode<'_>) {
        let Some(operator) = node.child_by_field_name("operator") else {
            for child in children(node) {
                self.node(child);
            }
            return;
        };
        let text = self.text(operator);
        self.open_at(binary_operator(text), text, operator);
        for child in children(node) {
            if child != operator {
                self.node(child);
            }
        }
        self.close();
    }

    fn unary(&mut self, node: SyntaxNode<'_>) {
        let Some(operator) = node.child_by_field_name("operator") else {
            for child in children(node) {
                self.node(child);
            }
            return;
        };
        let text = self.text(operator);
        let token_type = match text {
            "+" => TokenType::UnaryPlus,
            "-" => TokenType::UnaryMinus,
            "!" => TokenType::Lnot,
            _ => TokenType::Bnot,
        };
        self.open_at(token_type, text, operator);
        for child in children(node).into_iter().filter(|c| *c != operator) {
            self.node(child);
        }
        self.close();
    }

    fn update(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(operator) = parts.iter().find(|c| !c.is_named()).copied() else {
            return;
        };
        let prefix = parts.first().is_some_and(|c| !c.is_named());
        let text = self.text(operator);
        let token_type = match (text, prefix) {
            ("++", true) => TokenType::Inc,
            ("--", true) => TokenType::Dec,
            ("++", false) => TokenType::PostInc,
            _ => TokenType::PostDec,
        };
        self.open_at(token_type, text, operator);
        for child in parts.into_iter().filter(SyntaxNode::is_named) {
            self.node(child);
        }
        self.close();
    }

    fn ternary(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(question) = parts.iter().find(|c| c.kind() == "?").copied() else {
            return;
        };
        self.open_at(TokenType::Question, "?", question);
        for child in parts.into_iter().filter(|c| *c != question) {
            self.node(child);
        }
        self.close();
    }

    fn instance_of(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let keyword = parts
            .iter()
            .find(|c| c.kind() == "instanceof")
            .copied()
            .unwrap_or(node);
        self.open_at(TokenType::LiteralInstanceof, "instanceof", keyword);
        for child in parts {
            match child.kind() {
                "instanceof" => {}
                kind if is_type_kind(kind) => self.type_node(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn cast(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(lparen) = parts.first().copied() else {
            return;
        };
        self.open_at(TokenType::Typecast, "(", lparen);
        for child in parts.into_iter().skip(1) {
            if is_type_kind(child.kind()) {
                self.type_node(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn parenthesized(&mut self, node: SyntaxNode<'_>) {
        for child in children(node) {
            self.node(child);
        }
    }

    /// `METHOD_CALL` positioned at `(`: callee (`IDENT` or `DOT`), `ELIST`,
    /// `RPAREN`.
    fn method_call(&mut self, node: SyntaxNode<'_>) {
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };
        self.open_at(TokenType::MethodCall, "(", arguments);
        let parts = children(node);
        let dot = parts.iter().find(|c| c.kind() == ".").copied();
        if let Some(dot) = dot {
            self.open_at(TokenType::Dot, ".", dot);
        }
        for child in parts {
            match child.kind() {
                "." => {}
                "argument_list" => {
                    if dot.is_some() {
                        self.close();
                    }
                    self.arguments(child, false);
                }
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn object_creation(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let keyword = parts
            .iter()
            .find(|c| c.kind() == "new")
            .copied()
            .unwrap_or(node);
        let (line, column) = self.point(keyword.start_position());
        let (end_line, end_column) = self.point(node.end_position());
        self.builder.open(
            TokenType::LiteralNew,
            "new",
            Span::new(line, column, end_line, end_column),
        );
        for child in parts {
            match child.kind() {
                "new" | "." => {}
                "argument_list" => self.arguments(child, true),
                "class_body" => self.object_block(child),
                kind if is_type_kind(kind) => self.type_expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn array_creation(&mut self, node: SyntaxNode<'_>) {
        self.open_keyword(TokenType::LiteralNew, node);
        for child in children(node) {
            match child.kind() {
                "new" => {}
                "dimensions_expr" => {
                    let parts = children(child);
                    if let Some(lbrack) = parts.first() {
                        self.open_at(TokenType::ArrayDeclarator, "[", *lbrack);
                    }
                    for part in parts.iter().skip(1) {
                        if part.is_named() {
                            self.expr(*part);
                        } else {
                            self.node(*part);
                        }
                    }
                    self.close();
                }
                kind if is_type_kind(kind) => self.type_expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn array_initializer(&mut self, node: SyntaxNode<'_>) {
        self.open_at(TokenType::ArrayInit, "{", node);
        for child in children(node) {
            match child.kind() {
                "{" => {}
                "array_initializer" => self.node(child),
                _ if child.is_named() => self.expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// `LAMBDA` positioned at `->`: parameters, then the body.
    fn lambda(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(arrow) = parts.iter().find(|c| c.kind() == "->").copied() else {
            return;
        };
        self.open_at(TokenType::Lambda, "->", arrow);
        let body = node.child_by_field_name("body");
        for child in parts {
            match child.kind() {
                "->" => {}
                "inferred_parameters" => self.parameters(child),
                _ if Some(child) == body && child.kind() == "block" => self.slist(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn method_reference(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(colons) = parts.iter().find(|c| c.kind() == "::").copied() else {
            return;
        };
        self.open_at(TokenType::MethodRef, "::", colons);
        for child in parts {
            match child.kind() {
                "::" => {}
                "new" => self.leaf(TokenType::LiteralNew, child),
                kind if is_type_kind(kind) => self.type_expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    fn field_access(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(dot) = parts.iter().rev().find(|c| c.kind() == ".").copied() else {
            return;
        };
        self.open_at(TokenType::Dot, ".", dot);
        for child in parts.into_iter().filter(|c| c.kind() != ".") {
            self.node(child);
        }
        self.close();
    }

    fn array_access(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(lbrack) = parts.iter().find(|c| c.kind() == "[").copied() else {
            return;
        };
        self.open_at(TokenType::IndexOp, "[", lbrack);
        let index = node.child_by_field_name("index");
        for child in parts.into_iter().filter(|c| *c != lbrack) {
            if Some(child) == index {
                self.expr(child);
            } else {
                self.node(child);
            }
        }
        self.close();
    }

    fn class_literal(&mut self, node: SyntaxNode<'_>) {
        let parts = children(node);
        let Some(dot) = parts.iter().find(|c| c.kind() == ".").copied() else {
            return;
        };
        self.open_at(TokenType::Dot, ".", dot);
        for child in parts {
            match child.kind() {
                "." => {}
                "class" => self.leaf(TokenType::LiteralClass, child),
                kind if is_type_kind(kind) => self.type_expr(child),
                _ => self.node(child),
            }
        }
        self.close();
    }

    /// String literals; text blocks become `TEXT_BLOCK_LITERAL_BEGIN` with
    /// `TEXT_BLOCK_CONTENT` and `TEXT_BLOCK_LITERAL_END` children.
    fn string(&mut self, node: SyntaxNode<'_>) {
        const DELIMITER: &str = "\"\"\"";
        let text = self.text(node);
        let start = node.start_position();
        let end = node.end_position();
        let is_text_block = text.len() >= 2 * DELIMITER.len()
            && text.starts_with(DELIMITER)
            && text.ends_with(DELIMITER)
            && end.column >= DELIMITER.len();
        if !is_text_block {
            self.leaf(TokenType::StringLiteral, node);
            return;
        }

        let content = &text[DELIMITER.len()..text.len() - DELIMITER.len()];
        let (line, column) = self.point(start);
        let content_start = self.point(Point::new(start.row, start.column + DELIMITER.len()));
        let content_end = self.point(Point::new(end.row, end.column - DELIMITER.len()));

        self.builder.open(
            TokenType::TextBlockLiteralBegin,
            DELIMITER,
            Span::at(line, column, DELIMITER.len()),
        );
        self.builder.leaf(
            TokenType::TextBlockContent,
            content,
            Span::new(content_start.0, content_start.1, content_end.0, content_end.1),
        );
        self.builder.leaf(
            TokenType::TextBlockLiteralEnd,
            DELIMITER,
            Span::at(content_end.0, content_end.1, DELIMITER.len()),
        );
        self.close();
    }
}
