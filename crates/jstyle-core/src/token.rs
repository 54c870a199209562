//! Token types produced by source parsers.
//!
//! Every node of a [`Tree`](crate::Tree) carries one [`TokenType`]. The set is
//! closed: checks register interest in token types, configurations refer to
//! them by their canonical upper-snake name (e.g. `METHOD_DEF`), and parsers
//! advertise the subset they can produce through
//! [`SourceParser::token_universe`](crate::SourceParser::token_universe).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! token_types {
    ($($variant:ident => $name:literal,)+) => {
        /// Syntactic category of a token tree node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TokenType {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl TokenType {
            /// Every token type, in declaration order.
            pub const ALL: &'static [TokenType] = &[$(TokenType::$variant,)+];

            /// Returns the canonical configuration name (e.g. `"CLASS_DEF"`).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(TokenType::$variant => $name,)+
                }
            }
        }

        impl FromStr for TokenType {
            type Err = UnknownTokenType;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($name => Ok(TokenType::$variant),)+
                    other => Err(UnknownTokenType(other.to_string())),
                }
            }
        }
    };
}

token_types! {
    CompilationUnit => "COMPILATION_UNIT",
    PackageDef => "PACKAGE_DEF",
    Import => "IMPORT",
    StaticImport => "STATIC_IMPORT",
    ClassDef => "CLASS_DEF",
    InterfaceDef => "INTERFACE_DEF",
    EnumDef => "ENUM_DEF",
    RecordDef => "RECORD_DEF",
    AnnotationDef => "ANNOTATION_DEF",
    ObjBlock => "OBJBLOCK",
    Modifiers => "MODIFIERS",
    Annotation => "ANNOTATION",
    AnnotationMemberValuePair => "ANNOTATION_MEMBER_VALUE_PAIR",
    AnnotationArrayInit => "ANNOTATION_ARRAY_INIT",
    AnnotationFieldDef => "ANNOTATION_FIELD_DEF",
    MethodDef => "METHOD_DEF",
    CtorDef => "CTOR_DEF",
    CompactCtorDef => "COMPACT_CTOR_DEF",
    Parameters => "PARAMETERS",
    ParameterDef => "PARAMETER_DEF",
    LiteralThrows => "LITERAL_THROWS",
    Slist => "SLIST",
    VariableDef => "VARIABLE_DEF",
    EnumConstantDef => "ENUM_CONSTANT_DEF",
    StaticInit => "STATIC_INIT",
    InstanceInit => "INSTANCE_INIT",
    Type => "TYPE",
    TypeParameters => "TYPE_PARAMETERS",
    TypeParameter => "TYPE_PARAMETER",
    TypeArguments => "TYPE_ARGUMENTS",
    ExtendsClause => "EXTENDS_CLAUSE",
    ImplementsClause => "IMPLEMENTS_CLAUSE",
    PermitsClause => "PERMITS_CLAUSE",
    ArrayDeclarator => "ARRAY_DECLARATOR",
    LiteralIf => "LITERAL_IF",
    LiteralElse => "LITERAL_ELSE",
    LiteralFor => "LITERAL_FOR",
    LiteralWhile => "LITERAL_WHILE",
    LiteralDo => "LITERAL_DO",
    DoWhile => "DO_WHILE",
    LiteralTry => "LITERAL_TRY",
    ResourceSpecification => "RESOURCE_SPECIFICATION",
    LiteralCatch => "LITERAL_CATCH",
    LiteralFinally => "LITERAL_FINALLY",
    LiteralSwitch => "LITERAL_SWITCH",
    CaseGroup => "CASE_GROUP",
    SwitchRule => "SWITCH_RULE",
    LiteralCase => "LITERAL_CASE",
    LiteralDefault => "LITERAL_DEFAULT",
    LiteralReturn => "LITERAL_RETURN",
    LiteralBreak => "LITERAL_BREAK",
    LiteralContinue => "LITERAL_CONTINUE",
    LiteralThrow => "LITERAL_THROW",
    LiteralYield => "LITERAL_YIELD",
    LiteralAssert => "LITERAL_ASSERT",
    LiteralSynchronized => "LITERAL_SYNCHRONIZED",
    LiteralNew => "LITERAL_NEW",
    LiteralInstanceof => "LITERAL_INSTANCEOF",
    LiteralThis => "LITERAL_THIS",
    LiteralSuper => "LITERAL_SUPER",
    LiteralClass => "LITERAL_CLASS",
    LiteralInterface => "LITERAL_INTERFACE",
    Enum => "ENUM",
    LiteralRecord => "LITERAL_RECORD",
    LiteralVoid => "LITERAL_VOID",
    LiteralBoolean => "LITERAL_BOOLEAN",
    LiteralByte => "LITERAL_BYTE",
    LiteralShort => "LITERAL_SHORT",
    LiteralInt => "LITERAL_INT",
    LiteralLong => "LITERAL_LONG",
    LiteralChar => "LITERAL_CHAR",
    LiteralFloat => "LITERAL_FLOAT",
    LiteralDouble => "LITERAL_DOUBLE",
    LiteralVar => "LITERAL_VAR",
    Lambda => "LAMBDA",
    MethodRef => "METHOD_REF",
    MethodCall => "METHOD_CALL",
    SuperCtorCall => "SUPER_CTOR_CALL",
    CtorCall => "CTOR_CALL",
    Elist => "ELIST",
    ArrayInit => "ARRAY_INIT",
    Expr => "EXPR",
    Typecast => "TYPECAST",
    IndexOp => "INDEX_OP",
    LabeledStat => "LABELED_STAT",
    EmptyStat => "EMPTY_STAT",
    Ident => "IDENT",
    Dot => "DOT",
    StringLiteral => "STRING_LITERAL",
    CharLiteral => "CHAR_LITERAL",
    NumInt => "NUM_INT",
    NumLong => "NUM_LONG",
    NumFloat => "NUM_FLOAT",
    NumDouble => "NUM_DOUBLE",
    LiteralTrue => "LITERAL_TRUE",
    LiteralFalse => "LITERAL_FALSE",
    LiteralNull => "LITERAL_NULL",
    TextBlockLiteralBegin => "TEXT_BLOCK_LITERAL_BEGIN",
    TextBlockContent => "TEXT_BLOCK_CONTENT",
    TextBlockLiteralEnd => "TEXT_BLOCK_LITERAL_END",
    LiteralPublic => "LITERAL_PUBLIC",
    LiteralPrivate => "LITERAL_PRIVATE",
    LiteralProtected => "LITERAL_PROTECTED",
    LiteralStatic => "LITERAL_STATIC",
    Final => "FINAL",
    Abstract => "ABSTRACT",
    LiteralTransient => "LITERAL_TRANSIENT",
    LiteralVolatile => "LITERAL_VOLATILE",
    LiteralNative => "LITERAL_NATIVE",
    Strictfp => "STRICTFP",
    LiteralSealed => "LITERAL_SEALED",
    LiteralNonSealed => "LITERAL_NON_SEALED",
    Lcurly => "LCURLY",
    Rcurly => "RCURLY",
    Lparen => "LPAREN",
    Rparen => "RPAREN",
    Lbrack => "LBRACK",
    Rbrack => "RBRACK",
    Semi => "SEMI",
    Comma => "COMMA",
    At => "AT",
    Colon => "COLON",
    Ellipsis => "ELLIPSIS",
    DoubleColon => "DOUBLE_COLON",
    Question => "QUESTION",
    Arrow => "ARROW",
    Assign => "ASSIGN",
    PlusAssign => "PLUS_ASSIGN",
    MinusAssign => "MINUS_ASSIGN",
    StarAssign => "STAR_ASSIGN",
    DivAssign => "DIV_ASSIGN",
    ModAssign => "MOD_ASSIGN",
    BandAssign => "BAND_ASSIGN",
    BorAssign => "BOR_ASSIGN",
    BxorAssign => "BXOR_ASSIGN",
    SlAssign => "SL_ASSIGN",
    SrAssign => "SR_ASSIGN",
    BsrAssign => "BSR_ASSIGN",
    Plus => "PLUS",
    Minus => "MINUS",
    Star => "STAR",
    Div => "DIV",
    Mod => "MOD",
    Equal => "EQUAL",
    NotEqual => "NOT_EQUAL",
    Lt => "LT",
    Gt => "GT",
    Le => "LE",
    Ge => "GE",
    Land => "LAND",
    Lor => "LOR",
    Band => "BAND",
    Bor => "BOR",
    Bxor => "BXOR",
    Sl => "SL",
    Sr => "SR",
    Bsr => "BSR",
    Lnot => "LNOT",
    Bnot => "BNOT",
    Inc => "INC",
    Dec => "DEC",
    PostInc => "POST_INC",
    PostDec => "POST_DEC",
    UnaryMinus => "UNARY_MINUS",
    UnaryPlus => "UNARY_PLUS",
}

impl TokenType {
    /// Number of token types.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this token type, usable for lookup tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for class-like declarations that open a new type scope.
    #[must_use]
    pub const fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::ClassDef
                | Self::InterfaceDef
                | Self::EnumDef
                | Self::RecordDef
                | Self::AnnotationDef
        )
    }

    /// Returns true for the keyword tokens that may appear under `MODIFIERS`.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::LiteralPublic
                | Self::LiteralPrivate
                | Self::LiteralProtected
                | Self::LiteralStatic
                | Self::Final
                | Self::Abstract
                | Self::LiteralTransient
                | Self::LiteralVolatile
                | Self::LiteralNative
                | Self::Strictfp
                | Self::LiteralSealed
                | Self::LiteralNonSealed
                | Self::LiteralDefault
                | Self::LiteralSynchronized
        )
    }

    /// Returns true for string-like literal tokens whose text may hold escapes.
    #[must_use]
    pub const fn is_string_like(self) -> bool {
        matches!(
            self,
            Self::StringLiteral | Self::CharLiteral | Self::TextBlockContent
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TokenType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an unknown token type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token type `{0}`")]
pub struct UnknownTokenType(pub String);

/// Parses a comma separated list of token names (e.g. `"CLASS_DEF, METHOD_DEF"`).
///
/// # Errors
///
/// Returns the first name that is not a known token type.
pub fn parse_token_list(list: &str) -> Result<Vec<TokenType>, UnknownTokenType> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
