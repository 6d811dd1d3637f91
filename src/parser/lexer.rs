//! Logos-based lexer for KerML and SysML.
//!
//! Whitespace and line comments are skipped; block comments are kept as
//! tokens because `doc` and `comment` members carry their text.

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// A token with its kind, text, and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

/// Either a token or the text and range of input logos could not match.
pub type LexResult<'a> = Result<Token<'a>, (&'a str, TextRange)>;

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?;
        let text = self.inner.slice();
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(match kind {
            Ok(kind) => Ok(Token { kind, text, range }),
            Err(()) => Err((text, range)),
        })
    }
}

/// Tokenize an entire string, dropping unmatched input.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).filter_map(Result::ok).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA KEPT FOR DOCUMENTATION
    // =========================================================================
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// `'any text'`, a name that may contain spaces or operator characters.
    #[regex(r"'([^'\\]|\\.)*'")]
    UnrestrictedName,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Real,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token(":>>")]
    ColonGtGt,
    #[token(":>")]
    ColonGt,
    #[token("::")]
    ColonColon,
    #[token(":=")]
    ColonEq,
    #[token("..")]
    DotDot,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,
    #[token("@@")]
    AtAt,
    #[token("**")]
    StarStar,
    #[token("??")]
    QuestionQuestion,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("@")]
    At,
    #[token("#")]
    Hash,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("abstract")]
    AbstractKw,
    #[token("alias")]
    AliasKw,
    #[token("all")]
    AllKw,
    #[token("and")]
    AndKw,
    #[token("as")]
    AsKw,
    #[token("assoc")]
    AssocKw,
    #[token("attribute")]
    AttributeKw,
    #[token("action")]
    ActionKw,
    #[token("behavior")]
    BehaviorKw,
    #[token("bool")]
    BoolKw,
    #[token("by")]
    ByKw,
    #[token("calc")]
    CalcKw,
    #[token("chains")]
    ChainsKw,
    #[token("class")]
    ClassKw,
    #[token("classifier")]
    ClassifierKw,
    #[token("comment")]
    CommentKw,
    #[token("conjugate")]
    ConjugateKw,
    #[token("conjugates")]
    ConjugatesKw,
    #[token("conjugation")]
    ConjugationKw,
    #[token("connection")]
    ConnectionKw,
    #[token("connector")]
    ConnectorKw,
    #[token("constraint")]
    ConstraintKw,
    #[token("datatype")]
    DatatypeKw,
    #[token("def")]
    DefKw,
    #[token("defined")]
    DefinedKw,
    #[token("differences")]
    DifferencesKw,
    #[token("disjoining")]
    DisjoiningKw,
    #[token("disjoint")]
    DisjointKw,
    #[token("doc")]
    DocKw,
    #[token("else")]
    ElseKw,
    #[token("enum")]
    EnumKw,
    #[token("expr")]
    ExprKw,
    #[token("false")]
    FalseKw,
    #[token("feature")]
    FeatureKw,
    #[token("flow")]
    FlowKw,
    #[token("for")]
    ForKw,
    #[token("from")]
    FromKw,
    #[token("function")]
    FunctionKw,
    #[token("hastype")]
    HastypeKw,
    #[token("if")]
    IfKw,
    #[token("implies")]
    ImpliesKw,
    #[token("import")]
    ImportKw,
    #[token("in")]
    InKw,
    #[token("inout")]
    InoutKw,
    #[token("interaction")]
    InteractionKw,
    #[token("interface")]
    InterfaceKw,
    #[token("intersects")]
    IntersectsKw,
    #[token("inv")]
    InvKw,
    #[token("inverse")]
    InverseKw,
    #[token("inverting")]
    InvertingKw,
    #[token("istype")]
    IstypeKw,
    #[token("item")]
    ItemKw,
    #[token("library")]
    LibraryKw,
    #[token("meta")]
    MetaKw,
    #[token("metaclass")]
    MetaclassKw,
    #[token("metadata")]
    MetadataKw,
    #[token("namespace")]
    NamespaceKw,
    #[token("nonunique")]
    NonuniqueKw,
    #[token("not")]
    NotKw,
    #[token("null")]
    NullKw,
    #[token("occurrence")]
    OccurrenceKw,
    #[token("of")]
    OfKw,
    #[token("or")]
    OrKw,
    #[token("ordered")]
    OrderedKw,
    #[token("out")]
    OutKw,
    #[token("package")]
    PackageKw,
    #[token("part")]
    PartKw,
    #[token("port")]
    PortKw,
    #[token("predicate")]
    PredicateKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("public")]
    PublicKw,
    #[token("redefines")]
    RedefinesKw,
    #[token("redefinition")]
    RedefinitionKw,
    #[token("ref")]
    RefKw,
    #[token("specialization")]
    SpecializationKw,
    #[token("specializes")]
    SpecializesKw,
    #[token("step")]
    StepKw,
    #[token("struct")]
    StructKw,
    #[token("subclassifier")]
    SubclassifierKw,
    #[token("subset")]
    SubsetKw,
    #[token("subsets")]
    SubsetsKw,
    #[token("subtype")]
    SubtypeKw,
    #[token("true")]
    TrueKw,
    #[token("type")]
    TypeKw,
    #[token("typed")]
    TypedKw,
    #[token("typing")]
    TypingKw,
    #[token("unions")]
    UnionsKw,
    #[token("xor")]
    XorKw,
}

impl TokenKind {
    /// Whether this token can be used as a name.
    pub fn is_name(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::UnrestrictedName)
    }
}
