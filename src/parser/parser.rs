//! Recursive descent parser for KerML and SysML members.
//!
//! Produces [`syntax`](crate::syntax) trees directly. Errors are collected
//! rather than returned; a member that cannot be parsed is skipped up to the
//! next `;` or closing `}` so the rest of the document still yields a tree.

use std::sync::Arc;

use smol_str::SmolStr;

use super::lexer::{Lexer, Token, TokenKind};
use crate::base::{TextRange, TextSize};
use crate::syntax::{
    AliasDecl, Bound, Decl, DeclKind, Direction, DocDecl, Expr, Ident, ImportDecl,
    ImportWildcard, Member, MetadataDecl, Multiplicity, ParseError, ParseErrorKind, QualifiedRef,
    RelClause, RelClauseKind, RelationshipDecl, StandaloneRelKind, Visibility,
};

/// The parser state
pub(super) struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    source_end: TextSize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        let mut tokens: Vec<Token<'a>> = Vec::new();
        let mut errors = Vec::new();
        for result in Lexer::new(source) {
            match result {
                Ok(token) if token.kind == TokenKind::BlockComment => {
                    // Block comments only matter as the body of `doc`/`comment`.
                    if documents_next_comment(&tokens) {
                        tokens.push(token);
                    }
                }
                Ok(token) => tokens.push(token),
                Err((text, range)) => errors.push(ParseError::new(
                    ParseErrorKind::InvalidToken(text.to_string()),
                    range,
                )),
            }
        }
        Self {
            tokens,
            pos: 0,
            source_end: TextSize::of(source),
            errors,
        }
    }

    pub(super) fn finish(self) -> Vec<ParseError> {
        self.errors
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub(super) fn current(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    pub(super) fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub(super) fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub(super) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        self.current_kind().is_some_and(|k| kinds.contains(&k))
    }

    pub(super) fn at_name(&self) -> bool {
        self.current_kind().is_some_and(TokenKind::is_name)
    }

    pub(super) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn pos(&self) -> usize {
        self.pos
    }

    /// Start offset of the current token, or the end of input.
    pub(super) fn start(&self) -> TextSize {
        self.current()
            .map(|t| t.range.start())
            .unwrap_or(self.source_end)
    }

    /// Range from `start` to the end of the last consumed token.
    pub(super) fn range_from(&self, start: TextSize) -> TextRange {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.range.end())
            .unwrap_or(start);
        TextRange::new(start, end.max(start))
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(super) fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.current()?;
        self.pos += 1;
        Some(token)
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<Token<'a>> {
        if self.at(kind) {
            self.bump()
        } else {
            self.error(expected);
            None
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(super) fn error(&mut self, expected: &str) {
        let error = match self.current() {
            Some(token) => ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    found: token.text.to_string(),
                    expected: expected.to_string(),
                },
                token.range,
            ),
            None => ParseError::new(
                ParseErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                },
                TextRange::empty(self.source_end),
            ),
        };
        self.errors.push(error);
    }

    pub(super) fn push_error(&mut self, kind: ParseErrorKind, range: TextRange) {
        self.errors.push(ParseError::new(kind, range));
    }

    /// Skip to the end of the current member: past the next `;` at this
    /// nesting level, or up to (not past) an unmatched `}`.
    fn recover(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Accept `;` or a body; a missing terminator is reported but the member
    /// is kept.
    fn parse_terminator(&mut self) -> (Vec<Member>, Option<Expr>) {
        if self.at(TokenKind::LBrace) {
            self.parse_body()
        } else {
            if !self.eat(TokenKind::Semicolon) {
                self.error("';' or '{'");
            }
            (Vec::new(), None)
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub(super) fn parse_name(&mut self) -> Option<Ident> {
        match self.current() {
            Some(token) if token.kind == TokenKind::Ident => {
                self.pos += 1;
                Some(Ident::new(token.text, token.range))
            }
            Some(token) if token.kind == TokenKind::UnrestrictedName => {
                self.pos += 1;
                Some(Ident::new(unquote(token.text), token.range))
            }
            _ => {
                self.error("a name");
                None
            }
        }
    }

    /// `A::B::c`, stopping before a `::` that is not followed by a name.
    pub(super) fn parse_path(&mut self) -> Option<QualifiedRef> {
        let first = self.parse_name()?;
        let mut path = vec![first];
        while self.at(TokenKind::ColonColon) && self.nth_kind(1).is_some_and(TokenKind::is_name) {
            self.pos += 1;
            path.push(self.parse_name()?);
        }
        let range = path[0].range.cover(path[path.len() - 1].range);
        Some(QualifiedRef {
            path,
            chain: Vec::new(),
            range,
        })
    }

    /// A path optionally followed by a feature chain: `A::b.c.d`.
    pub(super) fn parse_qualified_ref(&mut self) -> Option<QualifiedRef> {
        let mut reference = self.parse_path()?;
        while self.at(TokenKind::Dot) && self.nth_kind(1).is_some_and(TokenKind::is_name) {
            self.pos += 1;
            let segment = self.parse_name()?;
            reference.range = reference.range.cover(segment.range);
            reference.chain.push(segment);
        }
        Some(reference)
    }

    /// `<shortName>`
    fn parse_short_name(&mut self) -> Option<Ident> {
        if !self.eat(TokenKind::Lt) {
            return None;
        }
        let name = self.parse_name();
        self.expect(TokenKind::Gt, "'>'");
        name
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = Member*
    pub(super) fn parse_file(&mut self) -> Vec<Member> {
        let mut members = Vec::new();
        while !self.at_eof() {
            let before = self.pos;
            if self.at(TokenKind::RBrace) {
                self.error("a member");
                self.pos += 1;
                continue;
            }
            match self.parse_member() {
                Some(member) => members.push(member),
                None => self.recover(),
            }
            if self.pos == before {
                self.pos += 1;
            }
        }
        members
    }

    /// Body = '{' (Member | ResultExpression)* '}'
    ///
    /// The last expression member, if any, is the body's result.
    fn parse_body(&mut self) -> (Vec<Member>, Option<Expr>) {
        let mut members = Vec::new();
        let mut result = None;
        self.eat(TokenKind::LBrace);
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            let before = self.pos;
            if self.at_result_expression() {
                match self.parse_expr() {
                    Some(expr) => result = Some(expr),
                    None => self.recover(),
                }
                self.eat(TokenKind::Semicolon);
            } else {
                match self.parse_member() {
                    Some(member) => members.push(member),
                    None => self.recover(),
                }
            }
            if self.pos == before {
                self.pos += 1;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        (members, result)
    }

    fn at_result_expression(&self) -> bool {
        use TokenKind::*;
        match self.current_kind() {
            Some(
                Integer | Real | String | TrueKw | FalseKw | NullKw | LParen | Minus | Plus
                | NotKw | IfKw | AtAt | HastypeKw | IstypeKw,
            ) => true,
            Some(kind) if kind.is_name() => !matches!(
                self.nth_kind(1),
                Some(
                    Colon | ColonGt | ColonGtGt | LBracket | Semicolon | LBrace | Eq | ColonEq
                        | RedefinesKw | SubsetsKw | SpecializesKw | TypedKw | DefinedKw
                        | ChainsKw | OrderedKw | NonuniqueKw
                )
            ),
            _ => false,
        }
    }

    fn parse_visibility(&mut self) -> Option<Visibility> {
        let visibility = match self.current_kind()? {
            TokenKind::PublicKw => Visibility::Public,
            TokenKind::ProtectedKw => Visibility::Protected,
            TokenKind::PrivateKw => Visibility::Private,
            _ => return None,
        };
        self.pos += 1;
        Some(visibility)
    }

    /// Member = Visibility? (Import | Alias | Annotation | Relationship | Declaration)
    fn parse_member(&mut self) -> Option<Member> {
        let start = self.start();
        let visibility = self.parse_visibility();
        match self.current_kind() {
            Some(TokenKind::ImportKw) => self.parse_import(start, visibility).map(Member::Import),
            Some(TokenKind::AliasKw) => self.parse_alias(start, visibility).map(Member::Alias),
            Some(TokenKind::DocKw | TokenKind::CommentKw) => self.parse_doc(start).map(Member::Doc),
            Some(TokenKind::At) => self.parse_metadata_annotation(start).map(Member::Metadata),
            Some(
                TokenKind::SpecializationKw
                | TokenKind::SubclassifierKw
                | TokenKind::SubtypeKw
                | TokenKind::ConjugationKw
                | TokenKind::ConjugateKw
                | TokenKind::DisjoiningKw
                | TokenKind::DisjointKw
                | TokenKind::InvertingKw
                | TokenKind::InverseKw
                | TokenKind::RedefinitionKw
                | TokenKind::SubsetKw
                | TokenKind::TypingKw,
            ) => self
                .parse_relationship(start, visibility)
                .map(Member::Relationship),
            Some(_) => self.parse_decl(start, visibility).map(Member::Decl),
            None => {
                self.error("a member");
                None
            }
        }
    }

    /// Import = 'import' 'all'? Path ('::' '*')? ('::' '**')? Filter* ';'
    fn parse_import(&mut self, start: TextSize, visibility: Option<Visibility>) -> Option<ImportDecl> {
        self.bump();
        let is_all = self.eat(TokenKind::AllKw);
        let mut target = self.parse_path()?;
        let mut wildcard = ImportWildcard::None;
        if self.at(TokenKind::ColonColon) {
            match self.nth_kind(1) {
                Some(TokenKind::Star) => {
                    self.pos += 2;
                    wildcard = ImportWildcard::Members;
                    if self.at(TokenKind::ColonColon) && self.nth_kind(1) == Some(TokenKind::StarStar)
                    {
                        self.pos += 2;
                        wildcard = ImportWildcard::MembersRecursive;
                    }
                }
                Some(TokenKind::StarStar) => {
                    self.pos += 2;
                    wildcard = ImportWildcard::Recursive;
                }
                _ => {
                    self.pos += 1;
                    self.error("a name, '*' or '**'");
                    return None;
                }
            }
        }
        target.range = self.range_from(target.range.start());

        let mut filters = Vec::new();
        while self.eat(TokenKind::LBracket) {
            if let Some(filter) = self.parse_expr() {
                filters.push(filter);
            }
            self.expect(TokenKind::RBracket, "']'");
        }
        self.parse_terminator();

        Some(ImportDecl {
            visibility,
            is_all,
            target,
            wildcard,
            filters,
            range: self.range_from(start),
        })
    }

    /// Alias = 'alias' ShortName? Name 'for' QualifiedName ';'
    fn parse_alias(&mut self, start: TextSize, visibility: Option<Visibility>) -> Option<AliasDecl> {
        self.bump();
        let short_name = self.parse_short_name();
        let name = self.parse_name()?;
        self.expect(TokenKind::ForKw, "'for'")?;
        let target = self.parse_qualified_ref()?;
        self.parse_terminator();
        Some(AliasDecl {
            visibility,
            short_name,
            name,
            target,
            range: self.range_from(start),
        })
    }

    /// Doc = ('doc' | 'comment') Name? BlockComment ';'?
    fn parse_doc(&mut self, start: TextSize) -> Option<DocDecl> {
        let keyword = self.bump()?;
        if self.at_name() {
            self.pos += 1;
        }
        let comment = self.expect(TokenKind::BlockComment, "a '/* ... */' comment")?;
        self.eat(TokenKind::Semicolon);
        Some(DocDecl {
            is_comment: keyword.kind == TokenKind::CommentKw,
            text: Arc::from(comment_text(comment.text)),
            range: self.range_from(start),
        })
    }

    /// MetadataAnnotation = '@' QualifiedName (';' | Body)
    fn parse_metadata_annotation(&mut self, start: TextSize) -> Option<MetadataDecl> {
        self.bump();
        let ty = self.parse_path()?;
        let (body, _) = self.parse_terminator();
        Some(MetadataDecl {
            ty,
            body,
            range: self.range_from(start),
        })
    }

    /// Stand-alone relationship declarations, e.g.
    /// `specialization S subtype A specializes B;` or `subset a subsets b;`.
    fn parse_relationship(
        &mut self,
        start: TextSize,
        visibility: Option<Visibility>,
    ) -> Option<RelationshipDecl> {
        use TokenKind::*;
        let lead = self.bump()?.kind;
        let (kind, intro, operators): (StandaloneRelKind, Option<TokenKind>, &[TokenKind]) =
            match lead {
                SpecializationKw => (
                    StandaloneRelKind::Specialization,
                    Some(SubtypeKw),
                    &[SpecializesKw, ColonGt],
                ),
                SubclassifierKw | SubtypeKw => (
                    StandaloneRelKind::Specialization,
                    None,
                    &[SpecializesKw, ColonGt],
                ),
                ConjugationKw => (
                    StandaloneRelKind::Conjugation,
                    Some(ConjugateKw),
                    &[ConjugatesKw, Tilde],
                ),
                ConjugateKw => (StandaloneRelKind::Conjugation, None, &[ConjugatesKw, Tilde]),
                DisjoiningKw => (StandaloneRelKind::Disjoining, Some(DisjointKw), &[FromKw]),
                DisjointKw => (StandaloneRelKind::Disjoining, None, &[FromKw]),
                InvertingKw => (StandaloneRelKind::Inverting, Some(InverseKw), &[OfKw]),
                InverseKw => (StandaloneRelKind::Inverting, None, &[OfKw]),
                RedefinitionKw => (
                    StandaloneRelKind::Redefinition,
                    None,
                    &[RedefinesKw, ColonGtGt],
                ),
                SubsetKw => (StandaloneRelKind::Subsetting, None, &[SubsetsKw, ColonGt]),
                _ => (StandaloneRelKind::FeatureTyping, None, &[TypedKw, Colon]),
            };

        let mut name = None;
        let source = match intro {
            Some(intro) => {
                if !self.at(intro) {
                    name = Some(self.parse_name()?);
                }
                self.expect(intro, "a relationship keyword")?;
                self.parse_qualified_ref()?
            }
            None => {
                let first = self.parse_qualified_ref()?;
                // `redefinition R a redefines b;` names the relationship.
                if self.at_name() && first.path.len() == 1 && !first.is_chain() {
                    name = first.path.into_iter().next();
                    self.parse_qualified_ref()?
                } else {
                    first
                }
            }
        };

        if !self.at_any(operators) {
            self.error("a relationship operator");
            return None;
        }
        if self.bump()?.kind == TypedKw {
            self.expect(ByKw, "'by'")?;
        }
        let target = self.parse_qualified_ref()?;
        self.parse_terminator();

        Some(RelationshipDecl {
            kind,
            visibility,
            name,
            source,
            target,
            range: self.range_from(start),
        })
    }

    /// Declaration = Prefix* Kind Identification? Clause* (';' | Body)
    fn parse_decl(&mut self, start: TextSize, visibility: Option<Visibility>) -> Option<Decl> {
        let mut is_abstract = false;
        let mut direction = None;
        let mut metadata = Vec::new();
        loop {
            match self.current_kind() {
                Some(TokenKind::AbstractKw) => is_abstract = true,
                Some(TokenKind::InKw) => direction = Some(Direction::In),
                Some(TokenKind::OutKw) => direction = Some(Direction::Out),
                Some(TokenKind::InoutKw) => direction = Some(Direction::InOut),
                Some(TokenKind::Hash) => {
                    self.pos += 1;
                    metadata.push(self.parse_path()?);
                    continue;
                }
                // `ref part p` is a part usage; a lone `ref` is a reference usage.
                Some(TokenKind::RefKw) if self.nth_kind(1).is_some_and(is_usage_keyword) => {}
                _ => break,
            }
            self.pos += 1;
        }

        let kind = self.parse_decl_kind()?;
        let mut decl = Decl::new(kind, TextRange::empty(start));
        decl.visibility = visibility;
        decl.is_abstract = is_abstract;
        decl.direction = direction;
        decl.metadata = metadata;
        decl.short_name = self.parse_short_name();
        if self.at_name() {
            decl.name = self.parse_name();
        }

        self.parse_decl_clauses(&mut decl);

        let (body, result) = self.parse_terminator();
        decl.body = body;
        decl.result = result;
        decl.range = self.range_from(start);
        Some(decl)
    }

    fn parse_decl_kind(&mut self) -> Option<DeclKind> {
        use TokenKind::*;
        let Some(current) = self.current_kind() else {
            self.error("a declaration");
            return None;
        };
        // A name or relationship operator starts a keyword-less feature.
        if current.is_name() || matches!(current, ColonGtGt | ColonGt | RedefinesKw | SubsetsKw) {
            return Some(DeclKind::Feature);
        }

        let simple = match current {
            NamespaceKw => Some(DeclKind::Namespace),
            PackageKw => Some(DeclKind::Package),
            TypeKw => Some(DeclKind::Type),
            ClassifierKw => Some(DeclKind::Classifier),
            ClassKw => Some(DeclKind::Class),
            DatatypeKw => Some(DeclKind::DataType),
            StructKw => Some(DeclKind::Structure),
            BehaviorKw => Some(DeclKind::Behavior),
            FunctionKw => Some(DeclKind::Function),
            PredicateKw => Some(DeclKind::Predicate),
            InteractionKw => Some(DeclKind::Interaction),
            MetaclassKw => Some(DeclKind::Metaclass),
            FeatureKw => Some(DeclKind::Feature),
            StepKw => Some(DeclKind::Step),
            ExprKw => Some(DeclKind::Expression),
            BoolKw => Some(DeclKind::BooleanExpression),
            InvKw => Some(DeclKind::Invariant),
            ConnectorKw => Some(DeclKind::Connector),
            RefKw => Some(DeclKind::ReferenceUsage),
            _ => None,
        };
        if let Some(kind) = simple {
            self.pos += 1;
            return Some(kind);
        }

        match current {
            LibraryKw => {
                self.pos += 1;
                self.expect(PackageKw, "'package'")?;
                Some(DeclKind::LibraryPackage)
            }
            AssocKw => {
                self.pos += 1;
                if self.eat(StructKw) {
                    Some(DeclKind::AssociationStructure)
                } else {
                    Some(DeclKind::Association)
                }
            }
            _ => {
                let Some((definition, usage)) = sysml_kinds(current) else {
                    self.error("a declaration");
                    return None;
                };
                self.pos += 1;
                if self.eat(DefKw) {
                    Some(definition)
                } else {
                    Some(usage)
                }
            }
        }
    }

    /// Relationship clauses, multiplicity, flags and bound value, in any order.
    fn parse_decl_clauses(&mut self, decl: &mut Decl) {
        use TokenKind::*;
        loop {
            let clause_start = self.start();
            let kind = match self.current_kind() {
                Some(Colon) => RelClauseKind::TypedBy,
                Some(TypedKw | DefinedKw) => {
                    self.pos += 1;
                    if !self.at(ByKw) {
                        self.error("'by'");
                        return;
                    }
                    RelClauseKind::TypedBy
                }
                Some(ColonGt | SpecializesKw) => RelClauseKind::Specializes,
                Some(SubsetsKw) => RelClauseKind::Subsets,
                Some(ColonGtGt | RedefinesKw) => RelClauseKind::Redefines,
                Some(Tilde | ConjugatesKw) => RelClauseKind::Conjugates,
                Some(DisjointKw) => {
                    self.pos += 1;
                    if !self.at(FromKw) {
                        self.error("'from'");
                        return;
                    }
                    RelClauseKind::DisjointFrom
                }
                Some(UnionsKw) => RelClauseKind::Unions,
                Some(IntersectsKw) => RelClauseKind::Intersects,
                Some(DifferencesKw) => RelClauseKind::Differences,
                Some(InverseKw) => {
                    self.pos += 1;
                    if !self.at(OfKw) {
                        self.error("'of'");
                        return;
                    }
                    RelClauseKind::InverseOf
                }
                Some(ChainsKw) => RelClauseKind::Chains,
                Some(LBracket) => {
                    decl.multiplicity = self.parse_multiplicity();
                    continue;
                }
                Some(OrderedKw) => {
                    self.pos += 1;
                    decl.is_ordered = true;
                    continue;
                }
                Some(NonuniqueKw) => {
                    self.pos += 1;
                    decl.is_nonunique = true;
                    continue;
                }
                Some(Eq | ColonEq) => {
                    self.pos += 1;
                    decl.value = self.parse_expr();
                    continue;
                }
                _ => return,
            };
            self.pos += 1;

            let mut targets = Vec::new();
            loop {
                // `port p : ~P` types by the conjugate of P.
                if kind == RelClauseKind::TypedBy {
                    self.eat(Tilde);
                }
                match self.parse_qualified_ref() {
                    Some(target) => targets.push(target),
                    None => break,
                }
                if !self.eat(Comma) {
                    break;
                }
            }
            decl.relationships.push(RelClause {
                kind,
                targets,
                range: self.range_from(clause_start),
            });
        }
    }

    /// Multiplicity = '[' Bound ('..' Bound)? ']'
    fn parse_multiplicity(&mut self) -> Option<Multiplicity> {
        self.bump();
        let lower = self.parse_bound();
        let multiplicity = if self.eat(TokenKind::DotDot) {
            let upper = self.parse_bound();
            Multiplicity {
                lower: lower?,
                upper: upper?,
            }
        } else {
            match lower? {
                // `[*]` is `[0..*]`
                Bound::Unbounded => Multiplicity {
                    lower: Bound::Finite(0),
                    upper: Bound::Unbounded,
                },
                Bound::Finite(n) => Multiplicity::exactly(n),
            }
        };
        self.expect(TokenKind::RBracket, "']'");
        Some(multiplicity)
    }

    fn parse_bound(&mut self) -> Option<Bound> {
        let token = self.current();
        match token {
            Some(t) if t.kind == TokenKind::Star => {
                self.pos += 1;
                Some(Bound::Unbounded)
            }
            Some(t) if t.kind == TokenKind::Integer => {
                self.pos += 1;
                match t.text.parse::<u64>() {
                    Ok(n) => Some(Bound::Finite(n)),
                    Err(_) => {
                        self.push_error(ParseErrorKind::InvalidNumber(t.text.to_string()), t.range);
                        None
                    }
                }
            }
            _ => {
                self.error("a multiplicity bound");
                None
            }
        }
    }
}

/// Whether a block comment arriving now would be the body of a `doc` or
/// `comment` (possibly after its name).
fn documents_next_comment(tokens: &[Token<'_>]) -> bool {
    let is_doc = |t: &Token<'_>| matches!(t.kind, TokenKind::DocKw | TokenKind::CommentKw);
    match tokens {
        [.., last] if is_doc(last) => true,
        [.., doc, name] => is_doc(doc) && name.kind.is_name(),
        _ => false,
    }
}

fn is_usage_keyword(kind: TokenKind) -> bool {
    sysml_kinds(kind).is_some()
}

/// Definition and usage kinds introduced by a SysML keyword.
fn sysml_kinds(kind: TokenKind) -> Option<(DeclKind, DeclKind)> {
    use TokenKind::*;
    let kinds = match kind {
        AttributeKw => (DeclKind::AttributeDefinition, DeclKind::AttributeUsage),
        EnumKw => (DeclKind::EnumerationDefinition, DeclKind::EnumerationUsage),
        OccurrenceKw => (DeclKind::OccurrenceDefinition, DeclKind::OccurrenceUsage),
        ItemKw => (DeclKind::ItemDefinition, DeclKind::ItemUsage),
        PartKw => (DeclKind::PartDefinition, DeclKind::PartUsage),
        PortKw => (DeclKind::PortDefinition, DeclKind::PortUsage),
        ActionKw => (DeclKind::ActionDefinition, DeclKind::ActionUsage),
        ConnectionKw => (DeclKind::ConnectionDefinition, DeclKind::ConnectionUsage),
        InterfaceKw => (DeclKind::InterfaceDefinition, DeclKind::InterfaceUsage),
        FlowKw => (DeclKind::FlowConnectionDefinition, DeclKind::FlowConnectionUsage),
        ConstraintKw => (DeclKind::ConstraintDefinition, DeclKind::ConstraintUsage),
        CalcKw => (DeclKind::CalculationDefinition, DeclKind::CalculationUsage),
        MetadataKw => (DeclKind::MetadataDefinition, DeclKind::MetadataUsage),
        _ => return None,
    };
    Some(kinds)
}

/// Text of an unrestricted name without its quotes.
fn unquote(text: &str) -> SmolStr {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    SmolStr::new(unescape(inner))
}

pub(super) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Body of a `/* ... */` comment with the delimiters and leading `*`s of
/// continuation lines removed.
fn comment_text(text: &str) -> String {
    let inner = text
        .strip_prefix("/*")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(text);
    inner
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
