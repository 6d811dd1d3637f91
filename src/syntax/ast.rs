//! Declaration-level syntax nodes.

use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

use super::expr::Expr;
use crate::base::TextRange;

/// A name as written in source, with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: SmolStr,
    pub range: TextRange,
}

impl Ident {
    pub fn new(text: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A reference as written in source: a qualified path (`A::B::c`) optionally
/// followed by a feature chain (`.d.e`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedRef {
    /// Segments joined by `::`. Never empty.
    pub path: Vec<Ident>,
    /// Segments joined by `.` after the path.
    pub chain: Vec<Ident>,
    pub range: TextRange,
}

impl QualifiedRef {
    pub fn simple(ident: Ident) -> Self {
        let range = ident.range;
        Self {
            path: vec![ident],
            chain: Vec::new(),
            range,
        }
    }

    pub fn is_chain(&self) -> bool {
        !self.chain.is_empty()
    }

    /// The last segment, the name this reference finally designates.
    pub fn last(&self) -> &Ident {
        self.chain
            .last()
            .unwrap_or_else(|| &self.path[self.path.len() - 1])
    }

    /// Every segment in order, path first then chain.
    pub fn segments(&self) -> impl Iterator<Item = &Ident> {
        self.path.iter().chain(self.chain.iter())
    }
}

impl fmt::Display for QualifiedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(&seg.text)?;
        }
        for seg in &self.chain {
            write!(f, ".{}", seg.text)?;
        }
        Ok(())
    }
}

/// Visibility keyword of a membership or import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// Feature direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    /// The direction seen through a conjugation.
    pub fn conjugate(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
            Direction::InOut => Direction::InOut,
        }
    }
}

/// One bound of a multiplicity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Finite(u64),
    Unbounded,
}

/// A multiplicity range such as `[0..*]` or `[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: Bound,
    pub upper: Bound,
}

impl Multiplicity {
    pub fn exactly(n: u64) -> Self {
        Self {
            lower: Bound::Finite(n),
            upper: Bound::Finite(n),
        }
    }

    pub fn contains(&self, count: u64) -> bool {
        let above_lower = match self.lower {
            Bound::Finite(lo) => count >= lo,
            Bound::Unbounded => true,
        };
        let below_upper = match self.upper {
            Bound::Finite(hi) => count <= hi,
            Bound::Unbounded => true,
        };
        above_lower && below_upper
    }
}

/// The construct a declaration introduces, as chosen by its keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    // Namespaces
    Namespace,
    Package,
    LibraryPackage,
    // KerML types
    Type,
    Classifier,
    Class,
    DataType,
    Structure,
    Association,
    AssociationStructure,
    Behavior,
    Function,
    Predicate,
    Interaction,
    Metaclass,
    // KerML features
    Feature,
    Step,
    Expression,
    BooleanExpression,
    Invariant,
    Connector,
    MetadataFeature,
    // SysML definitions
    AttributeDefinition,
    EnumerationDefinition,
    OccurrenceDefinition,
    ItemDefinition,
    PartDefinition,
    PortDefinition,
    ActionDefinition,
    ConnectionDefinition,
    InterfaceDefinition,
    FlowConnectionDefinition,
    ConstraintDefinition,
    CalculationDefinition,
    MetadataDefinition,
    // SysML usages
    ReferenceUsage,
    AttributeUsage,
    EnumerationUsage,
    OccurrenceUsage,
    ItemUsage,
    PartUsage,
    PortUsage,
    ActionUsage,
    ConnectionUsage,
    InterfaceUsage,
    FlowConnectionUsage,
    ConstraintUsage,
    CalculationUsage,
    MetadataUsage,
}

/// Relationship clauses attached to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelClauseKind {
    /// `:>` or `specializes`; subsetting when the declaring element is a feature.
    Specializes,
    /// `subsets`
    Subsets,
    /// `:>>` or `redefines`
    Redefines,
    /// `:` or `typed by` / `defined by`
    TypedBy,
    /// `~` or `conjugates`
    Conjugates,
    /// `disjoint from`
    DisjointFrom,
    Unions,
    Intersects,
    Differences,
    /// `inverse of`
    InverseOf,
    /// `chains`
    Chains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelClause {
    pub kind: RelClauseKind,
    pub targets: Vec<QualifiedRef>,
    pub range: TextRange,
}

/// A declaration of a namespace, type, or feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub visibility: Option<Visibility>,
    pub is_abstract: bool,
    pub direction: Option<Direction>,
    pub short_name: Option<Ident>,
    pub name: Option<Ident>,
    pub relationships: Vec<RelClause>,
    pub multiplicity: Option<Multiplicity>,
    pub is_ordered: bool,
    pub is_nonunique: bool,
    pub value: Option<Expr>,
    /// Trailing expression of a body, the result of a function or constraint.
    pub result: Option<Expr>,
    /// Metadata applied with a `#M` prefix.
    pub metadata: Vec<QualifiedRef>,
    pub body: Vec<Member>,
    pub range: TextRange,
}

impl Decl {
    pub fn new(kind: DeclKind, range: TextRange) -> Self {
        Self {
            kind,
            visibility: None,
            is_abstract: false,
            direction: None,
            short_name: None,
            name: None,
            relationships: Vec::new(),
            multiplicity: None,
            is_ordered: false,
            is_nonunique: false,
            value: None,
            result: None,
            metadata: Vec::new(),
            body: Vec::new(),
            range,
        }
    }

    /// Targets of every clause of the given kind.
    pub fn targets(&self, kind: RelClauseKind) -> impl Iterator<Item = &QualifiedRef> {
        self.relationships
            .iter()
            .filter(move |c| c.kind == kind)
            .flat_map(|c| c.targets.iter())
    }
}

/// Which members an import brings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportWildcard {
    /// `import A::x;`
    None,
    /// `import A::*;`
    Members,
    /// `import A::**;`
    Recursive,
    /// `import A::*::**;`
    MembersRecursive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub visibility: Option<Visibility>,
    /// `import all`: ignore member visibility of the target.
    pub is_all: bool,
    pub target: QualifiedRef,
    pub wildcard: ImportWildcard,
    /// Filter conditions in brackets, all of which must hold.
    pub filters: Vec<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    pub visibility: Option<Visibility>,
    pub short_name: Option<Ident>,
    pub name: Ident,
    pub target: QualifiedRef,
    pub range: TextRange,
}

/// Kinds of stand-alone relationship declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandaloneRelKind {
    Specialization,
    Conjugation,
    Disjoining,
    Inverting,
    Redefinition,
    Subsetting,
    FeatureTyping,
}

/// `specialization S subtype A specializes B;` and its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDecl {
    pub kind: StandaloneRelKind,
    pub visibility: Option<Visibility>,
    pub name: Option<Ident>,
    pub source: QualifiedRef,
    pub target: QualifiedRef,
    pub range: TextRange,
}

/// `doc /* ... */` and `comment /* ... */`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocDecl {
    pub is_comment: bool,
    pub text: Arc<str>,
    pub range: TextRange,
}

/// `@M;` applying metadata to the enclosing element.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDecl {
    pub ty: QualifiedRef,
    pub body: Vec<Member>,
    pub range: TextRange,
}

/// A member of a namespace body.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Decl(Decl),
    Import(ImportDecl),
    Alias(AliasDecl),
    Relationship(RelationshipDecl),
    Doc(DocDecl),
    Metadata(MetadataDecl),
}

impl Member {
    pub fn range(&self) -> TextRange {
        match self {
            Member::Decl(d) => d.range,
            Member::Import(i) => i.range,
            Member::Alias(a) => a.range,
            Member::Relationship(r) => r.range,
            Member::Doc(d) => d.range,
            Member::Metadata(m) => m.range,
        }
    }

    pub fn as_decl(&self) -> Option<&Decl> {
        match self {
            Member::Decl(d) => Some(d),
            _ => None,
        }
    }
}
