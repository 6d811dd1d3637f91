//! Element kinds and the capabilities each kind composes.
//!
//! A concrete kind such as a flow connection definition behaves at once as a
//! classifier, an action, a connection and an interaction. Rather than an
//! inheritance tree, every [`ElementKind`] reports a fixed set of
//! [`Capability`]s and all behavior that depends on "what an element is"
//! matches on the kind or asks [`ElementKind::has`].

use crate::base::constants;
use crate::syntax::{DeclKind, StandaloneRelKind};

/// The kind of a relationship element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Specialization,
    Conjugation,
    Redefinition,
    Subsetting,
    FeatureTyping,
    Disjoining,
    Unioning,
    Intersecting,
    Differencing,
    Inverting,
    FeatureChaining,
}

impl RelationshipKind {
    /// Whether the target of this relationship is a general of its source.
    pub fn is_generalization(self) -> bool {
        matches!(
            self,
            RelationshipKind::Specialization
                | RelationshipKind::Conjugation
                | RelationshipKind::Redefinition
                | RelationshipKind::Subsetting
                | RelationshipKind::FeatureTyping
                | RelationshipKind::FeatureChaining
        )
    }

    /// Type operand relationships; each needs zero or at least two operands.
    pub fn is_type_operator(self) -> bool {
        matches!(
            self,
            RelationshipKind::Unioning
                | RelationshipKind::Intersecting
                | RelationshipKind::Differencing
        )
    }

    pub fn display(self) -> &'static str {
        match self {
            RelationshipKind::Specialization => "specialization",
            RelationshipKind::Conjugation => "conjugation",
            RelationshipKind::Redefinition => "redefinition",
            RelationshipKind::Subsetting => "subsetting",
            RelationshipKind::FeatureTyping => "feature typing",
            RelationshipKind::Disjoining => "disjoining",
            RelationshipKind::Unioning => "unioning",
            RelationshipKind::Intersecting => "intersecting",
            RelationshipKind::Differencing => "differencing",
            RelationshipKind::Inverting => "inverting",
            RelationshipKind::FeatureChaining => "feature chaining",
        }
    }
}

impl From<StandaloneRelKind> for RelationshipKind {
    fn from(kind: StandaloneRelKind) -> Self {
        match kind {
            StandaloneRelKind::Specialization => RelationshipKind::Specialization,
            StandaloneRelKind::Conjugation => RelationshipKind::Conjugation,
            StandaloneRelKind::Disjoining => RelationshipKind::Disjoining,
            StandaloneRelKind::Inverting => RelationshipKind::Inverting,
            StandaloneRelKind::Redefinition => RelationshipKind::Redefinition,
            StandaloneRelKind::Subsetting => RelationshipKind::Subsetting,
            StandaloneRelKind::FeatureTyping => RelationshipKind::FeatureTyping,
        }
    }
}

/// An orthogonal aspect of element behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Namespace,
    Package,
    Type,
    Classifier,
    Feature,
    Definition,
    Usage,
    DataType,
    Structure,
    Occurrence,
    Behavior,
    Function,
    Predicate,
    Association,
    Connection,
    Interaction,
    Port,
    Metadata,
    Relationship,
    Import,
    Alias,
    Annotation,
}

/// The closed set of element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Namespace,
    Package,
    LibraryPackage,

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

    Feature,
    Step,
    Expression,
    BooleanExpression,
    Invariant,
    Connector,
    MetadataFeature,

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

    Relationship(RelationshipKind),
    Import,
    Alias,
    Documentation,
    Comment,
}

use Capability as C;

const NAMESPACE: &[Capability] = &[C::Namespace];
const PACKAGE: &[Capability] = &[C::Namespace, C::Package];
const TYPE: &[Capability] = &[C::Namespace, C::Type];
const CLASSIFIER: &[Capability] = &[C::Namespace, C::Type, C::Classifier];
const CLASS: &[Capability] = &[C::Namespace, C::Type, C::Classifier, C::Occurrence];
const DATA_TYPE: &[Capability] = &[C::Namespace, C::Type, C::Classifier, C::DataType];
const STRUCTURE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Structure,
];
const ASSOCIATION: &[Capability] = &[C::Namespace, C::Type, C::Classifier, C::Association];
const ASSOCIATION_STRUCTURE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Structure,
    C::Association,
];
const BEHAVIOR: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Behavior,
];
const FUNCTION: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Behavior,
    C::Function,
];
const PREDICATE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Behavior,
    C::Function,
    C::Predicate,
];
const INTERACTION: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Behavior,
    C::Association,
    C::Interaction,
];
const METACLASS: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Occurrence,
    C::Structure,
    C::Metadata,
];
const FEATURE: &[Capability] = &[C::Namespace, C::Type, C::Feature];
const STEP: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Behavior];
const EXPRESSION: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Behavior, C::Function];
const BOOLEAN_EXPRESSION: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Behavior,
    C::Function,
    C::Predicate,
];
const CONNECTOR: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Connection];
const METADATA_FEATURE: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Metadata];

const ATTRIBUTE_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::DataType,
];
const OCCURRENCE_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
];
const ITEM_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Structure,
];
const PORT_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Structure,
    C::Port,
];
const ACTION_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Behavior,
];
const CONNECTION_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Structure,
    C::Association,
    C::Connection,
];
const FLOW_CONNECTION_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Behavior,
    C::Association,
    C::Connection,
    C::Interaction,
];
const CALCULATION_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Behavior,
    C::Function,
];
const CONSTRAINT_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Behavior,
    C::Function,
    C::Predicate,
];
const METADATA_DEF: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Classifier,
    C::Definition,
    C::Occurrence,
    C::Structure,
    C::Metadata,
];

const REFERENCE_USAGE: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Usage];
const ATTRIBUTE_USAGE: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Usage, C::DataType];
const OCCURRENCE_USAGE: &[Capability] = &[C::Namespace, C::Type, C::Feature, C::Usage, C::Occurrence];
const ITEM_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Structure,
];
const PORT_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Port,
];
const ACTION_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Behavior,
];
const CONNECTION_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Connection,
];
const FLOW_CONNECTION_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Behavior,
    C::Connection,
    C::Interaction,
];
const CALCULATION_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Behavior,
    C::Function,
];
const CONSTRAINT_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Occurrence,
    C::Behavior,
    C::Function,
    C::Predicate,
];
const METADATA_USAGE: &[Capability] = &[
    C::Namespace,
    C::Type,
    C::Feature,
    C::Usage,
    C::Metadata,
];

impl ElementKind {
    /// Every capability this kind composes.
    pub fn capabilities(self) -> &'static [Capability] {
        use ElementKind::*;
        match self {
            Namespace => NAMESPACE,
            Package | LibraryPackage => PACKAGE,
            Type => TYPE,
            Classifier => CLASSIFIER,
            Class => CLASS,
            DataType => DATA_TYPE,
            Structure => STRUCTURE,
            Association => ASSOCIATION,
            AssociationStructure => ASSOCIATION_STRUCTURE,
            Behavior => BEHAVIOR,
            Function => FUNCTION,
            Predicate => PREDICATE,
            Interaction => INTERACTION,
            Metaclass => METACLASS,
            Feature => FEATURE,
            Step => STEP,
            Expression => EXPRESSION,
            BooleanExpression | Invariant => BOOLEAN_EXPRESSION,
            Connector => CONNECTOR,
            MetadataFeature => METADATA_FEATURE,
            AttributeDefinition | EnumerationDefinition => ATTRIBUTE_DEF,
            OccurrenceDefinition => OCCURRENCE_DEF,
            ItemDefinition | PartDefinition => ITEM_DEF,
            PortDefinition => PORT_DEF,
            ActionDefinition => ACTION_DEF,
            ConnectionDefinition | InterfaceDefinition => CONNECTION_DEF,
            FlowConnectionDefinition => FLOW_CONNECTION_DEF,
            ConstraintDefinition => CONSTRAINT_DEF,
            CalculationDefinition => CALCULATION_DEF,
            MetadataDefinition => METADATA_DEF,
            ReferenceUsage => REFERENCE_USAGE,
            AttributeUsage | EnumerationUsage => ATTRIBUTE_USAGE,
            OccurrenceUsage => OCCURRENCE_USAGE,
            ItemUsage | PartUsage => ITEM_USAGE,
            PortUsage => PORT_USAGE,
            ActionUsage => ACTION_USAGE,
            ConnectionUsage | InterfaceUsage => CONNECTION_USAGE,
            FlowConnectionUsage => FLOW_CONNECTION_USAGE,
            ConstraintUsage => CONSTRAINT_USAGE,
            CalculationUsage => CALCULATION_USAGE,
            MetadataUsage => METADATA_USAGE,
            Relationship(_) => &[C::Relationship],
            Import => &[C::Relationship, C::Import],
            Alias => &[C::Alias],
            Documentation | Comment => &[C::Annotation],
        }
    }

    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn is_type(self) -> bool {
        self.has(Capability::Type)
    }

    pub fn is_feature(self) -> bool {
        self.has(Capability::Feature)
    }

    /// Whether members of this kind appear in namespace scopes under a name.
    pub fn is_named_member(self) -> bool {
        !matches!(
            self,
            ElementKind::Relationship(_)
                | ElementKind::Import
                | ElementKind::Alias
                | ElementKind::Documentation
                | ElementKind::Comment
        )
    }

    /// Qualified name of the library type an element of this kind
    /// specializes when it declares no general of its own.
    pub fn implicit_general(self) -> Option<&'static str> {
        use ElementKind::*;
        let name = match self {
            Type | Classifier => constants::ANYTHING,
            Class | Structure => constants::OBJECT,
            DataType | AttributeDefinition | EnumerationDefinition => constants::DATA_VALUE,
            Association | AssociationStructure => constants::LINK,
            Behavior => constants::PERFORMANCE,
            Function => constants::EVALUATION,
            Predicate => constants::BOOLEAN_EVALUATION,
            Interaction => constants::INTERACTION,
            Metaclass => constants::METAOBJECT,
            Feature | ReferenceUsage => constants::THINGS,
            Step => constants::PERFORMANCES,
            Expression => constants::EVALUATIONS,
            BooleanExpression | Invariant => constants::BOOLEAN_EVALUATIONS,
            Connector => constants::LINKS,
            MetadataFeature => constants::METAOBJECTS,
            OccurrenceDefinition => constants::OCCURRENCE,
            ItemDefinition => constants::ITEM,
            PartDefinition => constants::PART,
            PortDefinition => constants::PORT,
            ActionDefinition => constants::ACTION,
            ConnectionDefinition => constants::CONNECTION,
            InterfaceDefinition => constants::INTERFACE,
            FlowConnectionDefinition => constants::FLOW_CONNECTION,
            ConstraintDefinition => constants::CONSTRAINT,
            CalculationDefinition => constants::CALCULATION,
            MetadataDefinition => constants::METADATA_ITEM,
            AttributeUsage | EnumerationUsage => constants::ATTRIBUTE_VALUES,
            OccurrenceUsage => constants::OCCURRENCES,
            ItemUsage => constants::ITEMS,
            PartUsage => constants::PARTS,
            PortUsage => constants::PORTS,
            ActionUsage => constants::ACTIONS,
            ConnectionUsage => constants::CONNECTIONS,
            InterfaceUsage => constants::INTERFACES,
            FlowConnectionUsage => constants::FLOW_CONNECTIONS,
            ConstraintUsage => constants::CONSTRAINTS,
            CalculationUsage => constants::CALCULATIONS,
            MetadataUsage => constants::METADATA_ITEMS,
            Namespace | Package | LibraryPackage | Relationship(_) | Import | Alias
            | Documentation | Comment => return None,
        };
        Some(name)
    }

    /// Name of the metaclass elements of this kind are instances of.
    pub fn metaclass_name(self) -> &'static str {
        self.metaclass_ancestry()[0]
    }

    /// The metaclass of this kind followed by its general metaclasses,
    /// nearest first. `@@` tests against this list.
    pub fn metaclass_ancestry(self) -> &'static [&'static str] {
        use ElementKind::*;
        match self {
            Namespace => &["Namespace", "Element"],
            Package => &["Package", "Namespace", "Element"],
            LibraryPackage => &["LibraryPackage", "Package", "Namespace", "Element"],
            Type => &["Type", "Namespace", "Element"],
            Classifier => &["Classifier", "Type", "Namespace", "Element"],
            Class => &["Class", "Classifier", "Type", "Namespace", "Element"],
            DataType => &["DataType", "Classifier", "Type", "Namespace", "Element"],
            Structure => &["Structure", "Class", "Classifier", "Type", "Namespace", "Element"],
            Association => &["Association", "Classifier", "Relationship", "Type", "Namespace", "Element"],
            AssociationStructure => &[
                "AssociationStructure",
                "Association",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            Behavior => &["Behavior", "Class", "Classifier", "Type", "Namespace", "Element"],
            Function => &["Function", "Behavior", "Class", "Classifier", "Type", "Namespace", "Element"],
            Predicate => &[
                "Predicate",
                "Function",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            Interaction => &[
                "Interaction",
                "Association",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            Metaclass => &["Metaclass", "Structure", "Class", "Classifier", "Type", "Namespace", "Element"],
            Feature => &["Feature", "Type", "Namespace", "Element"],
            Step => &["Step", "Feature", "Type", "Namespace", "Element"],
            Expression => &["Expression", "Step", "Feature", "Type", "Namespace", "Element"],
            BooleanExpression => &[
                "BooleanExpression",
                "Expression",
                "Step",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            Invariant => &[
                "Invariant",
                "BooleanExpression",
                "Expression",
                "Step",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            Connector => &["Connector", "Feature", "Relationship", "Type", "Namespace", "Element"],
            MetadataFeature => &["MetadataFeature", "Feature", "Type", "Namespace", "Element"],
            AttributeDefinition => &["AttributeDefinition", "Definition", "DataType", "Classifier", "Type", "Namespace", "Element"],
            EnumerationDefinition => &[
                "EnumerationDefinition",
                "AttributeDefinition",
                "Definition",
                "DataType",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            OccurrenceDefinition => &["OccurrenceDefinition", "Definition", "Class", "Classifier", "Type", "Namespace", "Element"],
            ItemDefinition => &[
                "ItemDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            PartDefinition => &[
                "PartDefinition",
                "ItemDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            PortDefinition => &[
                "PortDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            ActionDefinition => &[
                "ActionDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            ConnectionDefinition => &[
                "ConnectionDefinition",
                "PartDefinition",
                "ItemDefinition",
                "OccurrenceDefinition",
                "Definition",
                "AssociationStructure",
                "Association",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            InterfaceDefinition => &[
                "InterfaceDefinition",
                "ConnectionDefinition",
                "PartDefinition",
                "ItemDefinition",
                "OccurrenceDefinition",
                "Definition",
                "AssociationStructure",
                "Association",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            FlowConnectionDefinition => &[
                "FlowConnectionDefinition",
                "ConnectionDefinition",
                "ActionDefinition",
                "Interaction",
                "OccurrenceDefinition",
                "Definition",
                "Association",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            ConstraintDefinition => &[
                "ConstraintDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Predicate",
                "Function",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            CalculationDefinition => &[
                "CalculationDefinition",
                "ActionDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Function",
                "Behavior",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            MetadataDefinition => &[
                "MetadataDefinition",
                "ItemDefinition",
                "OccurrenceDefinition",
                "Definition",
                "Metaclass",
                "Structure",
                "Class",
                "Classifier",
                "Type",
                "Namespace",
                "Element",
            ],
            ReferenceUsage => &["ReferenceUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            AttributeUsage => &["AttributeUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            EnumerationUsage => &["EnumerationUsage", "AttributeUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            OccurrenceUsage => &["OccurrenceUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            ItemUsage => &["ItemUsage", "OccurrenceUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            PartUsage => &["PartUsage", "ItemUsage", "OccurrenceUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            PortUsage => &["PortUsage", "OccurrenceUsage", "Usage", "Feature", "Type", "Namespace", "Element"],
            ActionUsage => &["ActionUsage", "OccurrenceUsage", "Usage", "Step", "Feature", "Type", "Namespace", "Element"],
            ConnectionUsage => &[
                "ConnectionUsage",
                "PartUsage",
                "ItemUsage",
                "OccurrenceUsage",
                "Usage",
                "Connector",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            InterfaceUsage => &[
                "InterfaceUsage",
                "ConnectionUsage",
                "PartUsage",
                "ItemUsage",
                "OccurrenceUsage",
                "Usage",
                "Connector",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            FlowConnectionUsage => &[
                "FlowConnectionUsage",
                "ConnectionUsage",
                "ActionUsage",
                "OccurrenceUsage",
                "Usage",
                "Connector",
                "Step",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            ConstraintUsage => &[
                "ConstraintUsage",
                "OccurrenceUsage",
                "Usage",
                "BooleanExpression",
                "Expression",
                "Step",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            CalculationUsage => &[
                "CalculationUsage",
                "ActionUsage",
                "OccurrenceUsage",
                "Usage",
                "Expression",
                "Step",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            MetadataUsage => &[
                "MetadataUsage",
                "ItemUsage",
                "OccurrenceUsage",
                "Usage",
                "MetadataFeature",
                "Feature",
                "Type",
                "Namespace",
                "Element",
            ],
            Relationship(RelationshipKind::Specialization) => &["Specialization", "Relationship", "Element"],
            Relationship(RelationshipKind::Conjugation) => &["Conjugation", "Relationship", "Element"],
            Relationship(RelationshipKind::Redefinition) => &["Redefinition", "Subsetting", "Specialization", "Relationship", "Element"],
            Relationship(RelationshipKind::Subsetting) => &["Subsetting", "Specialization", "Relationship", "Element"],
            Relationship(RelationshipKind::FeatureTyping) => &["FeatureTyping", "Specialization", "Relationship", "Element"],
            Relationship(RelationshipKind::Disjoining) => &["Disjoining", "Relationship", "Element"],
            Relationship(RelationshipKind::Unioning) => &["Unioning", "Relationship", "Element"],
            Relationship(RelationshipKind::Intersecting) => &["Intersecting", "Relationship", "Element"],
            Relationship(RelationshipKind::Differencing) => &["Differencing", "Relationship", "Element"],
            Relationship(RelationshipKind::Inverting) => &["FeatureInverting", "Relationship", "Element"],
            Relationship(RelationshipKind::FeatureChaining) => &["FeatureChaining", "Relationship", "Element"],
            Import => &["Import", "Relationship", "Element"],
            Alias => &["Membership", "Relationship", "Element"],
            Documentation => &["Documentation", "Comment", "AnnotatingElement", "Element"],
            Comment => &["Comment", "AnnotatingElement", "Element"],
        }
    }

    /// Human-readable kind name for messages.
    pub fn display(self) -> &'static str {
        match self {
            ElementKind::Relationship(kind) => kind.display(),
            other => other.metaclass_name(),
        }
    }
}

impl From<DeclKind> for ElementKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Namespace => ElementKind::Namespace,
            DeclKind::Package => ElementKind::Package,
            DeclKind::LibraryPackage => ElementKind::LibraryPackage,
            DeclKind::Type => ElementKind::Type,
            DeclKind::Classifier => ElementKind::Classifier,
            DeclKind::Class => ElementKind::Class,
            DeclKind::DataType => ElementKind::DataType,
            DeclKind::Structure => ElementKind::Structure,
            DeclKind::Association => ElementKind::Association,
            DeclKind::AssociationStructure => ElementKind::AssociationStructure,
            DeclKind::Behavior => ElementKind::Behavior,
            DeclKind::Function => ElementKind::Function,
            DeclKind::Predicate => ElementKind::Predicate,
            DeclKind::Interaction => ElementKind::Interaction,
            DeclKind::Metaclass => ElementKind::Metaclass,
            DeclKind::Feature => ElementKind::Feature,
            DeclKind::Step => ElementKind::Step,
            DeclKind::Expression => ElementKind::Expression,
            DeclKind::BooleanExpression => ElementKind::BooleanExpression,
            DeclKind::Invariant => ElementKind::Invariant,
            DeclKind::Connector => ElementKind::Connector,
            DeclKind::MetadataFeature => ElementKind::MetadataFeature,
            DeclKind::AttributeDefinition => ElementKind::AttributeDefinition,
            DeclKind::EnumerationDefinition => ElementKind::EnumerationDefinition,
            DeclKind::OccurrenceDefinition => ElementKind::OccurrenceDefinition,
            DeclKind::ItemDefinition => ElementKind::ItemDefinition,
            DeclKind::PartDefinition => ElementKind::PartDefinition,
            DeclKind::PortDefinition => ElementKind::PortDefinition,
            DeclKind::ActionDefinition => ElementKind::ActionDefinition,
            DeclKind::ConnectionDefinition => ElementKind::ConnectionDefinition,
            DeclKind::InterfaceDefinition => ElementKind::InterfaceDefinition,
            DeclKind::FlowConnectionDefinition => ElementKind::FlowConnectionDefinition,
            DeclKind::ConstraintDefinition => ElementKind::ConstraintDefinition,
            DeclKind::CalculationDefinition => ElementKind::CalculationDefinition,
            DeclKind::MetadataDefinition => ElementKind::MetadataDefinition,
            DeclKind::ReferenceUsage => ElementKind::ReferenceUsage,
            DeclKind::AttributeUsage => ElementKind::AttributeUsage,
            DeclKind::EnumerationUsage => ElementKind::EnumerationUsage,
            DeclKind::OccurrenceUsage => ElementKind::OccurrenceUsage,
            DeclKind::ItemUsage => ElementKind::ItemUsage,
            DeclKind::PartUsage => ElementKind::PartUsage,
            DeclKind::PortUsage => ElementKind::PortUsage,
            DeclKind::ActionUsage => ElementKind::ActionUsage,
            DeclKind::ConnectionUsage => ElementKind::ConnectionUsage,
            DeclKind::InterfaceUsage => ElementKind::InterfaceUsage,
            DeclKind::FlowConnectionUsage => ElementKind::FlowConnectionUsage,
            DeclKind::ConstraintUsage => ElementKind::ConstraintUsage,
            DeclKind::CalculationUsage => ElementKind::CalculationUsage,
            DeclKind::MetadataUsage => ElementKind::MetadataUsage,
        }
    }
}
