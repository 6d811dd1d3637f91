//! Domain constants shared across the engine.

/// File extension of KerML documents.
pub const KERML_EXT: &str = "kerml";

/// File extension of SysML documents.
pub const SYSML_EXT: &str = "sysml";

/// All extensions the file loader picks up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[KERML_EXT, SYSML_EXT];

/// Environment variable overriding the standard library location.
pub const STDLIB_ENV_VAR: &str = "SYSTER_STDLIB";

/// Separator between qualified name segments.
pub const QUALIFIED_SEPARATOR: &str = "::";

// ============================================================================
// IMPLICIT SUPERTYPES
// ============================================================================

pub const ANYTHING: &str = "Base::Anything";
pub const THINGS: &str = "Base::things";
pub const DATA_VALUE: &str = "Base::DataValue";
pub const OCCURRENCE: &str = "Occurrences::Occurrence";
pub const OCCURRENCES: &str = "Occurrences::occurrences";
pub const OBJECT: &str = "Objects::Object";
pub const LINK: &str = "Links::Link";
pub const LINKS: &str = "Links::links";
pub const PERFORMANCE: &str = "Performances::Performance";
pub const PERFORMANCES: &str = "Performances::performances";
pub const EVALUATION: &str = "Performances::Evaluation";
pub const EVALUATIONS: &str = "Performances::evaluations";
pub const BOOLEAN_EVALUATION: &str = "Performances::BooleanEvaluation";
pub const BOOLEAN_EVALUATIONS: &str = "Performances::booleanEvaluations";
pub const INTERACTION: &str = "Transfers::Transfer";
pub const METAOBJECT: &str = "Metaobjects::Metaobject";
pub const METAOBJECTS: &str = "Metaobjects::metaobjects";

pub const BOOLEAN: &str = "ScalarValues::Boolean";
pub const STRING: &str = "ScalarValues::String";
pub const INTEGER: &str = "ScalarValues::Integer";
pub const REAL: &str = "ScalarValues::Real";

pub const ATTRIBUTE_VALUES: &str = "Attributes::attributeValues";
pub const ITEM: &str = "Items::Item";
pub const ITEMS: &str = "Items::items";
pub const PART: &str = "Parts::Part";
pub const PARTS: &str = "Parts::parts";
pub const PORT: &str = "Ports::Port";
pub const PORTS: &str = "Ports::ports";
pub const ACTION: &str = "Actions::Action";
pub const ACTIONS: &str = "Actions::actions";
pub const CONNECTION: &str = "Connections::Connection";
pub const CONNECTIONS: &str = "Connections::connections";
pub const INTERFACE: &str = "Interfaces::Interface";
pub const INTERFACES: &str = "Interfaces::interfaces";
pub const FLOW_CONNECTION: &str = "Connections::MessageConnection";
pub const FLOW_CONNECTIONS: &str = "Connections::messageConnections";
pub const CONSTRAINT: &str = "Constraints::ConstraintCheck";
pub const CONSTRAINTS: &str = "Constraints::constraintChecks";
pub const CALCULATION: &str = "Calculations::Calculation";
pub const CALCULATIONS: &str = "Calculations::calculations";
pub const METADATA_ITEM: &str = "Metadata::MetadataItem";
pub const METADATA_ITEMS: &str = "Metadata::metadataItems";
