//! RDF, RDFS, OWL and SHACL vocabulary IRIs

pub use oxigraph::model::vocab::{rdf, rdfs, xsd};

/// OWL 2 terms used by the OWL-RL rules
pub mod owl {
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

    pub const ALL_DIFFERENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AllDifferent");
    pub const ALL_DISJOINT_CLASSES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AllDisjointClasses");
    pub const ALL_DISJOINT_PROPERTIES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AllDisjointProperties");
    pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");
    pub const ASSERTION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#assertionProperty");
    pub const ASYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AsymmetricProperty");
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const COMPLEMENT_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#complementOf");
    pub const DIFFERENT_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#differentFrom");
    pub const DISJOINT_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
    pub const DISTINCT_MEMBERS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#distinctMembers");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
    pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
    pub const HAS_KEY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasKey");
    pub const HAS_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    pub const INTERSECTION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#intersectionOf");
    pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    pub const IRREFLEXIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#IrreflexiveProperty");
    pub const MAX_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#maxCardinality");
    pub const MAX_QUALIFIED_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#maxQualifiedCardinality");
    pub const MEMBERS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#members");
    pub const NEGATIVE_PROPERTY_ASSERTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NegativePropertyAssertion");
    pub const NOTHING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    pub const ONE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#oneOf");
    pub const ON_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onClass");
    pub const ON_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const PROPERTY_CHAIN_AXIOM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#propertyChainAxiom");
    pub const PROPERTY_DISJOINT_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#propertyDisjointWith");
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
    pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    pub const SOURCE_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sourceIndividual");
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    pub const TARGET_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#targetIndividual");
    pub const TARGET_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#targetValue");
    pub const THING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
}

/// SHACL Core terms
pub mod sh {
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.w3.org/ns/shacl#";

    macro_rules! shacl_terms {
        ($($name:ident => $local:literal),* $(,)?) => {
            $(
                pub const $name: NamedNodeRef<'_> =
                    NamedNodeRef::new_unchecked(concat!("http://www.w3.org/ns/shacl#", $local));
            )*
        };
    }

    shacl_terms! {
        // classes and individuals
        NODE_SHAPE => "NodeShape",
        PROPERTY_SHAPE => "PropertyShape",
        VALIDATION_REPORT => "ValidationReport",
        VALIDATION_RESULT => "ValidationResult",
        VIOLATION => "Violation",
        WARNING => "Warning",
        INFO => "Info",
        BLANK_NODE => "BlankNode",
        IRI => "IRI",
        LITERAL => "Literal",
        BLANK_NODE_OR_IRI => "BlankNodeOrIRI",
        BLANK_NODE_OR_LITERAL => "BlankNodeOrLiteral",
        IRI_OR_LITERAL => "IRIOrLiteral",
        // targets
        TARGET_CLASS => "targetClass",
        TARGET_NODE => "targetNode",
        TARGET_SUBJECTS_OF => "targetSubjectsOf",
        TARGET_OBJECTS_OF => "targetObjectsOf",
        // shape structure
        PROPERTY => "property",
        PATH => "path",
        INVERSE_PATH => "inversePath",
        ALTERNATIVE_PATH => "alternativePath",
        ZERO_OR_MORE_PATH => "zeroOrMorePath",
        ONE_OR_MORE_PATH => "oneOrMorePath",
        ZERO_OR_ONE_PATH => "zeroOrOnePath",
        DEACTIVATED => "deactivated",
        SEVERITY => "severity",
        MESSAGE => "message",
        // constraint parameters
        CLASS => "class",
        DATATYPE => "datatype",
        NODE_KIND => "nodeKind",
        MIN_COUNT => "minCount",
        MAX_COUNT => "maxCount",
        MIN_EXCLUSIVE => "minExclusive",
        MIN_INCLUSIVE => "minInclusive",
        MAX_EXCLUSIVE => "maxExclusive",
        MAX_INCLUSIVE => "maxInclusive",
        MIN_LENGTH => "minLength",
        MAX_LENGTH => "maxLength",
        PATTERN => "pattern",
        FLAGS => "flags",
        LANGUAGE_IN => "languageIn",
        UNIQUE_LANG => "uniqueLang",
        EQUALS => "equals",
        DISJOINT => "disjoint",
        LESS_THAN => "lessThan",
        LESS_THAN_OR_EQUALS => "lessThanOrEquals",
        IN => "in",
        HAS_VALUE => "hasValue",
        CLOSED => "closed",
        IGNORED_PROPERTIES => "ignoredProperties",
        NOT => "not",
        AND => "and",
        OR => "or",
        XONE => "xone",
        NODE => "node",
        QUALIFIED_VALUE_SHAPE => "qualifiedValueShape",
        QUALIFIED_MIN_COUNT => "qualifiedMinCount",
        QUALIFIED_MAX_COUNT => "qualifiedMaxCount",
        // report vocabulary
        CONFORMS => "conforms",
        RESULT => "result",
        FOCUS_NODE => "focusNode",
        RESULT_PATH => "resultPath",
        VALUE => "value",
        SOURCE_SHAPE => "sourceShape",
        SOURCE_CONSTRAINT_COMPONENT => "sourceConstraintComponent",
        RESULT_SEVERITY => "resultSeverity",
        RESULT_MESSAGE => "resultMessage",
        // constraint components
        CLASS_CONSTRAINT_COMPONENT => "ClassConstraintComponent",
        DATATYPE_CONSTRAINT_COMPONENT => "DatatypeConstraintComponent",
        NODE_KIND_CONSTRAINT_COMPONENT => "NodeKindConstraintComponent",
        MIN_COUNT_CONSTRAINT_COMPONENT => "MinCountConstraintComponent",
        MAX_COUNT_CONSTRAINT_COMPONENT => "MaxCountConstraintComponent",
        MIN_EXCLUSIVE_CONSTRAINT_COMPONENT => "MinExclusiveConstraintComponent",
        MIN_INCLUSIVE_CONSTRAINT_COMPONENT => "MinInclusiveConstraintComponent",
        MAX_EXCLUSIVE_CONSTRAINT_COMPONENT => "MaxExclusiveConstraintComponent",
        MAX_INCLUSIVE_CONSTRAINT_COMPONENT => "MaxInclusiveConstraintComponent",
        MIN_LENGTH_CONSTRAINT_COMPONENT => "MinLengthConstraintComponent",
        MAX_LENGTH_CONSTRAINT_COMPONENT => "MaxLengthConstraintComponent",
        PATTERN_CONSTRAINT_COMPONENT => "PatternConstraintComponent",
        LANGUAGE_IN_CONSTRAINT_COMPONENT => "LanguageInConstraintComponent",
        UNIQUE_LANG_CONSTRAINT_COMPONENT => "UniqueLangConstraintComponent",
        EQUALS_CONSTRAINT_COMPONENT => "EqualsConstraintComponent",
        DISJOINT_CONSTRAINT_COMPONENT => "DisjointConstraintComponent",
        LESS_THAN_CONSTRAINT_COMPONENT => "LessThanConstraintComponent",
        LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT => "LessThanOrEqualsConstraintComponent",
        IN_CONSTRAINT_COMPONENT => "InConstraintComponent",
        HAS_VALUE_CONSTRAINT_COMPONENT => "HasValueConstraintComponent",
        CLOSED_CONSTRAINT_COMPONENT => "ClosedConstraintComponent",
        NOT_CONSTRAINT_COMPONENT => "NotConstraintComponent",
        AND_CONSTRAINT_COMPONENT => "AndConstraintComponent",
        OR_CONSTRAINT_COMPONENT => "OrConstraintComponent",
        XONE_CONSTRAINT_COMPONENT => "XoneConstraintComponent",
        NODE_CONSTRAINT_COMPONENT => "NodeConstraintComponent",
        QUALIFIED_MIN_COUNT_CONSTRAINT_COMPONENT => "QualifiedMinCountConstraintComponent",
        QUALIFIED_MAX_COUNT_CONSTRAINT_COMPONENT => "QualifiedMaxCountConstraintComponent",
    }
}
