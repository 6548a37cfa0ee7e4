//! Core data types for schema comparison.
//!
//! A [`SchemaObject`] is a named database entity (table, view, procedure,
//! function, trigger) identified by schema + name + kind. Objects are matched
//! across the source and target databases by their [`ObjectIdentity`], and
//! every differing object yields one [`DiffOutcome`].

use std::fmt;

/// Concrete object kinds as reported by the catalog (`sys.objects.type_desc`).
///
/// `Unknown` carries the raw catalog tag so unrecognized kinds can still be
/// reported and matched across databases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Table,
    View,
    Procedure,
    ScalarFunction,
    InlineTableValuedFunction,
    TableValuedFunction,
    Trigger,
    Unknown(String),
}

impl ObjectKind {
    /// Parse a catalog `type_desc` tag.
    pub fn from_type_desc(tag: &str) -> Self {
        match tag {
            "USER_TABLE" => ObjectKind::Table,
            "VIEW" => ObjectKind::View,
            "SQL_STORED_PROCEDURE" => ObjectKind::Procedure,
            "SQL_SCALAR_FUNCTION" => ObjectKind::ScalarFunction,
            "SQL_INLINE_TABLE_VALUED_FUNCTION" => ObjectKind::InlineTableValuedFunction,
            "SQL_TABLE_VALUED_FUNCTION" => ObjectKind::TableValuedFunction,
            "SQL_TRIGGER" => ObjectKind::Trigger,
            other => ObjectKind::Unknown(other.to_string()),
        }
    }

    /// The catalog `type_desc` tag for this kind.
    pub fn type_desc(&self) -> &str {
        match self {
            ObjectKind::Table => "USER_TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Procedure => "SQL_STORED_PROCEDURE",
            ObjectKind::ScalarFunction => "SQL_SCALAR_FUNCTION",
            ObjectKind::InlineTableValuedFunction => "SQL_INLINE_TABLE_VALUED_FUNCTION",
            ObjectKind::TableValuedFunction => "SQL_TABLE_VALUED_FUNCTION",
            ObjectKind::Trigger => "SQL_TRIGGER",
            ObjectKind::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_desc())
    }
}

/// A named schema object in one database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaObject {
    pub schema: String,
    pub name: String,
    pub kind: ObjectKind,
}

impl SchemaObject {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind,
        }
    }

    /// The `(schema, name, kind)` triple used to match objects across
    /// databases. Must be unique within one listing; the comparison keeps the
    /// last entry if a listing violates that.
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity {
            schema: self.schema.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.schema, self.name, self.kind)
    }
}

/// Identity key for cross-database matching and deterministic output order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentity {
    pub schema: String,
    pub name: String,
    pub kind: ObjectKind,
}

/// Which of the two configured databases an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    /// File-name prefix for debug snapshots.
    pub fn snapshot_prefix(&self) -> &'static str {
        match self {
            Side::Source => "SOURCE",
            Side::Target => "TARGET",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// The result of comparing one source object against the target database.
///
/// Produced by exactly one worker task and immutable once handed to the
/// collector. Objects whose definitions match after normalization produce no
/// outcome at all.
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    pub object: SchemaObject,
    pub exists_in_target: bool,
    pub has_difference: bool,
    /// DROP (if needed) plus CREATE text reconciling the target with the
    /// source. Always the raw definition; normalization is for comparison
    /// only.
    pub remediation_script: String,
}

/// Logical object categories a caller can request.
///
/// Categories expand to one or more concrete catalog tags; `Function` covers
/// the three function sub-kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Table,
    View,
    Procedure,
    Function,
    Trigger,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 5] = [
        ObjectCategory::Table,
        ObjectCategory::View,
        ObjectCategory::Procedure,
        ObjectCategory::Function,
        ObjectCategory::Trigger,
    ];

    /// Parse a requested category name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TABLE" => Some(ObjectCategory::Table),
            "VIEW" => Some(ObjectCategory::View),
            "PROCEDURE" => Some(ObjectCategory::Procedure),
            "FUNCTION" => Some(ObjectCategory::Function),
            "TRIGGER" => Some(ObjectCategory::Trigger),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectCategory::Table => "TABLE",
            ObjectCategory::View => "VIEW",
            ObjectCategory::Procedure => "PROCEDURE",
            ObjectCategory::Function => "FUNCTION",
            ObjectCategory::Trigger => "TRIGGER",
        }
    }

    /// Concrete catalog tags this category selects.
    pub fn kind_tags(&self) -> &'static [&'static str] {
        match self {
            ObjectCategory::Table => &["USER_TABLE"],
            ObjectCategory::View => &["VIEW"],
            ObjectCategory::Procedure => &["SQL_STORED_PROCEDURE"],
            ObjectCategory::Function => &[
                "SQL_SCALAR_FUNCTION",
                "SQL_INLINE_TABLE_VALUED_FUNCTION",
                "SQL_TABLE_VALUED_FUNCTION",
            ],
            ObjectCategory::Trigger => &["SQL_TRIGGER"],
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate requested category names into the known category set.
///
/// Unrecognized names are dropped silently; duplicates collapse to the first
/// occurrence, preserving request order.
pub fn parse_categories<I, S>(requested: I) -> Vec<ObjectCategory>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut categories = Vec::new();
    for name in requested {
        if let Some(category) = ObjectCategory::parse(name.as_ref()) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
    }
    categories
}

/// Expand categories into the flat set of concrete catalog tags.
pub fn expand_categories(categories: &[ObjectCategory]) -> Vec<&'static str> {
    categories
        .iter()
        .flat_map(|category| category.kind_tags().iter().copied())
        .collect()
}
