//! Chunk data model: the records emitted for type and member declarations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source language tag written into every chunk.
pub const LANGUAGE: &str = "java";

/// What a chunk represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Unknown,
    File,
    Interface,
    Class,
    Struct,
    Enum,
    Annotation,
    Record,
    Delegate,
    Constructor,
    Destructor,
    Method,
    Property,
    Variable,
    Event,
    Indexer,
    Operator,
    NestedType,
}

impl Kind {
    /// Upper-case tag, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Unknown => "UNKNOWN",
            Kind::File => "FILE",
            Kind::Interface => "INTERFACE",
            Kind::Class => "CLASS",
            Kind::Struct => "STRUCT",
            Kind::Enum => "ENUM",
            Kind::Annotation => "ANNOTATION",
            Kind::Record => "RECORD",
            Kind::Delegate => "DELEGATE",
            Kind::Constructor => "CONSTRUCTOR",
            Kind::Destructor => "DESTRUCTOR",
            Kind::Method => "METHOD",
            Kind::Property => "PROPERTY",
            Kind::Variable => "VARIABLE",
            Kind::Event => "EVENT",
            Kind::Indexer => "INDEXER",
            Kind::Operator => "OPERATOR",
            Kind::NestedType => "NESTED_TYPE",
        }
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            Kind::Interface
                | Kind::Class
                | Kind::Struct
                | Kind::Enum
                | Kind::Annotation
                | Kind::Record
                | Kind::NestedType
        )
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive, 1-based line range of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub start_line: usize,
    pub end_line: usize,
}

impl Location {
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Enclosing package plus the extended and implemented type names.
///
/// Cross-references are by name only; there is no link to another chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub namespace: String,
    pub classes: Vec<String>,
}

/// Declared names collected from a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbols {
    pub classes: Vec<String>,
    pub methods: Vec<String>,
    pub fields: Vec<String>,
    pub variables: Vec<String>,
}

impl Symbols {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.methods.is_empty()
            && self.fields.is_empty()
            && self.variables.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notes {
    pub extraction_warnings: Vec<String>,
    pub missing_data: Vec<String>,
}

/// One declared parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

/// Method-level details carried by a member chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub parameter_count: usize,
    pub throws: Vec<String>,
    pub method_calls: Vec<String>,
    pub line_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

/// The emitted unit of output, for either a type or a member declaration.
///
/// `chunk_id` is the package name for type chunks and is shared by every chunk of that
/// package; `key` is the unique identifier. For member chunks `name` holds the
/// containing class name, and the member's own name appears in
/// `fully_qualified_name` and `signature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub language: String,
    pub file_path: String,
    pub chunk_id: String,
    pub package: String,
    pub key: String,
    pub kind: Kind,
    pub name: String,
    pub fully_qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub imports: Vec<String>,
    pub modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub symbols: Symbols,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberDetails>,
    pub notes: Notes,
}

/// Lighter member record used by the method-level aggregate report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodChunk {
    pub chunk_id: String,
    pub chunk_type: Kind,
    pub method_name: String,
    pub class_name: String,
    pub package: String,
    pub file_path: String,
    pub fully_qualified_name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub parameter_count: usize,
    pub annotations: Vec<String>,
    pub throws_declarations: Vec<String>,
    pub line_count: usize,
    pub cyclomatic_complexity: u32,
    pub method_calls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

/// Per-class group of member chunks, written as one artifact in per-artifact mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub fully_qualified_name: String,
    pub class_name: String,
    pub package_name: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub source_file: String,
    #[serde(with = "crate::report::timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub methods: Vec<Chunk>,
}

impl ClassInfo {
    pub fn new(
        fully_qualified_name: impl Into<String>,
        class_name: impl Into<String>,
        package_name: impl Into<String>,
        kind: Kind,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            class_name: class_name.into(),
            package_name: package_name.into(),
            kind,
            source_file: source_file.into(),
            timestamp: Utc::now(),
            methods: Vec::new(),
        }
    }

    /// Index of the group keyed by `fully_qualified_name`, created on miss.
    ///
    /// Linear scan; the first exact match wins.
    pub fn find_or_create(
        groups: &mut Vec<ClassInfo>,
        fully_qualified_name: &str,
        create: impl FnOnce() -> ClassInfo,
    ) -> usize {
        if let Some(idx) = groups
            .iter()
            .position(|g| g.fully_qualified_name == fully_qualified_name)
        {
            return idx;
        }
        groups.push(create());
        groups.len() - 1
    }
}

/// A file's symbol table, reported once per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSymbols {
    pub file_path: String,
    pub symbols: Symbols,
}
