//! Run reports: the aggregate result, the per-artifact summary, and artifact naming.

use crate::model::{FileSymbols, Kind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// File written next to the per-artifact records.
pub const SUMMARY_FILE: &str = "project-summary.json";

/// Extraction granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChunkLevel {
    Class,
    Method,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid chunk level '{0}': expected CLASS or METHOD")]
pub struct LevelParseError(pub String);

impl ChunkLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ChunkLevel::Class => "CLASS",
            ChunkLevel::Method => "METHOD",
        }
    }

    /// Tag written as `analysisLevel` in the aggregate report.
    pub fn analysis_level(self) -> &'static str {
        match self {
            ChunkLevel::Class => "CLASS_LEVEL",
            ChunkLevel::Method => "METHOD_LEVEL",
        }
    }

    /// Tag written as `analysisType` in the per-artifact summary.
    pub fn analysis_type(self) -> &'static str {
        match self {
            ChunkLevel::Class => "CLASS_ONLY",
            ChunkLevel::Method => "METHODS_ONLY",
        }
    }

    /// Suffix used in artifact file names.
    pub fn artifact_tag(self) -> &'static str {
        match self {
            ChunkLevel::Class => "class",
            ChunkLevel::Method => "methods",
        }
    }
}

impl FromStr for ChunkLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASS" => Ok(ChunkLevel::Class),
            "METHOD" => Ok(ChunkLevel::Method),
            _ => Err(LevelParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for ChunkLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project-wide aggregate for single-file output mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult<T> {
    pub project_path: String,
    pub analysis_level: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub total_files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_classes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_methods: Option<usize>,
    pub processed_files: usize,
    pub error_files: usize,
    pub chunks: Vec<T>,
    /// Whole-file symbol tables, one per processed file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_symbols: Vec<FileSymbols>,
}

/// Category of a per-artifact record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Class,
    Methods,
}

/// Descriptor of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFileInfo {
    pub file_name: String,
    pub fully_qualified_name: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub count: usize,
    pub file_type: FileType,
}

/// Project summary for per-artifact output mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub project_path: String,
    pub analysis_type: String,
    pub output_directory: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub total_files: usize,
    pub total_classes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_methods: Option<usize>,
    pub processed_files: usize,
    pub error_files: usize,
    pub output_files: Vec<OutputFileInfo>,
}

/// Artifact file name for a fully qualified name: `a.b.C` + `class` → `a_b_C_class.json`.
pub fn artifact_file_name(fully_qualified_name: &str, tag: &str) -> String {
    let stem: String = fully_qualified_name
        .chars()
        .map(|c| if c == '.' || c == '$' { '_' } else { c })
        .collect();
    format!("{stem}_{tag}.json")
}

/// Serde adapter rendering timestamps as `yyyy-MM-ddTHH:mm:ss` (UTC).
pub mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
