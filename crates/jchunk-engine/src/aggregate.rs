//! Run accounting: folds per-file outcomes into counters and the chunk list.

use chrono::{DateTime, Utc};
use jchunk_core::model::{FileSymbols, Symbols};
use jchunk_core::report::{AnalysisResult, ChunkLevel};
use std::path::Path;

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome<T> {
    Processed {
        file_path: String,
        chunks: Vec<T>,
        symbols: Symbols,
        entities: usize,
    },
    Failed {
        file_path: String,
        reason: String,
    },
}

/// Running totals for one analysis run. Appended to in discovery order, then frozen
/// into an [`AnalysisResult`].
#[derive(Debug)]
pub struct Accumulator<T> {
    level: ChunkLevel,
    started: DateTime<Utc>,
    total_files: usize,
    processed_files: usize,
    error_files: usize,
    entities: usize,
    chunks: Vec<T>,
    file_symbols: Vec<FileSymbols>,
}

impl<T> Accumulator<T> {
    pub fn new(level: ChunkLevel, total_files: usize) -> Self {
        Self {
            level,
            started: Utc::now(),
            total_files,
            processed_files: 0,
            error_files: 0,
            entities: 0,
            chunks: Vec::new(),
            file_symbols: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome<T>) {
        match outcome {
            FileOutcome::Processed {
                file_path,
                chunks,
                symbols,
                entities,
            } => {
                self.processed_files += 1;
                self.entities += entities;
                self.chunks.extend(chunks);
                self.file_symbols.push(FileSymbols { file_path, symbols });
            }
            FileOutcome::Failed { file_path, reason } => {
                tracing::warn!("failed to process {file_path}: {reason}");
                self.error_files += 1;
            }
        }
    }

    pub fn processed_files(&self) -> usize {
        self.processed_files
    }

    pub fn error_files(&self) -> usize {
        self.error_files
    }

    /// Types for a class-level run, members for a method-level run.
    pub fn entities(&self) -> usize {
        self.entities
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn finish(self, project_root: &Path) -> AnalysisResult<T> {
        let (total_classes, total_methods) = match self.level {
            ChunkLevel::Class => (Some(self.entities), None),
            ChunkLevel::Method => (None, Some(self.entities)),
        };
        AnalysisResult {
            project_path: project_root.display().to_string(),
            analysis_level: self.level.analysis_level().to_string(),
            timestamp: self.started,
            total_files: self.total_files,
            total_classes,
            total_methods,
            processed_files: self.processed_files,
            error_files: self.error_files,
            chunks: self.chunks,
            file_symbols: self.file_symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(path: &str, chunks: Vec<&'static str>) -> FileOutcome<&'static str> {
        FileOutcome::Processed {
            file_path: path.to_string(),
            entities: chunks.len(),
            chunks,
            symbols: Symbols::default(),
        }
    }

    #[test]
    fn counts_successes_and_failures() {
        let mut acc = Accumulator::new(ChunkLevel::Class, 3);
        acc.record(processed("A.java", vec!["A", "A$In"]));
        acc.record(FileOutcome::Failed {
            file_path: "B.java".into(),
            reason: "syntax error".into(),
        });
        acc.record(processed("C.java", vec!["C"]));

        let report = acc.finish(Path::new("proj"));
        assert_eq!(report.total_files, 3);
        assert_eq!(report.processed_files, 2);
        assert_eq!(report.error_files, 1);
        assert_eq!(report.total_classes, Some(3));
        assert_eq!(report.total_methods, None);
        assert_eq!(report.chunks, ["A", "A$In", "C"]);
        assert_eq!(report.file_symbols.len(), 2);
        assert_eq!(report.analysis_level, "CLASS_LEVEL");
    }

    #[test]
    fn all_failures_still_produce_a_report() {
        let mut acc: Accumulator<String> = Accumulator::new(ChunkLevel::Method, 2);
        for name in ["A.java", "B.java"] {
            acc.record(FileOutcome::Failed {
                file_path: name.into(),
                reason: "unreadable".into(),
            });
        }
        let report = acc.finish(Path::new("proj"));
        assert_eq!(report.error_files, 2);
        assert_eq!(report.processed_files, 0);
        assert_eq!(report.total_methods, Some(0));
        assert!(report.chunks.is_empty());
    }
}
