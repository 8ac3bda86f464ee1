//! The per-file pipeline and the four run modes.

use crate::aggregate::{Accumulator, FileOutcome};
use crate::discovery::{FileFilter, find_java_files};
use anyhow::{Context, Result};
use jchunk_core::config::ChunkerConfig;
use jchunk_core::ids::TokenSource;
use jchunk_core::model::{Chunk, ClassInfo, MethodChunk};
use jchunk_core::report::{
    AnalysisResult, AnalysisSummary, ChunkLevel, FileType, OutputFileInfo, artifact_file_name,
};
use jchunk_core::storage;
use jchunk_parser::FileChunks;
use jchunk_parser::class_chunks::{build_class_chunks, class_token_demand};
use jchunk_parser::method_chunks::{
    SnippetOptions, build_method_chunks, group_member_chunks, member_token_demand,
};
use jchunk_parser::syntax::{ParsedSource, SourceUnit};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const PROGRESS_INTERVAL: usize = 10;

/// Aggregate report of one run, at either granularity.
#[derive(Debug, Clone)]
pub enum Report {
    Class(AnalysisResult<Chunk>),
    Method(AnalysisResult<MethodChunk>),
}

impl Report {
    pub fn level(&self) -> ChunkLevel {
        match self {
            Report::Class(_) => ChunkLevel::Class,
            Report::Method(_) => ChunkLevel::Method,
        }
    }

    pub fn total_files(&self) -> usize {
        match self {
            Report::Class(r) => r.total_files,
            Report::Method(r) => r.total_files,
        }
    }

    pub fn processed_files(&self) -> usize {
        match self {
            Report::Class(r) => r.processed_files,
            Report::Method(r) => r.processed_files,
        }
    }

    pub fn error_files(&self) -> usize {
        match self {
            Report::Class(r) => r.error_files,
            Report::Method(r) => r.error_files,
        }
    }

    /// Types for a class-level report, members for a method-level one.
    pub fn entity_count(&self) -> usize {
        match self {
            Report::Class(r) => r.total_classes.unwrap_or_default(),
            Report::Method(r) => r.total_methods.unwrap_or_default(),
        }
    }

    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        match self {
            Report::Class(r) => storage::write_report(path, r, pretty),
            Report::Method(r) => storage::write_report(path, r, pretty),
        }
    }
}

/// Number of entities a record stands for.
trait EntityCount {
    fn entity_count(&self) -> usize {
        1
    }
}

impl EntityCount for Chunk {}
impl EntityCount for MethodChunk {}

impl EntityCount for ClassInfo {
    fn entity_count(&self) -> usize {
        self.methods.len()
    }
}

/// Runs chunk extraction over a project.
pub struct Chunker {
    config: ChunkerConfig,
    tokens: TokenSource,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        let tokens = TokenSource::from_mode(config.run.id_tokens);
        Self { config, tokens }
    }

    /// Replace the identifier token source, e.g. with a fresh counter in tests.
    #[must_use]
    pub fn with_token_source(mut self, tokens: TokenSource) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Java files under `root`. Configured exclude patterns are added to `exclude`.
    pub fn discover(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
    ) -> Result<Vec<PathBuf>> {
        let mut exclude = exclude.to_vec();
        exclude.extend(self.config.filter.exclude_patterns.iter().cloned());
        let filter = FileFilter::new(include, &exclude, &self.config.filter.exclude_directories)?;
        let files = find_java_files(root, &filter)
            .with_context(|| format!("failed to discover files under {}", root.display()))?;
        Ok(files)
    }

    pub fn analyze(
        &self,
        root: &Path,
        level: ChunkLevel,
        include: &[String],
        exclude: &[String],
    ) -> Result<Report> {
        Ok(match level {
            ChunkLevel::Class => Report::Class(self.analyze_class_level(root, include, exclude)?),
            ChunkLevel::Method => {
                Report::Method(self.analyze_method_level(root, include, exclude)?)
            }
        })
    }

    /// One chunk per type declaration across the project.
    pub fn analyze_class_level(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
    ) -> Result<AnalysisResult<Chunk>> {
        let files = self.discover(root, include, exclude)?;
        let acc = self.run(
            root,
            &files,
            ChunkLevel::Class,
            class_token_demand,
            build_class_chunks,
        );
        Ok(acc.finish(root))
    }

    /// One method record per method and constructor across the project.
    pub fn analyze_method_level(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
    ) -> Result<AnalysisResult<MethodChunk>> {
        let files = self.discover(root, include, exclude)?;
        let snippets = self.snippet_options();
        let acc = self.run(
            root,
            &files,
            ChunkLevel::Method,
            member_token_demand,
            |unit, file_path, tokens| build_method_chunks(unit, file_path, snippets, tokens),
        );
        Ok(acc.finish(root))
    }

    pub fn generate_files(
        &self,
        root: &Path,
        level: ChunkLevel,
        include: &[String],
        exclude: &[String],
        out_dir: &Path,
    ) -> Result<AnalysisSummary> {
        match level {
            ChunkLevel::Class => self.generate_class_files(root, include, exclude, out_dir),
            ChunkLevel::Method => self.generate_method_files(root, include, exclude, out_dir),
        }
    }

    /// Writes `{fqn}_class.json` per type chunk plus the project summary.
    pub fn generate_class_files(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
        out_dir: &Path,
    ) -> Result<AnalysisSummary> {
        let result = self.analyze_class_level(root, include, exclude)?;
        let pretty = self.config.output.pretty_print;

        let mut output_files = Vec::with_capacity(result.chunks.len());
        for chunk in &result.chunks {
            let file_name = artifact_file_name(
                &chunk.fully_qualified_name,
                ChunkLevel::Class.artifact_tag(),
            );
            storage::write_artifact(out_dir, &file_name, chunk, pretty)?;
            output_files.push(OutputFileInfo {
                file_name,
                fully_qualified_name: chunk.fully_qualified_name.clone(),
                kind: chunk.kind,
                count: chunk.member_count.unwrap_or_default(),
                file_type: FileType::Class,
            });
        }

        let summary = AnalysisSummary {
            project_path: result.project_path,
            analysis_type: ChunkLevel::Class.analysis_type().to_string(),
            output_directory: out_dir.display().to_string(),
            timestamp: result.timestamp,
            total_files: result.total_files,
            total_classes: result.chunks.len(),
            total_methods: None,
            processed_files: result.processed_files,
            error_files: result.error_files,
            output_files,
        };
        storage::write_report(&storage::summary_file(out_dir), &summary, pretty)?;
        tracing::info!(
            "wrote {} class artifacts to {}",
            summary.output_files.len(),
            out_dir.display()
        );
        Ok(summary)
    }

    /// Writes `{fqn}_methods.json` per class with members plus the project summary.
    pub fn generate_method_files(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
        out_dir: &Path,
    ) -> Result<AnalysisSummary> {
        let files = self.discover(root, include, exclude)?;
        let snippets = self.snippet_options();
        let acc = self.run(
            root,
            &files,
            ChunkLevel::Method,
            member_token_demand,
            |unit, file_path, tokens| group_member_chunks(unit, file_path, snippets, tokens),
        );
        let total_methods = acc.entities();
        let result = acc.finish(root);
        let pretty = self.config.output.pretty_print;

        let mut output_files = Vec::with_capacity(result.chunks.len());
        for group in &result.chunks {
            let file_name = artifact_file_name(
                &group.fully_qualified_name,
                ChunkLevel::Method.artifact_tag(),
            );
            storage::write_artifact(out_dir, &file_name, group, pretty)?;
            output_files.push(OutputFileInfo {
                file_name,
                fully_qualified_name: group.fully_qualified_name.clone(),
                kind: group.kind,
                count: group.methods.len(),
                file_type: FileType::Methods,
            });
        }

        let summary = AnalysisSummary {
            project_path: result.project_path,
            analysis_type: ChunkLevel::Method.analysis_type().to_string(),
            output_directory: out_dir.display().to_string(),
            timestamp: result.timestamp,
            total_files: result.total_files,
            total_classes: result.chunks.len(),
            total_methods: Some(total_methods),
            processed_files: result.processed_files,
            error_files: result.error_files,
            output_files,
        };
        storage::write_report(&storage::summary_file(out_dir), &summary, pretty)?;
        tracing::info!(
            "wrote {} method artifacts to {}",
            summary.output_files.len(),
            out_dir.display()
        );
        Ok(summary)
    }

    fn snippet_options(&self) -> SnippetOptions {
        SnippetOptions::from(&self.config.chunk)
    }

    /// Process every file and fold the outcomes in discovery order.
    ///
    /// `demand` must report how many tokens `extract` draws for a file. A parallel run
    /// claims each file's block of tokens in discovery order before extracting, so its
    /// identifiers match a sequential run's.
    fn run<T, F>(
        &self,
        root: &Path,
        files: &[PathBuf],
        level: ChunkLevel,
        demand: fn(&SourceUnit<'_>) -> usize,
        extract: F,
    ) -> Accumulator<T>
    where
        T: EntityCount + Send,
        F: Fn(&SourceUnit<'_>, &str, &TokenSource) -> FileChunks<T> + Sync,
    {
        tracing::info!(
            "analyzing {} files under {} ({} level)",
            files.len(),
            root.display(),
            level
        );
        let mut acc = Accumulator::new(level, files.len());

        if self.config.run.parallel {
            let loaded: Vec<(Result<LoadedFile, FileOutcome<T>>, usize)> = files
                .par_iter()
                .map(|path| {
                    let file = load_file(root, path);
                    let count = file.as_ref().map_or(0, |f| demand(&f.parsed.unit()));
                    (file, count)
                })
                .collect();
            let claimed: Vec<(Result<LoadedFile, FileOutcome<T>>, TokenSource)> = loaded
                .into_iter()
                .map(|(file, count)| {
                    let block = self.tokens.reserve(u64::try_from(count).unwrap_or(u64::MAX));
                    (file, block)
                })
                .collect();
            let outcomes: Vec<FileOutcome<T>> = claimed
                .into_par_iter()
                .map(|(file, block)| match file {
                    Ok(file) => file.extract(&extract, &block),
                    Err(failed) => failed,
                })
                .collect();
            for outcome in outcomes {
                record(&mut acc, outcome);
            }
        } else {
            for path in files {
                let outcome = match load_file(root, path) {
                    Ok(file) => file.extract(&extract, &self.tokens),
                    Err(failed) => failed,
                };
                record(&mut acc, outcome);
            }
        }

        tracing::info!(
            "finished: {} processed, {} failed, {} entities",
            acc.processed_files(),
            acc.error_files(),
            acc.entities()
        );
        acc
    }
}

fn record<T>(acc: &mut Accumulator<T>, outcome: FileOutcome<T>) {
    acc.record(outcome);
    let done = acc.processed_files() + acc.error_files();
    if done % PROGRESS_INTERVAL == 0 {
        tracing::info!("processed {}/{} files", done, acc.total_files());
    }
}

/// Path recorded in chunks: relative to the project root when possible.
fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// A read and parsed file waiting for extraction.
struct LoadedFile {
    file_path: String,
    parsed: ParsedSource,
}

impl LoadedFile {
    fn extract<T, F>(self, extract: &F, tokens: &TokenSource) -> FileOutcome<T>
    where
        T: EntityCount,
        F: Fn(&SourceUnit<'_>, &str, &TokenSource) -> FileChunks<T>,
    {
        let FileChunks { chunks, symbols } = extract(&self.parsed.unit(), &self.file_path, tokens);
        let entities = chunks.iter().map(EntityCount::entity_count).sum();
        tracing::debug!("{}: {} records", self.file_path, chunks.len());
        FileOutcome::Processed {
            file_path: self.file_path,
            chunks,
            symbols,
            entities,
        }
    }
}

fn load_file<T>(root: &Path, path: &Path) -> Result<LoadedFile, FileOutcome<T>> {
    let file_path = display_path(root, path);
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|source| ParsedSource::parse(path, source).map_err(|e| e.to_string()));
    match parsed {
        Ok(parsed) => Ok(LoadedFile { file_path, parsed }),
        Err(reason) => Err(FileOutcome::Failed { file_path, reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn display_path_is_relative_to_root() {
        assert_eq!(
            display_path(Path::new("/p"), Path::new("/p/src/A.java")),
            Path::new("src/A.java").display().to_string()
        );
        assert_eq!(
            display_path(Path::new("/other"), Path::new("/p/A.java")),
            "/p/A.java"
        );
    }

    #[test]
    fn unreadable_file_counts_as_failure() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Bad.java"), [0xff, 0xfe, 0x00]).unwrap();
        write(tmp.path(), "Good.java", "class Good {}");

        let chunker = Chunker::new(ChunkerConfig::default());
        let result = chunker.analyze_class_level(tmp.path(), &[], &[]).unwrap();
        assert_eq!(result.total_files, 2);
        assert_eq!(result.processed_files, 1);
        assert_eq!(result.error_files, 1);
        assert_eq!(result.chunks.len(), 1);
    }

    #[test]
    fn configured_exclude_patterns_apply() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "A.java", "class A {}");
        write(tmp.path(), "ATest.java", "class ATest {}");

        let mut config = ChunkerConfig::default();
        config.filter.exclude_patterns = vec![".*Test\\.java".to_string()];
        let chunker = Chunker::new(config);
        let files = chunker.discover(tmp.path(), &[], &[]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("A.java"));
    }

    fn many_files() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for i in 0..25 {
            // a varying number of types and members per file
            let nested = "class N {} ".repeat(i % 3);
            let methods = "void f() {} ".repeat(1 + i % 4);
            write(
                tmp.path(),
                &format!("p/C{i:02}.java"),
                &format!("package p; class C{i:02} {{ {nested}{methods}}}"),
            );
        }
        write(tmp.path(), "p/Broken.java", "class Broken {");
        tmp
    }

    fn parallel_config() -> ChunkerConfig {
        let mut config = ChunkerConfig::default();
        config.run.parallel = true;
        config
    }

    #[test]
    fn parallel_run_keeps_discovery_order() {
        let tmp = many_files();
        let parallel = Chunker::new(parallel_config())
            .analyze_class_level(tmp.path(), &[], &[])
            .unwrap();
        let sequential = Chunker::new(ChunkerConfig::default())
            .analyze_class_level(tmp.path(), &[], &[])
            .unwrap();

        let keys = |r: &AnalysisResult<Chunk>| -> Vec<String> {
            r.chunks.iter().map(|c| c.key.clone()).collect()
        };
        assert_eq!(keys(&parallel), keys(&sequential));
        assert_eq!(parallel.processed_files, 25);
        assert_eq!(parallel.error_files, 1);
        assert_eq!(parallel.chunks[0].name, "C00");
        assert_eq!(parallel.chunks[0].key, "p.C00#1");
    }

    #[test]
    fn parallel_member_ids_match_sequential() {
        let tmp = many_files();
        let parallel = Chunker::new(parallel_config())
            .analyze_method_level(tmp.path(), &[], &[])
            .unwrap();
        let sequential = Chunker::new(ChunkerConfig::default())
            .analyze_method_level(tmp.path(), &[], &[])
            .unwrap();

        let ids = |r: &AnalysisResult<MethodChunk>| -> Vec<String> {
            r.chunks.iter().map(|m| m.chunk_id.clone()).collect()
        };
        assert_eq!(ids(&parallel), ids(&sequential));
        assert_eq!(parallel.total_methods, sequential.total_methods);

        let out_parallel = tempfile::tempdir().unwrap();
        let out_sequential = tempfile::tempdir().unwrap();
        Chunker::new(parallel_config())
            .generate_method_files(tmp.path(), &[], &[], out_parallel.path())
            .unwrap();
        Chunker::new(ChunkerConfig::default())
            .generate_method_files(tmp.path(), &[], &[], out_sequential.path())
            .unwrap();
        let keys = |dir: &Path| -> Vec<String> {
            let group: ClassInfo = storage::read_report(&dir.join("p_C07_methods.json")).unwrap();
            group.methods.iter().map(|m| m.key.clone()).collect()
        };
        assert_eq!(keys(out_parallel.path()).len(), 4);
        assert_eq!(keys(out_parallel.path()), keys(out_sequential.path()));
    }

    #[test]
    fn report_accessors_dispatch_on_level() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "A.java", "class A { void f() {} void g() {} }");
        let chunker = Chunker::new(ChunkerConfig::default());

        let report = chunker.analyze(tmp.path(), ChunkLevel::Method, &[], &[]).unwrap();
        assert_eq!(report.level(), ChunkLevel::Method);
        assert_eq!(report.entity_count(), 2);
        assert_eq!(report.processed_files(), 1);

        let report = chunker.analyze(tmp.path(), ChunkLevel::Class, &[], &[]).unwrap();
        assert_eq!(report.entity_count(), 1);
        assert_eq!(report.total_files(), 1);
        assert_eq!(report.error_files(), 0);
    }
}
