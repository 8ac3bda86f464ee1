//! Method-level chunk construction and per-class grouping.

use crate::class_chunks::{FileChunks, parent_ref};
use crate::metrics::cyclomatic_complexity;
use crate::signature::member_signature;
use crate::symbols::extract_symbols;
use crate::syntax::{MemberDecl, SourceUnit, qualify};
use jchunk_core::config::ChunkConfig;
use jchunk_core::ids::TokenSource;
use jchunk_core::model::{
    Chunk, ClassInfo, Kind, LANGUAGE, Location, MemberDetails, MethodChunk, Notes, Parameter,
    ParentRef, Symbols,
};
use std::path::Path;

/// How member code snippets are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    pub max_length: usize,
    pub enabled: bool,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            max_length: 200,
            enabled: true,
        }
    }
}

impl From<&ChunkConfig> for SnippetOptions {
    fn from(config: &ChunkConfig) -> Self {
        Self {
            max_length: config.max_snippet_length,
            enabled: config.include_code_snippets,
        }
    }
}

/// Cut `code` to `max_length` characters and append `...` when it is longer.
pub fn truncate_snippet(code: &str, max_length: usize) -> String {
    match code.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}...", &code[..cut]),
        None => code.to_string(),
    }
}

/// Everything known about one member, computed once and shared by both record shapes.
struct MemberFacts {
    kind: Kind,
    member_name: String,
    class_name: String,
    class_kind: Kind,
    class_fqn: String,
    fqn: String,
    package: String,
    file_path: String,
    token: String,
    sequence: u64,
    signature: String,
    parent: ParentRef,
    location: Location,
    imports: Vec<String>,
    modifiers: Vec<String>,
    annotations: Vec<String>,
    parameters: Vec<Parameter>,
    return_type: Option<String>,
    throws: Vec<String>,
    method_calls: Vec<String>,
    line_count: usize,
    cyclomatic: u32,
    code: String,
    snippet: Option<String>,
    has_body: bool,
}

impl MemberFacts {
    fn collect(
        unit: &SourceUnit<'_>,
        member: &MemberDecl<'_>,
        file_path: &str,
        snippets: SnippetOptions,
        tokens: &TokenSource,
    ) -> Self {
        let package = unit.package().to_string();
        let enclosing = member.enclosing_type();
        let (class_name, class_kind, class_fqn, parent) = match &enclosing {
            Some(decl) => (
                decl.name().to_string(),
                decl.kind.chunk_kind(),
                unit.qualified_type_name(decl),
                parent_ref(unit, decl),
            ),
            None => (
                String::new(),
                Kind::Class,
                package.clone(),
                ParentRef {
                    namespace: package.clone(),
                    classes: Vec::new(),
                },
            ),
        };

        let kind = member.kind.chunk_kind();
        let member_name = member.name().to_string();
        let sequence = tokens.next();
        let stem = Path::new(file_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = member.body_text();
        let code = member.text().to_string();

        Self {
            kind,
            token: format!("{stem}_{member_name}_{kind}_{sequence}"),
            fqn: qualify(&class_fqn, &member_name),
            member_name,
            class_name,
            class_kind,
            class_fqn,
            package,
            file_path: file_path.to_string(),
            sequence,
            signature: member_signature(member),
            parent,
            location: member.location(),
            imports: unit.imports().to_vec(),
            modifiers: member.modifiers(),
            annotations: member.annotations(),
            parameters: member
                .parameters()
                .into_iter()
                .map(|p| Parameter {
                    name: p.name,
                    type_name: p.type_name,
                    variadic: p.variadic,
                })
                .collect(),
            return_type: member.return_type(),
            throws: member.throws(),
            method_calls: member.invoked_methods(),
            // an absent body counts as one empty line
            line_count: body.unwrap_or_default().lines().count().max(1),
            cyclomatic: cyclomatic_complexity(member, unit.source()),
            snippet: snippets
                .enabled
                .then(|| truncate_snippet(body.unwrap_or_default(), snippets.max_length)),
            code,
            has_body: body.is_some(),
        }
    }

    fn to_chunk(&self) -> Chunk {
        let mut notes = Notes::default();
        if !self.has_body {
            notes.missing_data.push("body".to_string());
        }
        Chunk {
            language: LANGUAGE.to_string(),
            file_path: self.file_path.clone(),
            chunk_id: format!("{}:{}", self.fqn, self.token),
            package: self.package.clone(),
            key: format!("{}#{}", self.fqn, self.sequence),
            kind: self.kind,
            // containing class, not the member
            name: self.class_name.clone(),
            fully_qualified_name: self.fqn.clone(),
            parent: Some(self.parent.clone()),
            signature: Some(self.signature.clone()),
            location: Some(self.location),
            imports: self.imports.clone(),
            modifiers: self.modifiers.clone(),
            annotations: self.annotations.clone(),
            symbols: Symbols::default(),
            code: self.code.clone(),
            complexity: Some(self.cyclomatic),
            member_count: None,
            member: Some(MemberDetails {
                return_type: self.return_type.clone(),
                parameter_count: self.parameters.len(),
                parameters: self.parameters.clone(),
                throws: self.throws.clone(),
                method_calls: self.method_calls.clone(),
                line_count: self.line_count,
                code_snippet: self.snippet.clone(),
            }),
            notes,
        }
    }

    fn into_method_chunk(self) -> MethodChunk {
        MethodChunk {
            chunk_id: self.token,
            chunk_type: self.kind,
            method_name: self.member_name,
            class_name: self.class_name,
            package: self.package,
            file_path: self.file_path,
            fully_qualified_name: self.fqn,
            start_line: self.location.start_line,
            end_line: self.location.end_line,
            total_lines: self.location.line_count(),
            return_type: self.return_type,
            modifiers: self.modifiers,
            parameter_count: self.parameters.len(),
            parameters: self.parameters,
            annotations: self.annotations,
            throws_declarations: self.throws,
            line_count: self.line_count,
            cyclomatic_complexity: self.cyclomatic,
            method_calls: self.method_calls,
            code_snippet: self.snippet,
        }
    }
}

fn collect_members(
    unit: &SourceUnit<'_>,
    file_path: &str,
    snippets: SnippetOptions,
    tokens: &TokenSource,
) -> Vec<MemberFacts> {
    unit.all_members()
        .iter()
        .map(|m| MemberFacts::collect(unit, m, file_path, snippets, tokens))
        .collect()
}

/// Identifier tokens [`build_method_chunks`] and [`group_member_chunks`] draw for this file.
pub fn member_token_demand(unit: &SourceUnit<'_>) -> usize {
    unit.all_members().len()
}

/// One [`MethodChunk`] per method and constructor, in source order.
pub fn build_method_chunks(
    unit: &SourceUnit<'_>,
    file_path: &str,
    snippets: SnippetOptions,
    tokens: &TokenSource,
) -> FileChunks<MethodChunk> {
    let chunks = collect_members(unit, file_path, snippets, tokens)
        .into_iter()
        .map(MemberFacts::into_method_chunk)
        .collect();
    FileChunks {
        chunks,
        symbols: extract_symbols(unit),
    }
}

/// Member chunks grouped under their nearest enclosing type, groups in first-seen order.
///
/// The file's symbol table is copied into the first member chunk of the first group.
pub fn group_member_chunks(
    unit: &SourceUnit<'_>,
    file_path: &str,
    snippets: SnippetOptions,
    tokens: &TokenSource,
) -> FileChunks<ClassInfo> {
    let mut groups: Vec<ClassInfo> = Vec::new();
    for facts in collect_members(unit, file_path, snippets, tokens) {
        let idx = ClassInfo::find_or_create(&mut groups, &facts.class_fqn, || {
            ClassInfo::new(
                facts.class_fqn.clone(),
                facts.class_name.clone(),
                facts.package.clone(),
                facts.class_kind,
                facts.file_path.clone(),
            )
        });
        groups[idx].methods.push(facts.to_chunk());
    }

    let symbols = extract_symbols(unit);
    if let Some(first) = groups.first_mut().and_then(|g| g.methods.first_mut()) {
        first.symbols = symbols.clone();
    }
    FileChunks {
        chunks: groups,
        symbols,
    }
}
