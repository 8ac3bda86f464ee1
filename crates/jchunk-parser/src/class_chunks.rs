//! Class-level chunk construction: one chunk per type declaration.

use crate::metrics::structural_complexity;
use crate::signature::type_signature;
use crate::symbols::extract_symbols;
use crate::syntax::{DeclKind, SourceUnit, TypeDecl};
use jchunk_core::ids::TokenSource;
use jchunk_core::model::{Chunk, LANGUAGE, Notes, ParentRef, Symbols};

/// Records built from one file, plus that file's symbol table.
///
/// The symbol table covers the whole file. It is also copied into the first record
/// (when the record type carries one); every other record has an empty table.
#[derive(Debug, Clone, Default)]
pub struct FileChunks<T> {
    pub chunks: Vec<T>,
    pub symbols: Symbols,
}

impl<T> FileChunks<T> {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// One chunk per type declaration in the file, depth-first in source order.
pub fn build_class_chunks(
    unit: &SourceUnit<'_>,
    file_path: &str,
    tokens: &TokenSource,
) -> FileChunks<Chunk> {
    let mut chunks: Vec<Chunk> = unit
        .all_type_declarations()
        .iter()
        .map(|decl| type_chunk(unit, decl, file_path, tokens))
        .collect();

    let symbols = extract_symbols(unit);
    if let Some(first) = chunks.first_mut() {
        first.symbols = symbols.clone();
    }
    FileChunks { chunks, symbols }
}

/// Identifier tokens [`build_class_chunks`] draws for this file.
pub fn class_token_demand(unit: &SourceUnit<'_>) -> usize {
    unit.all_type_declarations().len()
}

/// Extended and implemented type names under the file's package.
pub fn parent_ref(unit: &SourceUnit<'_>, decl: &TypeDecl<'_>) -> ParentRef {
    let mut classes = decl.extends();
    classes.extend(decl.implements());
    ParentRef {
        namespace: unit.package().to_string(),
        classes,
    }
}

fn type_chunk(
    unit: &SourceUnit<'_>,
    decl: &TypeDecl<'_>,
    file_path: &str,
    tokens: &TokenSource,
) -> Chunk {
    let package = unit.package().to_string();
    let fqn = unit.qualified_type_name(decl);
    let member_count =
        decl.direct(DeclKind::Method).count() + decl.direct(DeclKind::Constructor).count();

    Chunk {
        language: LANGUAGE.to_string(),
        file_path: file_path.to_string(),
        chunk_id: package.clone(),
        key: format!("{fqn}#{}", tokens.next()),
        package,
        kind: decl.kind.chunk_kind(),
        name: decl.name().to_string(),
        fully_qualified_name: fqn,
        parent: Some(parent_ref(unit, decl)),
        signature: type_signature(decl),
        location: Some(decl.location()),
        imports: unit.imports().to_vec(),
        modifiers: decl.modifiers(),
        annotations: decl.annotations(),
        symbols: Symbols::default(),
        code: decl.text().to_string(),
        complexity: Some(structural_complexity(decl)),
        member_count: Some(member_count),
        member: None,
        notes: Notes::default(),
    }
}
