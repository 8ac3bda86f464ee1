//! Whole-file symbol table.

use crate::syntax::{DeclKind, SourceUnit, declarator_names, field_text};
use jchunk_core::model::Symbols;
use tree_sitter::Node;

/// Nesting depth beyond which the walk gives up. Long operator chains nest one level per
/// operand, so generated sources can get deep.
const MAX_DEPTH: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    #[error("syntax tree nested deeper than {MAX_DEPTH} levels at line {line}")]
    TooDeep { line: usize },
}

/// Collect declared type, member, field and local variable names from the whole file.
///
/// If the walk fails, whatever was collected so far is returned and a warning is logged.
pub fn extract_symbols(unit: &SourceUnit<'_>) -> Symbols {
    let mut symbols = Symbols::default();
    let mut walker = Walker {
        source: unit.source(),
        out: &mut symbols,
    };
    if let Err(e) = walker.visit(unit.root(), false, 0) {
        tracing::warn!("partial symbol extraction: {e}");
    }
    symbols
}

struct Walker<'a, 's> {
    source: &'s str,
    out: &'a mut Symbols,
}

impl Walker<'_, '_> {
    /// `in_member` is true while inside a method or constructor; each frame carries its
    /// own flag, so leaving a nested member restores the enclosing state.
    fn visit(&mut self, node: Node<'_>, in_member: bool, depth: usize) -> Result<(), SymbolError> {
        if depth > MAX_DEPTH {
            return Err(SymbolError::TooDeep {
                line: node.start_position().row + 1,
            });
        }

        let mut in_member = in_member;
        match DeclKind::classify(node) {
            Some(DeclKind::Class | DeclKind::Interface) => {
                self.push_name(node, Bucket::Classes);
            }
            Some(DeclKind::Method | DeclKind::Constructor) => {
                self.push_name(node, Bucket::Methods);
                in_member = true;
            }
            Some(DeclKind::Field) => {
                self.out.fields.extend(
                    declarator_names(node, self.source)
                        .into_iter()
                        .map(str::to_string),
                );
            }
            _ if in_member => self.collect_local(node),
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, in_member, depth + 1)?;
        }
        Ok(())
    }

    fn collect_local(&mut self, node: Node<'_>) {
        match node.kind() {
            "local_variable_declaration" => {
                self.out.variables.extend(
                    declarator_names(node, self.source)
                        .into_iter()
                        .map(str::to_string),
                );
            }
            "enhanced_for_statement" | "resource" => {
                self.push_name(node, Bucket::Variables);
            }
            _ => {}
        }
    }

    fn push_name(&mut self, node: Node<'_>, bucket: Bucket) {
        let name = field_text(node, "name", self.source);
        if name.is_empty() {
            return;
        }
        let list = match bucket {
            Bucket::Classes => &mut self.out.classes,
            Bucket::Methods => &mut self.out.methods,
            Bucket::Variables => &mut self.out.variables,
        };
        list.push(name.to_string());
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Classes,
    Methods,
    Variables,
}
