//! Tree-sitter integration for Java parsing.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("parser produced no tree for {}", path.display())]
    NoTree { path: PathBuf },
    #[error("syntax error in {} at line {line}", path.display())]
    Syntax { path: PathBuf, line: usize },
}

/// Parse a Java source file.
///
/// A tree containing ERROR or MISSING nodes counts as a failed parse.
pub fn parse_java(path: &Path, source: &str) -> Result<tree_sitter::Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_java::LANGUAGE.into())?;
    let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
        path: path.to_path_buf(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            line: first_error_line(root),
        });
    }
    Ok(tree)
}

fn first_error_line(root: tree_sitter::Node<'_>) -> usize {
    let mut node = root;
    loop {
        let mut cursor = node.walk();
        let next = node
            .children(&mut cursor)
            .find(|c| c.is_error() || c.is_missing() || c.has_error());
        match next {
            Some(child) if child.is_error() || child.is_missing() => {
                return child.start_position().row + 1;
            }
            Some(child) => node = child,
            None => return node.start_position().row + 1,
        }
    }
}
