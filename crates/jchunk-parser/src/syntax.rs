//! Typed views over a parsed Java tree.
//!
//! [`SourceUnit`] owns the tree for one file. [`TypeDecl`] and [`MemberDecl`] borrow
//! nodes from it and expose the pieces the chunk builders need.

use crate::treesitter::{self, ParseError};
use jchunk_core::model::{Kind, Location};
use std::path::Path;
use tree_sitter::{Node, Tree};

/// Classification of the declaration nodes the extractors care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
    Record,
    Method,
    Constructor,
    Field,
}

impl DeclKind {
    pub fn classify(node: Node<'_>) -> Option<Self> {
        let kind = match node.kind() {
            "class_declaration" => DeclKind::Class,
            "interface_declaration" => DeclKind::Interface,
            "enum_declaration" => DeclKind::Enum,
            "annotation_type_declaration" => DeclKind::AnnotationType,
            "record_declaration" => DeclKind::Record,
            "method_declaration" => DeclKind::Method,
            "constructor_declaration" | "compact_constructor_declaration" => {
                DeclKind::Constructor
            }
            "field_declaration" | "constant_declaration" => DeclKind::Field,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Interface
                | DeclKind::Enum
                | DeclKind::AnnotationType
                | DeclKind::Record
        )
    }

    pub fn is_member(self) -> bool {
        matches!(self, DeclKind::Method | DeclKind::Constructor)
    }

    pub fn chunk_kind(self) -> Kind {
        match self {
            DeclKind::Class => Kind::Class,
            DeclKind::Interface => Kind::Interface,
            DeclKind::Enum => Kind::Enum,
            DeclKind::AnnotationType => Kind::Annotation,
            DeclKind::Record => Kind::Record,
            DeclKind::Method => Kind::Method,
            DeclKind::Constructor => Kind::Constructor,
            DeclKind::Field => Kind::Variable,
        }
    }
}

/// A file's text together with its tree, for handing a parsed file between threads.
pub struct ParsedSource {
    source: String,
    tree: Tree,
}

impl ParsedSource {
    pub fn parse(path: &Path, source: String) -> Result<Self, ParseError> {
        let tree = treesitter::parse_java(path, &source)?;
        Ok(Self { source, tree })
    }

    pub fn unit(&self) -> SourceUnit<'_> {
        SourceUnit::from_tree(&self.source, self.tree.clone())
    }
}

/// One parsed source file.
pub struct SourceUnit<'s> {
    source: &'s str,
    tree: Tree,
    package: String,
    imports: Vec<String>,
}

impl<'s> SourceUnit<'s> {
    pub fn parse(path: &Path, source: &'s str) -> Result<Self, ParseError> {
        let tree = treesitter::parse_java(path, source)?;
        Ok(Self::from_tree(source, tree))
    }

    pub fn from_tree(source: &'s str, tree: Tree) -> Self {
        let mut package = String::new();
        let mut imports = Vec::new();
        {
            let root = tree.root_node();
            let mut cursor = root.walk();
            for child in root.named_children(&mut cursor) {
                match child.kind() {
                    "package_declaration" => {
                        if let Some(name) = qualified_name_child(child) {
                            package = text(name, source).to_string();
                        }
                    }
                    "import_declaration" => {
                        if let Some(name) = qualified_name_child(child) {
                            imports.push(text(name, source).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        Self {
            source,
            tree,
            package,
            imports,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Package name, empty when the file declares none.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Top-level type declarations in source order.
    pub fn type_declarations(&self) -> Vec<TypeDecl<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter_map(|n| TypeDecl::new(n, self.source))
            .collect()
    }

    /// Every type declaration in the file, depth-first in source order.
    pub fn all_type_declarations(&self) -> Vec<TypeDecl<'_>> {
        Descendants::new(self.root())
            .filter_map(|n| TypeDecl::new(n, self.source))
            .collect()
    }

    /// Every method and constructor in the file, depth-first in source order.
    pub fn all_members(&self) -> Vec<MemberDecl<'_>> {
        Descendants::new(self.root())
            .filter_map(|n| MemberDecl::new(n, self.source))
            .collect()
    }

    /// Fully qualified name of a type: `pkg.Outer$Inner`.
    pub fn qualified_type_name(&self, decl: &TypeDecl<'_>) -> String {
        let mut chain = vec![decl.name().to_string()];
        let mut current = decl.node.parent();
        while let Some(node) = current {
            if let Some(outer) = TypeDecl::new(node, self.source) {
                chain.push(outer.name().to_string());
            }
            current = node.parent();
        }
        chain.reverse();
        qualify(&self.package, &chain.join("$"))
    }
}

/// Join a package and a name, skipping the dot for the default package.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// A class, interface, enum, annotation type, or record declaration.
#[derive(Clone, Copy)]
pub struct TypeDecl<'t> {
    pub node: Node<'t>,
    pub kind: DeclKind,
    source: &'t str,
}

impl<'t> TypeDecl<'t> {
    pub fn new(node: Node<'t>, source: &'t str) -> Option<Self> {
        let kind = DeclKind::classify(node).filter(|k| k.is_type())?;
        Some(Self { node, kind, source })
    }

    pub fn name(&self) -> &'t str {
        field_text(self.node, "name", self.source)
    }

    pub fn modifiers(&self) -> Vec<String> {
        modifier_keywords(self.node, self.source)
    }

    pub fn annotations(&self) -> Vec<String> {
        annotation_names(self.node, self.source)
    }

    pub fn type_parameters(&self) -> Vec<String> {
        type_parameter_names(self.node, self.source)
    }

    /// Simple names of extended types: the superclass of a class, or the
    /// super-interfaces of an interface.
    pub fn extends(&self) -> Vec<String> {
        match self.kind {
            DeclKind::Class => self
                .node
                .child_by_field_name("superclass")
                .map(|sc| type_list_names(sc, self.source))
                .unwrap_or_default(),
            DeclKind::Interface => child_of_kind(self.node, "extends_interfaces")
                .map(|ext| type_list_names(ext, self.source))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Simple names of implemented interfaces.
    pub fn implements(&self) -> Vec<String> {
        self.node
            .child_by_field_name("interfaces")
            .map(|list| type_list_names(list, self.source))
            .unwrap_or_default()
    }

    pub fn location(&self) -> Location {
        location(self.node)
    }

    pub fn text(&self) -> &'t str {
        text(self.node, self.source)
    }

    /// Declarations directly inside the body, with enum body declarations flattened.
    pub fn body_declarations(&self) -> Vec<Node<'t>> {
        let Some(body) = self.node.child_by_field_name("body") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                let mut inner = child.walk();
                out.extend(child.named_children(&mut inner));
            } else {
                out.push(child);
            }
        }
        out
    }

    /// Direct members of the given kind.
    pub fn direct(&self, kind: DeclKind) -> impl Iterator<Item = Node<'t>> {
        self.body_declarations()
            .into_iter()
            .filter(move |n| DeclKind::classify(*n) == Some(kind))
    }

    /// Type declarations anywhere inside this one, excluding itself.
    pub fn nested_types(&self) -> Vec<TypeDecl<'t>> {
        Descendants::new(self.node)
            .skip(1)
            .filter_map(|n| TypeDecl::new(n, self.source))
            .collect()
    }
}

/// One formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub type_name: String,
    pub variadic: bool,
}

/// A method or constructor declaration.
#[derive(Clone, Copy)]
pub struct MemberDecl<'t> {
    pub node: Node<'t>,
    pub kind: DeclKind,
    source: &'t str,
}

impl<'t> MemberDecl<'t> {
    pub fn new(node: Node<'t>, source: &'t str) -> Option<Self> {
        let kind = DeclKind::classify(node).filter(|k| k.is_member())?;
        Some(Self { node, kind, source })
    }

    pub fn name(&self) -> &'t str {
        field_text(self.node, "name", self.source)
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == DeclKind::Constructor
    }

    pub fn modifiers(&self) -> Vec<String> {
        modifier_keywords(self.node, self.source)
    }

    pub fn annotations(&self) -> Vec<String> {
        annotation_names(self.node, self.source)
    }

    pub fn type_parameters(&self) -> Vec<String> {
        type_parameter_names(self.node, self.source)
    }

    /// Declared return type; `None` for constructors.
    pub fn return_type(&self) -> Option<String> {
        self.node
            .child_by_field_name("type")
            .map(|t| type_text(t, self.source))
    }

    pub fn parameters(&self) -> Vec<ParamDecl> {
        let Some(params) = self.node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|p| match p.kind() {
                "formal_parameter" => Some(ParamDecl {
                    name: field_text(p, "name", self.source).to_string(),
                    type_name: p
                        .child_by_field_name("type")
                        .map(|t| type_text(t, self.source))
                        .unwrap_or_default(),
                    variadic: false,
                }),
                "spread_parameter" => {
                    let mut inner = p.walk();
                    let children: Vec<Node<'t>> = p.named_children(&mut inner).collect();
                    let type_name = children
                        .iter()
                        .find(|c| {
                            !is_annotation(**c)
                                && !matches!(
                                    c.kind(),
                                    "modifiers" | "variable_declarator" | "identifier"
                                )
                        })
                        .map(|t| type_text(*t, self.source))
                        .unwrap_or_default();
                    let name = children
                        .iter()
                        .find_map(|c| match c.kind() {
                            "variable_declarator" => Some(field_text(*c, "name", self.source)),
                            "identifier" => Some(text(*c, self.source)),
                            _ => None,
                        })
                        .unwrap_or_default();
                    Some(ParamDecl {
                        name: name.to_string(),
                        type_name,
                        variadic: true,
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Declared thrown exception types, as written.
    pub fn throws(&self) -> Vec<String> {
        child_of_kind(self.node, "throws")
            .map(|t| {
                let mut cursor = t.walk();
                t.named_children(&mut cursor)
                    .map(|n| type_text(n, self.source))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body block; absent for abstract and interface methods.
    pub fn body(&self) -> Option<Node<'t>> {
        self.node.child_by_field_name("body")
    }

    pub fn body_text(&self) -> Option<&'t str> {
        self.body().map(|b| text(b, self.source))
    }

    /// Names of every method invocation inside the declaration, in source order.
    pub fn invoked_methods(&self) -> Vec<String> {
        Descendants::new(self.node)
            .filter(|n| n.kind() == "method_invocation")
            .map(|n| field_text(n, "name", self.source).to_string())
            .collect()
    }

    /// Nearest enclosing type declaration.
    pub fn enclosing_type(&self) -> Option<TypeDecl<'t>> {
        let mut current = self.node.parent();
        while let Some(node) = current {
            if let Some(decl) = TypeDecl::new(node, self.source) {
                return Some(decl);
            }
            current = node.parent();
        }
        None
    }

    pub fn location(&self) -> Location {
        location(self.node)
    }

    pub fn text(&self) -> &'t str {
        text(self.node, self.source)
    }
}

/// Pre-order walk over named nodes, starting with the root itself.
pub struct Descendants<'t> {
    stack: Vec<Node<'t>>,
}

impl<'t> Descendants<'t> {
    pub fn new(root: Node<'t>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let node = self.stack.pop()?;
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// Source text covered by a node.
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

pub fn field_text<'s>(node: Node<'_>, field: &str, source: &'s str) -> &'s str {
    node.child_by_field_name(field)
        .map(|n| text(n, source))
        .unwrap_or_default()
}

pub fn location(node: Node<'_>) -> Location {
    Location {
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
    }
}

pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

/// Declarator names bound by a field or local variable declaration.
pub fn declarator_names<'s>(node: Node<'_>, source: &'s str) -> Vec<&'s str> {
    let mut cursor = node.walk();
    node.children_by_field_name("declarator", &mut cursor)
        .map(|d| field_text(d, "name", source))
        .collect()
}

/// Type text in printer form: no whitespace around `<`, `>`, `[`, `]`, `.` or `,`, a
/// single space after each comma, and other runs of whitespace collapsed to one space.
fn type_text(node: Node<'_>, source: &str) -> String {
    normalize_type(text(node, source))
}

fn normalize_type(raw: &str) -> String {
    let is_punct = |c: char| matches!(c, '<' | '>' | '[' | ']' | '.' | ',');
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut chars = collapsed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' && (out.ends_with(is_punct) || chars.peek().is_some_and(|n| is_punct(*n))) {
            continue;
        }
        out.push(c);
    }
    out.replace(',', ", ")
}

fn qualified_name_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
}

fn is_annotation(node: Node<'_>) -> bool {
    matches!(node.kind(), "marker_annotation" | "annotation")
}

fn modifier_keywords(node: Node<'_>, source: &str) -> Vec<String> {
    let Some(mods) = child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = mods.walk();
    mods.children(&mut cursor)
        .filter(|c| !is_annotation(*c) && !c.is_extra())
        .map(|c| text(c, source).to_string())
        .collect()
}

fn annotation_names(node: Node<'_>, source: &str) -> Vec<String> {
    let Some(mods) = child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = mods.walk();
    mods.children(&mut cursor)
        .filter(|c| is_annotation(*c))
        .map(|c| field_text(c, "name", source).to_string())
        .collect()
}

fn type_parameter_names(node: Node<'_>, source: &str) -> Vec<String> {
    let Some(params) = child_of_kind(node, "type_parameters") else {
        return Vec::new();
    };
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter(|p| p.kind() == "type_parameter")
        .filter_map(|p| {
            let mut inner = p.walk();
            p.named_children(&mut inner)
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))
                .map(|n| text(n, source).to_string())
        })
        .collect()
}

/// Simple names of every type in a `superclass`, `super_interfaces` or
/// `extends_interfaces` clause.
fn type_list_names(node: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let mut out = Vec::new();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            let mut inner = child.walk();
            out.extend(
                child
                    .named_children(&mut inner)
                    .map(|t| simple_type_name(t, source)),
            );
        } else {
            out.push(simple_type_name(child, source));
        }
    }
    out
}

/// `java.util.List<String>` → `List`.
fn simple_type_name(node: Node<'_>, source: &str) -> String {
    match node.kind() {
        "generic_type" => {
            let mut cursor = node.walk();
            let base = node
                .named_children(&mut cursor)
                .find(|c| matches!(c.kind(), "type_identifier" | "scoped_type_identifier"));
            match base {
                Some(b) => simple_type_name(b, source),
                None => text(node, source).to_string(),
            }
        }
        "scoped_type_identifier" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .filter(|c| c.kind() == "type_identifier")
                .last()
                .map(|n| text(n, source).to_string())
                .unwrap_or_else(|| text(node, source).to_string())
        }
        _ => text(node, source).to_string(),
    }
}
