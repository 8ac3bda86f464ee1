//! Structural and cyclomatic complexity.

use crate::syntax::{DeclKind, Descendants, MemberDecl, TypeDecl, text};
use tree_sitter::Node;

/// `2 × methods + 3 × nested types + fields`.
///
/// Methods and fields are counted only when declared directly in the type's body.
/// Nested types are counted at any depth, excluding the type itself.
pub fn structural_complexity(decl: &TypeDecl<'_>) -> u32 {
    let methods = decl.direct(DeclKind::Method).count() as u32;
    let fields = decl.direct(DeclKind::Field).count() as u32;
    let nested = decl.nested_types().len() as u32;
    2 * methods + 3 * nested + fields
}

/// 1 plus one per branch in the body: `if`, `for`, for-each, `while`, `do`, `catch`,
/// `?:`, and each `case` label of every switch.
pub fn cyclomatic_complexity(member: &MemberDecl<'_>, source: &str) -> u32 {
    match member.body() {
        Some(body) => 1 + branch_count(body, source),
        None => 1,
    }
}

fn branch_count(body: Node<'_>, source: &str) -> u32 {
    Descendants::new(body)
        .filter(|node| is_branch(*node, source))
        .count() as u32
}

fn is_branch(node: Node<'_>, source: &str) -> bool {
    match node.kind() {
        "if_statement"
        | "for_statement"
        | "enhanced_for_statement"
        | "while_statement"
        | "do_statement"
        | "catch_clause"
        | "ternary_expression" => true,
        "switch_label" => text(node, source).trim_start().starts_with("case"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceUnit;
    use std::path::Path;

    fn cyclomatic(body: &str) -> u32 {
        let source = format!("class A {{ void f(int x) {{ {body} }} }}");
        let unit = SourceUnit::parse(Path::new("A.java"), &source).unwrap();
        cyclomatic_complexity(&unit.all_members()[0], unit.source())
    }

    fn structural(source: &str) -> u32 {
        let unit = SourceUnit::parse(Path::new("A.java"), source).unwrap();
        structural_complexity(&unit.type_declarations()[0])
    }

    #[test]
    fn straight_line_method_is_one() {
        assert_eq!(cyclomatic("int y = x + 1; System.out.println(y);"), 1);
    }

    #[test]
    fn if_and_for_is_three() {
        assert_eq!(
            cyclomatic("if (x > 0) { x--; } for (int i = 0; i < x; i++) { x++; }"),
            3
        );
    }

    #[test]
    fn each_case_label_counts() {
        let body = "switch (x) { case 1: break; case 2: break; case 3: break; case 4: break; default: break; }";
        assert_eq!(cyclomatic(body), 5);
    }

    #[test]
    fn arrow_switch_expression_counts_cases() {
        let body = "int y = switch (x) { case 1 -> 10; case 2 -> 20; default -> 0; };";
        assert_eq!(cyclomatic(body), 3);
    }

    #[test]
    fn loops_catch_and_ternary() {
        let body = "while (x > 0) { x--; } do { x++; } while (x < 3); \
                    for (int v : new int[] {1}) {} \
                    try { x = 1; } catch (RuntimeException e) { x = 2; } catch (Exception e) {} \
                    int y = x > 1 ? 1 : 0;";
        assert_eq!(cyclomatic(body), 1 + 1 + 1 + 1 + 2 + 1);
    }

    #[test]
    fn branches_inside_lambdas_count() {
        let body = "Runnable r = () -> { if (x > 0) {} };";
        assert_eq!(cyclomatic(body), 2);
    }

    #[test]
    fn abstract_method_is_one() {
        let unit =
            SourceUnit::parse(Path::new("A.java"), "abstract class A { abstract int f(); }").unwrap();
        assert_eq!(cyclomatic_complexity(&unit.all_members()[0], unit.source()), 1);
    }

    #[test]
    fn structural_weights() {
        let source = "class A { int a; int b; int c; void f() {} void g() {} static class B {} }";
        assert_eq!(structural(source), 2 * 2 + 3 + 3);
    }

    #[test]
    fn structural_counts_deep_nested_types_only_once() {
        let source = "class A { class B { class C {} } int f; A() {} }";
        // constructors are not methods; B and C are both nested
        assert_eq!(structural(source), 3 * 2 + 1);
    }

    #[test]
    fn empty_type_is_zero() {
        assert_eq!(structural("interface I {}"), 0);
    }

    #[test]
    fn multi_declarator_field_counts_once() {
        assert_eq!(structural("class A { int x, y, z; }"), 1);
    }
}
