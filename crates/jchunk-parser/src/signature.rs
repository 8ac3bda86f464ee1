//! Canonical one-line declaration signatures.
//!
//! Every function here is pure: the same declaration always renders the same string.

use crate::syntax::{DeclKind, MemberDecl, ParamDecl, TypeDecl};

/// `public abstract class Name<T, U> extends Base implements A, B`
///
/// Only classes and interfaces have a type signature.
pub fn type_signature(decl: &TypeDecl<'_>) -> Option<String> {
    let keyword = match decl.kind {
        DeclKind::Class => "class",
        DeclKind::Interface => "interface",
        _ => return None,
    };

    let mut sig = String::new();
    let modifiers = decl.modifiers();
    if !modifiers.is_empty() {
        sig.push_str(&modifiers.join(" "));
        sig.push(' ');
    }
    sig.push_str(keyword);
    sig.push(' ');
    sig.push_str(decl.name());

    let type_params = decl.type_parameters();
    if !type_params.is_empty() {
        sig.push('<');
        sig.push_str(&type_params.join(", "));
        sig.push('>');
    }

    let extends = decl.extends();
    if !extends.is_empty() {
        sig.push_str(" extends ");
        sig.push_str(&extends.join(", "));
    }

    let implements = decl.implements();
    if !implements.is_empty() {
        sig.push_str(" implements ");
        sig.push_str(&implements.join(", "));
    }

    Some(sig)
}

/// Signature of a method or constructor.
pub fn member_signature(member: &MemberDecl<'_>) -> String {
    if member.is_constructor() {
        constructor_signature(member)
    } else {
        method_signature(member)
    }
}

/// `public  static  <T> List<T> name(int a, String... rest) throws IOException`
///
/// Each modifier renders as its keyword plus separator, then one more space, so
/// consecutive modifiers and the following token are two spaces apart.
pub fn method_signature(member: &MemberDecl<'_>) -> String {
    let mut sig = modifier_prefix(&member.modifiers());

    let type_params = member.type_parameters();
    if !type_params.is_empty() {
        sig.push('<');
        sig.push_str(&type_params.join(", "));
        sig.push_str("> ");
    }

    sig.push_str(&member.return_type().unwrap_or_default());
    sig.push(' ');
    sig.push_str(member.name());
    push_parameters(&mut sig, &member.parameters());
    push_throws(&mut sig, &member.throws());
    sig
}

/// Same shape as a method signature, without type parameters or return type.
pub fn constructor_signature(member: &MemberDecl<'_>) -> String {
    let mut sig = modifier_prefix(&member.modifiers());
    sig.push_str(member.name());
    push_parameters(&mut sig, &member.parameters());
    push_throws(&mut sig, &member.throws());
    sig
}

fn modifier_prefix(modifiers: &[String]) -> String {
    modifiers
        .iter()
        .map(|m| format!("{}  ", m.to_lowercase()))
        .collect()
}

fn push_parameters(sig: &mut String, params: &[ParamDecl]) {
    sig.push('(');
    let rendered: Vec<String> = params.iter().map(render_parameter).collect();
    sig.push_str(&rendered.join(", "));
    sig.push(')');
}

fn render_parameter(param: &ParamDecl) -> String {
    if param.variadic {
        format!("{}... {}", param.type_name.replace("[]", ""), param.name)
    } else {
        format!("{} {}", param.type_name, param.name)
    }
}

fn push_throws(sig: &mut String, throws: &[String]) {
    if !throws.is_empty() {
        sig.push_str(" throws ");
        sig.push_str(&throws.join(", "));
    }
}
