use std::path::Path;

use jchunk_core::ids::TokenSource;
use jchunk_core::model::Kind;
use jchunk_parser::class_chunks::build_class_chunks;
use jchunk_parser::syntax::SourceUnit;

fn chunks(source: &str) -> jchunk_parser::FileChunks<jchunk_core::model::Chunk> {
    let unit = SourceUnit::parse(Path::new("Foo.java"), source).unwrap();
    build_class_chunks(&unit, "Foo.java", &TokenSource::counter())
}

#[test]
fn java_class_chunk() {
    let out = chunks("public class Foo { }");
    assert_eq!(out.len(), 1);
    assert_eq!(out.chunks[0].name, "Foo");
    assert_eq!(out.chunks[0].kind, Kind::Class);
    assert_eq!(out.chunks[0].chunk_id, "");
    assert_eq!(out.chunks[0].signature.as_deref(), Some("public class Foo"));
}

#[test]
fn java_interface_chunk() {
    let out = chunks("public interface Runnable { void run(); }");
    assert_eq!(out.chunks[0].kind, Kind::Interface);
    assert_eq!(
        out.chunks[0].signature.as_deref(),
        Some("public interface Runnable")
    );
    assert_eq!(out.chunks[0].member_count, Some(1));
}

#[test]
fn java_record_chunk() {
    let out = chunks("public record Point(int x, int y) { }");
    assert_eq!(out.chunks[0].kind, Kind::Record);
    assert_eq!(out.chunks[0].name, "Point");
    assert_eq!(out.chunks[0].signature, None);
}

#[test]
fn java_local_class_is_a_chunk() {
    let out = chunks("class Foo { void f() { class Helper {} } }");
    let names: Vec<&str> = out.chunks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Foo", "Helper"]);
    assert_eq!(out.chunks[1].fully_qualified_name, "Foo$Helper");
}

#[test]
fn java_anonymous_class_is_not_a_chunk() {
    let out = chunks("class Foo { Runnable r = new Runnable() { public void run() {} }; }");
    assert_eq!(out.len(), 1);
    assert_eq!(out.chunks[0].symbols.methods, ["run"]);
}

#[test]
fn java_generic_class_signature() {
    let out = chunks("public class Box<T extends Comparable<T>> implements Iterable<T> { }");
    assert_eq!(
        out.chunks[0].signature.as_deref(),
        Some("public class Box<T> implements Iterable")
    );
}

#[test]
fn java_imports_are_shared_by_all_chunks() {
    let out = chunks("import java.util.*;\nimport java.io.File;\nclass A {}\nclass B {}");
    assert_eq!(out.chunks[0].imports, ["java.util", "java.io.File"]);
    assert_eq!(out.chunks[1].imports, out.chunks[0].imports);
}
