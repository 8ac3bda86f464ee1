use chrono::Utc;
use jchunk_core::model::*;
use jchunk_core::report::*;
use jchunk_core::storage;
use tempfile::TempDir;

fn make_chunk(name: &str) -> Chunk {
    Chunk {
        language: LANGUAGE.to_string(),
        file_path: "src/a/b/Foo.java".to_string(),
        chunk_id: "a.b".to_string(),
        package: "a.b".to_string(),
        key: format!("a.b.{name}#1"),
        kind: Kind::Class,
        name: name.to_string(),
        fully_qualified_name: format!("a.b.{name}"),
        parent: Some(ParentRef {
            namespace: "a.b".to_string(),
            classes: vec!["Base".to_string()],
        }),
        signature: Some(format!("public class {name} extends Base")),
        location: Some(Location {
            start_line: 3,
            end_line: 9,
        }),
        imports: vec!["java.util.List".to_string()],
        modifiers: vec!["public".to_string()],
        annotations: Vec::new(),
        symbols: Symbols::default(),
        code: format!("public class {name} extends Base {{}}"),
        complexity: Some(0),
        member_count: Some(0),
        member: None,
        notes: Notes::default(),
    }
}

#[test]
fn test_report_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out").join("chunks.json");

    let report = AnalysisResult {
        project_path: "/tmp/project".to_string(),
        analysis_level: ChunkLevel::Class.analysis_level().to_string(),
        timestamp: Utc::now(),
        total_files: 2,
        total_classes: Some(1),
        total_methods: None,
        processed_files: 1,
        error_files: 1,
        chunks: vec![make_chunk("Foo")],
        file_symbols: Vec::new(),
    };
    storage::write_report(&path, &report, true).unwrap();

    let loaded: AnalysisResult<Chunk> = storage::read_report(&path).unwrap();
    assert_eq!(loaded.chunks, report.chunks);
    assert_eq!(loaded.error_files, 1);
    assert_eq!(loaded.analysis_level, "CLASS_LEVEL");
    assert_eq!(loaded.total_methods, None);
}

#[test]
fn test_chunk_json_field_names() {
    let json = serde_json::to_value(make_chunk("Foo")).unwrap();
    assert_eq!(json["language"], "java");
    assert_eq!(json["chunkId"], "a.b");
    assert_eq!(json["fullyQualifiedName"], "a.b.Foo");
    assert_eq!(json["location"]["startLine"], 3);
    assert_eq!(json["notes"]["extractionWarnings"], serde_json::json!([]));
    assert!(json.get("member").is_none());
    assert!(json.get("annotations").is_none());
}

#[test]
fn test_artifact_written_under_generated_name() {
    let tmp = TempDir::new().unwrap();
    let chunk = make_chunk("Foo");
    let name = artifact_file_name(&chunk.fully_qualified_name, ChunkLevel::Class.artifact_tag());
    let path = storage::write_artifact(tmp.path(), &name, &chunk, false).unwrap();

    assert_eq!(path.file_name().unwrap(), "a_b_Foo_class.json");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains('\n'));
}

#[test]
fn test_summary_serializes_output_files() {
    let summary = AnalysisSummary {
        project_path: "p".to_string(),
        analysis_type: ChunkLevel::Method.analysis_type().to_string(),
        output_directory: "out".to_string(),
        timestamp: Utc::now(),
        total_files: 1,
        total_classes: 1,
        total_methods: Some(2),
        processed_files: 1,
        error_files: 0,
        output_files: vec![OutputFileInfo {
            file_name: "a_b_Foo_methods.json".to_string(),
            fully_qualified_name: "a.b.Foo".to_string(),
            kind: Kind::Class,
            count: 2,
            file_type: FileType::Methods,
        }],
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["analysisType"], "METHODS_ONLY");
    assert_eq!(json["outputFiles"][0]["fileType"], "METHODS");
    assert_eq!(json["outputFiles"][0]["type"], "CLASS");
}
