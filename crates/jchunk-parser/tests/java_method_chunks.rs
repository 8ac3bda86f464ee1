use std::path::Path;

use jchunk_core::ids::TokenSource;
use jchunk_core::model::Kind;
use jchunk_parser::method_chunks::{SnippetOptions, build_method_chunks, group_member_chunks};
use jchunk_parser::syntax::SourceUnit;

const SERVICE: &str = r#"package com.acme.orders;

import java.util.List;
import java.util.function.Function;

@Service
public class OrderService extends BaseService implements Auditable {

    private final OrderRepository repository;

    public OrderService(OrderRepository repository) {
        this.repository = repository;
    }

    @Transactional
    public synchronized <T> List<T> findAll(Function<Order, T> mapper, String... tags) throws RepositoryException {
        List<T> out = new java.util.ArrayList<>();
        for (Order o : repository.findAll()) {
            if (o.isActive() && tags.length > 0) {
                out.add(mapper.apply(o));
            }
        }
        return out;
    }

    int priority(Order order) {
        switch (order.getType()) {
            case RUSH:
                return 3;
            case EXPRESS:
                return 2;
            case STANDARD:
                return 1;
            default:
                return 0;
        }
    }

    private Runnable audit() {
        return new Runnable() {
            @Override
            public void run() {
                log(repository.count() > 0 ? "busy" : "idle");
            }
        };
    }
}
"#;

#[test]
fn java_method_level_visits_every_member() {
    let unit = SourceUnit::parse(Path::new("OrderService.java"), SERVICE).unwrap();
    let out = build_method_chunks(
        &unit,
        "OrderService.java",
        SnippetOptions::default(),
        &TokenSource::counter(),
    );
    let names: Vec<&str> = out.chunks.iter().map(|m| m.method_name.as_str()).collect();
    assert_eq!(names, ["OrderService", "findAll", "priority", "audit", "run"]);
    assert!(out.chunks.iter().all(|m| m.class_name == "OrderService"));
}

#[test]
fn java_method_level_generic_signature_parts() {
    let unit = SourceUnit::parse(Path::new("OrderService.java"), SERVICE).unwrap();
    let out = build_method_chunks(
        &unit,
        "OrderService.java",
        SnippetOptions::default(),
        &TokenSource::counter(),
    );
    let find_all = &out.chunks[1];
    assert_eq!(find_all.modifiers, ["public", "synchronized"]);
    assert_eq!(find_all.annotations, ["Transactional"]);
    assert_eq!(find_all.return_type.as_deref(), Some("List<T>"));
    assert_eq!(find_all.throws_declarations, ["RepositoryException"]);
    assert_eq!(find_all.parameter_count, 2);
    assert_eq!(find_all.method_calls, ["findAll", "isActive", "add", "apply"]);
    // for-each and if; && is not a branch
    assert_eq!(find_all.cyclomatic_complexity, 3);
}

#[test]
fn java_switch_cases_drive_complexity() {
    let unit = SourceUnit::parse(Path::new("OrderService.java"), SERVICE).unwrap();
    let out = build_method_chunks(
        &unit,
        "OrderService.java",
        SnippetOptions::default(),
        &TokenSource::counter(),
    );
    let priority = &out.chunks[2];
    assert_eq!(priority.cyclomatic_complexity, 4);
    assert_eq!(priority.modifiers, Vec::<String>::new());
}

#[test]
fn java_calls_inside_anonymous_bodies_are_collected() {
    let unit = SourceUnit::parse(Path::new("OrderService.java"), SERVICE).unwrap();
    let out = build_method_chunks(
        &unit,
        "OrderService.java",
        SnippetOptions::default(),
        &TokenSource::counter(),
    );
    let audit = &out.chunks[3];
    assert_eq!(audit.method_calls, ["log", "count"]);
    assert_eq!(audit.cyclomatic_complexity, 2);
}

#[test]
fn java_grouped_members_carry_class_hierarchy() {
    let unit = SourceUnit::parse(Path::new("OrderService.java"), SERVICE).unwrap();
    let out = group_member_chunks(
        &unit,
        "src/OrderService.java",
        SnippetOptions::default(),
        &TokenSource::counter(),
    );
    assert_eq!(out.chunks.len(), 1);
    let group = &out.chunks[0];
    assert_eq!(group.fully_qualified_name, "com.acme.orders.OrderService");
    assert_eq!(group.package_name, "com.acme.orders");
    assert_eq!(group.source_file, "src/OrderService.java");
    assert_eq!(group.methods.len(), 5);

    let ctor = &group.methods[0];
    assert_eq!(ctor.kind, Kind::Constructor);
    assert_eq!(
        ctor.signature.as_deref(),
        Some("public  OrderService(OrderRepository repository)")
    );
    assert_eq!(
        ctor.parent.as_ref().unwrap().classes,
        ["BaseService", "Auditable"]
    );
    assert_eq!(ctor.imports, ["java.util.List", "java.util.function.Function"]);
    assert_eq!(
        group.methods[1].signature.as_deref(),
        Some(
            "public  synchronized  <T> List<T> findAll(Function<Order, T> mapper, String... tags) throws RepositoryException"
        )
    );
}
