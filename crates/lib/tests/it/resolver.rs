use doclens::{
    ContainerKind, Document, LookupError, ObjId, ObjKind, Path, PathResolver, PathStep, Scalar,
    SchemaStrategy,
};

use crate::helpers::doc;

#[test]
fn empty_path_keyed_resolves_to_root() {
    let doc = doc();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);
    let obj = resolver
        .resolve(&Path::root(), ContainerKind::Keyed)
        .unwrap();
    assert_eq!(obj, ObjId::ROOT);
}

#[test]
fn single_value_resolution_stops_at_the_holding_container() {
    // resolve(["a", "b"], SingleValue) with "a" absent creates a map at "a"
    // and returns that map's id; "b" itself is not resolved.
    let doc = doc();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);

    let path: Path = "a.b".parse().unwrap();
    let obj = resolver
        .resolve(&path, ContainerKind::SingleValue)
        .unwrap();

    let a = doc
        .get(&ObjId::ROOT, &PathStep::Key("a".to_string()))
        .unwrap()
        .expect("'a' must have been created");
    let (a_id, a_kind) = a.as_object().unwrap();
    assert_eq!(a_id, obj);
    assert_eq!(a_kind, ObjKind::Map);
    assert!(
        doc.get(&obj, &PathStep::Key("b".to_string()))
            .unwrap()
            .is_none(),
        "the final step must not be resolved for a single-value container"
    );
}

#[test]
fn appending_too_far_past_the_end_fails() {
    // resolve(["list", 5], Indexed) against an empty list: 5 is too far
    // beyond the length to append.
    let doc = doc();
    doc.put_object(&ObjId::ROOT, &PathStep::Key("list".to_string()), ObjKind::List)
        .unwrap();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);

    let path: Path = "list.[5]".parse().unwrap();
    let err = resolver.resolve(&path, ContainerKind::Indexed).unwrap_err();
    assert!(matches!(
        err,
        LookupError::IndexOutOfBounds {
            index: 5,
            length: 0,
            ..
        }
    ));
}

#[test]
fn resolution_creates_each_missing_level_once() {
    let doc = doc();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);
    let path: Path = "users.[0].devices.[0]".parse().unwrap();

    let first = resolver.resolve(&path, ContainerKind::Keyed).unwrap();
    let second = resolver.resolve(&path, ContainerKind::Keyed).unwrap();
    assert_eq!(first, second, "an existing node must be reused, not remade");
}

#[test]
fn mismatched_final_kind_is_reported_with_the_full_path() {
    let doc = doc();
    doc.put_object(&ObjId::ROOT, &PathStep::Key("cfg".to_string()), ObjKind::Map)
        .unwrap();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);

    let path: Path = "cfg".parse().unwrap();
    match resolver.resolve(&path, ContainerKind::Indexed) {
        Err(LookupError::MismatchedSchema {
            path,
            expected,
            found,
        }) => {
            assert_eq!(path.to_string(), "cfg");
            assert_eq!(expected, "list");
            assert_eq!(found, "map");
        }
        other => panic!("expected MismatchedSchema, got {other:?}"),
    }
}

#[test]
fn scalar_in_the_middle_of_a_path_is_an_error() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("version".to_string()),
        Scalar::Int(3),
    )
    .unwrap();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::CreateWhenNeeded);

    let path: Path = "version.minor".parse().unwrap();
    let err = resolver.resolve(&path, ContainerKind::Keyed).unwrap_err();
    assert!(matches!(err, LookupError::PathExtendsThroughScalar { .. }));
}

#[test]
fn read_only_reports_missing_schema_without_mutating() {
    let doc = doc();
    let resolver = PathResolver::new(doc.as_ref(), SchemaStrategy::ReadOnly);

    let path: Path = "a.b.c".parse().unwrap();
    let err = resolver.resolve(&path, ContainerKind::Keyed).unwrap_err();
    assert!(err.is_schema_missing());
    assert!(doc.keys(&ObjId::ROOT).is_empty());
    assert!(doc.ops().is_empty());
}
