//! End-to-end tests over the public facade: raw path strings resolved
//! against trees in both calling conventions.

use treepath::{
    path, resolve, resolve_sync, value, AsyncThunk, KeyString, LazySequence, PathParseError,
    ResolveError, ResolveOptions, Resolver, Segment, Thunk, Value,
};

fn tree_with(key: &str, value: impl Into<Value>) -> Value {
    Value::from_iter([(KeyString::from(key), value.into())])
}

/// Resolve with both variants and check they agree before returning.
fn resolve_both(tree: &Value, path: &str) -> Result<Value, ResolveError> {
    let options = ResolveOptions::default();
    let blocking = resolve_sync(tree, path, &options);
    let suspending = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(resolve(tree, path, &options));
    assert_eq!(blocking, suspending, "variants disagree on {path:?}");
    blocking
}

#[test]
fn top_level_values() {
    let tree = value!({ one: 2 });
    assert_eq!(resolve_both(&tree, "one").unwrap(), value!(2));

    let tree = value!({ one: [1, 2, 3] });
    assert_eq!(resolve_both(&tree, "one").unwrap(), value!([1, 2, 3]));

    let tree = value!({ one: { something: "good" } });
    assert_eq!(
        resolve_both(&tree, "one").unwrap(),
        value!({ something: "good" })
    );
    assert_eq!(resolve_both(&tree, "two").unwrap(), Value::Null);
}

#[test]
fn nested_values() {
    let tree = value!({ one: { data: 2 } });
    assert_eq!(resolve_both(&tree, "one.data").unwrap(), value!(2));
}

#[test]
fn missing_values_resolve_to_the_sentinel() {
    let tree = value!({ one: 2 });
    for path in ["two", "one.something", "two.something", "one.0"] {
        assert_eq!(resolve_both(&tree, path).unwrap(), Value::Null, "{path}");
    }

    let tree = value!({ one: { hello: "world" } });
    assert_eq!(resolve_both(&tree, "one.something").unwrap(), Value::Null);

    let tree = value!({ one: "hello" });
    assert_eq!(resolve_both(&tree, "one.0").unwrap(), Value::Null);

    let tree = tree_with("one", Thunk::new(|| value!(2)));
    assert_eq!(resolve_both(&tree, "one.0").unwrap(), Value::Null);

    let tree = value!({ one: null });
    assert_eq!(resolve_both(&tree, "one.hello.world").unwrap(), Value::Null);

    let tree = value!({ one: { hello: null } });
    assert_eq!(resolve_both(&tree, "one.hello.world").unwrap(), Value::Null);

    let tree = value!({ one: {} });
    assert_eq!(resolve_both(&tree, "one.*").unwrap(), Value::Null);
}

#[test]
fn custom_missing_sentinel() {
    let options = ResolveOptions {
        missing: value!("kMissing"),
        ..Default::default()
    };
    let tree = value!({ one: 2 });
    assert_eq!(
        resolve_sync(&tree, "two", &options).unwrap(),
        value!("kMissing")
    );
}

#[test]
fn array_elements() {
    let tree = value!({ one: ["hello", "world"] });
    assert_eq!(resolve_both(&tree, "one.0").unwrap(), value!("hello"));
    assert_eq!(resolve_both(&tree, "one.1").unwrap(), value!("world"));
    assert_eq!(resolve_both(&tree, "one.*").unwrap(), value!(["hello", "world"]));

    let tree = value!({ one: [{ id: "1st", data: "hello" }, { id: "2nd", data: "world" }] });
    assert_eq!(
        resolve_both(&tree, "one.*").unwrap(),
        value!([{ id: "1st", data: "hello" }, { id: "2nd", data: "world" }])
    );
    assert_eq!(
        resolve_both(&tree, "one.*.id").unwrap(),
        value!(["1st", "2nd"])
    );
}

#[test]
fn thunk_array_elements() {
    let elements = Value::Array(vec![
        Thunk::new(|| value!("hello")).into(),
        Thunk::new(|| value!("world")).into(),
    ]);
    let tree = tree_with("one", elements);
    assert_eq!(resolve_both(&tree, "one.1").unwrap(), value!("world"));
}

#[test]
fn lazy_sequences() {
    let items = || vec![value!("hello"), value!("world")].into_iter();

    // No indexed access into a lazy sequence.
    let tree = tree_with("one", LazySequence::new(items()));
    assert_eq!(resolve_both(&tree, "one.0").unwrap(), Value::Null);

    // A wildcard materializes it, once per sequence.
    let tree = tree_with("one", LazySequence::new(items()));
    assert_eq!(
        resolve_sync(&tree, "one.*", &ResolveOptions::default()).unwrap(),
        value!(["hello", "world"])
    );
    assert_eq!(
        resolve_sync(&tree, "one.*", &ResolveOptions::default()).unwrap(),
        value!([])
    );

    let objects = LazySequence::new(
        vec![
            value!({ id: "1st", data: "hello" }),
            value!({ id: "2nd", data: "world" }),
        ]
        .into_iter(),
    );
    let tree = tree_with("one", objects);
    assert_eq!(
        resolve_sync(&tree, "one.*.id", &ResolveOptions::default()).unwrap(),
        value!(["1st", "2nd"])
    );
}

#[test]
fn escaped_dots_address_literal_keys() {
    let tree = value!({ ".": 34 });
    assert_eq!(resolve_both(&tree, r"\.").unwrap(), value!(34));

    let tree = value!({ ".": { here: 34, ".": 35 } });
    assert_eq!(resolve_both(&tree, r"\..here").unwrap(), value!(34));
    assert_eq!(resolve_both(&tree, r"\..\.").unwrap(), value!(35));

    let tree = value!({ "s.o.m.e": { here: 38 } });
    assert_eq!(
        resolve_both(&tree, r"s\.o\.m\.e").unwrap(),
        value!({ here: 38 })
    );
    assert_eq!(resolve_both(&tree, r"s\.o\.m\.e.here").unwrap(), value!(38));
}

#[test]
fn escaped_wildcards_address_literal_keys() {
    let tree = value!({ "on*e": 34 });
    assert_eq!(resolve_both(&tree, r"on\*e").unwrap(), value!(34));

    // Arrays carry no non-index keys, so a literal `*` key misses.
    let tree = value!({ obj: [1, 2, 3] });
    assert_eq!(resolve_both(&tree, r"obj.\*").unwrap(), Value::Null);
    assert_eq!(resolve_both(&tree, "obj.*").unwrap(), value!([1, 2, 3]));
}

#[test]
fn stray_backslashes_are_ignored() {
    let tree = value!({ one: 34 });
    assert_eq!(resolve_both(&tree, r"one.\").unwrap(), value!(34));
    assert_eq!(resolve_both(&tree, r"on\e").unwrap(), value!(34));
}

#[test]
fn deferred_values_are_invoked() {
    let tree = tree_with("something", Thunk::new(|| value!("good")));
    assert_eq!(resolve_both(&tree, "something").unwrap(), value!("good"));
}

#[test]
fn reserved_path_components_fail_to_parse() {
    let tree = value!({ a: 1 });
    for path in ["prototype.isAdmin", "__proto__.isAdmin"] {
        let error = resolve_both(&tree, path).unwrap_err();
        assert!(
            matches!(
                &error,
                ResolveError::Parse {
                    source: PathParseError::ForbiddenKey { .. }
                }
            ),
            "{path}: {error}"
        );
    }
}

#[test]
fn reflective_access_is_guarded_at_resolve_time() {
    // The parser rejects dotted reflective keys up front, so drive the
    // resolver with pre-built segments, as a caller holding compiled paths
    // would.
    let tree = value!({ "__proto__": { isAdmin: true }, a: 1 });
    let segments = path!("__proto__", "isAdmin").segments;

    assert_eq!(
        treepath::resolve_segments_sync(&tree, &segments, &ResolveOptions::default()),
        Err(ResolveError::PrototypeAccessDenied {
            key: "__proto__".into()
        })
    );

    let options = ResolveOptions {
        allow_prototype_access: true,
        ..Default::default()
    };
    assert_eq!(
        treepath::resolve_segments_sync(&tree, &segments, &options).unwrap(),
        value!(true)
    );
}

#[test]
fn trailing_prototype_reaches_the_resolver_guard() {
    let tree = value!({ a: { prototype: { isAdmin: true } } });

    // Parses (trailing keys are unchecked), then the guard decides.
    assert_eq!(
        resolve_sync(&tree, "a.prototype", &ResolveOptions::default()),
        Err(ResolveError::PrototypeAccessDenied {
            key: "prototype".into()
        })
    );
    let options = ResolveOptions {
        allow_prototype_access: true,
        ..Default::default()
    };
    assert_eq!(
        resolve_sync(&tree, "a.prototype", &options).unwrap(),
        value!({ isAdmin: true })
    );
}

#[tokio::test]
async fn async_thunks_resolve_in_the_suspending_variant() {
    let options = ResolveOptions::default();

    let tree = tree_with("something", AsyncThunk::new(|| async { value!("good") }));
    assert_eq!(
        resolve(&tree, "something", &options).await.unwrap(),
        value!("good")
    );

    let tree = tree_with(
        "something",
        AsyncThunk::new(|| async { value!({ really: "good" }) }),
    );
    assert_eq!(
        resolve(&tree, "something.really", &options).await.unwrap(),
        value!("good")
    );
}

#[tokio::test]
async fn async_thunk_array_elements() {
    let elements = Value::Array(vec![
        AsyncThunk::new(|| async { value!("hello") }).into(),
        AsyncThunk::new(|| async { value!("world") }).into(),
    ]);
    let tree = tree_with("one", elements);
    assert_eq!(
        resolve(&tree, "one.1", &ResolveOptions::default())
            .await
            .unwrap(),
        value!("world")
    );
}

#[tokio::test]
async fn async_thunk_sequences_fan_out() {
    let options = ResolveOptions::default();

    let tree = tree_with(
        "one",
        AsyncThunk::new(|| async { value!([{ id: "1st" }, { id: "2nd" }]) }),
    );
    assert_eq!(
        resolve(&tree, "one.*.id", &options).await.unwrap(),
        value!(["1st", "2nd"])
    );

    let tree = tree_with(
        "one",
        AsyncThunk::new(|| async {
            LazySequence::new(
                vec![value!({ id: "1st" }), value!({ id: "2nd" })].into_iter(),
            )
            .into()
        }),
    );
    assert_eq!(
        resolve(&tree, "one.*.id", &options).await.unwrap(),
        value!(["1st", "2nd"])
    );
}

#[tokio::test]
async fn resolver_factory_curries_options_for_both_variants() {
    let resolver = Resolver::new(ResolveOptions {
        missing: value!("MISSING"),
        allow_prototype_access: false,
    });
    let tree = value!({ one: [{ id: "1st" }, { id: "2nd" }] });

    assert_eq!(
        resolver.resolve(&tree, "one.*.id").await.unwrap(),
        value!(["1st", "2nd"])
    );
    assert_eq!(
        resolver.resolve_sync(&tree, "one.*.id").unwrap(),
        value!(["1st", "2nd"])
    );
    assert_eq!(resolver.resolve_sync(&tree, "two").unwrap(), value!("MISSING"));
    assert_eq!(resolver.resolve(&tree, "two").await.unwrap(), value!("MISSING"));
}

#[test]
fn wildcard_segments_survive_the_parse_even_unspaced() {
    // `on*e` parses (with diagnostics) to a wildcard followed by the
    // buffered key, so against a non-sequence it simply misses.
    let tree = value!({ one: 34 });
    assert_eq!(resolve_both(&tree, "on*e").unwrap(), Value::Null);
    assert_eq!(
        "on*e".parse::<treepath::OwnedPath>().unwrap(),
        path!(Segment::Wildcard, "one")
    );
}
