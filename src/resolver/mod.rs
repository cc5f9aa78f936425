//! Walks a [`Value`] tree against a compiled segment sequence.
//!
//! Two calling conventions exist because stepping into a deferred value may
//! itself suspend: [`resolve_segments_sync`] invokes [`crate::Thunk`]
//! producers inline and carries [`crate::AsyncThunk`]s through unresolved,
//! while [`resolve_segments`] awaits every deferred producer it lands on.
//! Wildcard fan-out, escaping, missing handling and the reflective-key
//! guard behave identically in both.
//!
//! Unreachable values are not errors. An absent intermediate, a key lookup
//! against a scalar, a missing key, a wildcard against something that isn't
//! a sequence: each resolves to the configured missing sentinel. The only
//! failure a walk can produce is [`ResolveError::PrototypeAccessDenied`].

use std::borrow::Cow;

use snafu::Snafu;

use crate::path::{global_cache, is_reserved_key, parse_path_cached, PathCache, PathParseError};
use crate::value::Value;

mod blocking;
mod suspending;

pub use blocking::resolve_segments_sync;
pub use suspending::resolve_segments;

/// Configuration for a single resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveOptions {
    /// Returned whenever traversal cannot reach a value.
    pub missing: Value,
    /// Permit stepping through the reserved reflective keys. Off by default;
    /// traversal reaching one then fails rather than misses.
    pub allow_prototype_access: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum ResolveError {
    /// The raw path failed to compile.
    #[snafu(display("{source}"), context(false))]
    Parse { source: PathParseError },
    /// Traversal reached a reflective key with the access guard disabled.
    #[snafu(display(
        "using {key} is not allowed, you can enable it by passing allow_prototype_access"
    ))]
    PrototypeAccessDenied { key: String },
}

/// Resolve a raw path against a tree, awaiting deferred values.
///
/// The path is compiled through the process-wide cache.
pub async fn resolve(
    tree: &Value,
    path: &str,
    options: &ResolveOptions,
) -> Result<Value, ResolveError> {
    let compiled = parse_path_cached(global_cache(), path)?;
    resolve_segments(tree, &compiled.segments, options).await
}

/// Resolve a raw path against a tree without suspending.
///
/// The path is compiled through the process-wide cache.
pub fn resolve_sync(
    tree: &Value,
    path: &str,
    options: &ResolveOptions,
) -> Result<Value, ResolveError> {
    let compiled = parse_path_cached(global_cache(), path)?;
    resolve_segments_sync(tree, &compiled.segments, options)
}

/// A resolver with its options partially applied, owning its own path cache.
///
/// Useful when one configuration is applied to many `(tree, path)` pairs,
/// and when cache lifetime should be tied to a component instead of the
/// process.
#[derive(Debug, Default)]
pub struct Resolver {
    options: ResolveOptions,
    cache: PathCache,
}

impl Resolver {
    #[must_use]
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            cache: PathCache::default(),
        }
    }

    #[must_use]
    pub fn with_cache(options: ResolveOptions, cache: PathCache) -> Self {
        Self { options, cache }
    }

    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// See [`resolve`].
    pub async fn resolve(&self, tree: &Value, path: &str) -> Result<Value, ResolveError> {
        let compiled = parse_path_cached(&self.cache, path)?;
        resolve_segments(tree, &compiled.segments, &self.options).await
    }

    /// See [`resolve_sync`].
    pub fn resolve_sync(&self, tree: &Value, path: &str) -> Result<Value, ResolveError> {
        let compiled = parse_path_cached(&self.cache, path)?;
        resolve_segments_sync(tree, &compiled.segments, &self.options)
    }
}

const PROTOTYPE: &str = "prototype";

/// Values a key segment may step into: mappings and sequences by content,
/// lazy sequences and thunks only through the reflective guard.
const fn key_addressable(value: &Value) -> bool {
    matches!(
        value,
        Value::Object(_)
            | Value::Array(_)
            | Value::Lazy(_)
            | Value::Thunk(_)
            | Value::AsyncThunk(_)
    )
}

/// Arrays answer key lookups through canonical base-10 indexes: `"1"`
/// matches, `"01"` and `"-1"` do not.
fn array_index(name: &str) -> Option<usize> {
    let index: usize = name.parse().ok()?;
    (index.to_string() == name).then_some(index)
}

fn has_key(value: &Value, name: &str) -> bool {
    match value {
        Value::Object(map) => map.contains_key(name),
        Value::Array(items) => array_index(name).is_some_and(|index| index < items.len()),
        _ => false,
    }
}

fn lookup<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(name),
        Value::Array(items) => array_index(name).and_then(|index| items.get(index)),
        _ => None,
    }
}

fn take_lookup(value: Value, name: &str) -> Value {
    match value {
        Value::Object(mut map) => map.remove(name).unwrap_or(Value::Null),
        Value::Array(mut items) => match array_index(name) {
            Some(index) if index < items.len() => items.swap_remove(index),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

/// Advance the cursor into `name`. Membership was already checked; the only
/// miss left is the skipped check for `prototype`, which lands on `Null`.
fn step_into<'a>(cursor: Cow<'a, Value>, name: &str) -> Cow<'a, Value> {
    match cursor {
        Cow::Borrowed(value) => match lookup(value, name) {
            Some(child) => Cow::Borrowed(child),
            None => Cow::Owned(Value::Null),
        },
        Cow::Owned(value) => Cow::Owned(take_lookup(value, name)),
    }
}

/// The shared per-key step: guard checks, then the cursor advance.
///
/// `Ok(None)` is a miss the caller maps to the missing sentinel.
fn step_key<'a>(
    cursor: Cow<'a, Value>,
    name: &str,
    options: &ResolveOptions,
) -> Result<Option<Cow<'a, Value>>, ResolveError> {
    if !key_addressable(cursor.as_ref()) {
        return Ok(None);
    }
    // `prototype` skips the membership check and always reaches the guard.
    if name != PROTOTYPE && !has_key(cursor.as_ref(), name) {
        return Ok(None);
    }
    if is_reserved_key(name) && !options.allow_prototype_access {
        return PrototypeAccessDeniedSnafu { key: name }.fail();
    }
    Ok(Some(step_into(cursor, name)))
}
