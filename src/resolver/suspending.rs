use std::borrow::Cow;

use futures::future::{try_join_all, BoxFuture};

use crate::path::Segment;
use crate::value::Value;

use super::{step_key, ResolveError, ResolveOptions};

/// Resolve compiled segments against a tree, awaiting deferred values.
///
/// Semantics match [`super::resolve_segments_sync`] exactly, except that
/// every deferred producer ([`crate::Thunk`] or [`crate::AsyncThunk`]) is
/// invoked and its result awaited before traversal continues, and a wildcard
/// fan-out issues the per-element resolutions as independent futures,
/// completing once all of them have (results stay in element order).
pub async fn resolve_segments(
    tree: &Value,
    segments: &[Segment],
    options: &ResolveOptions,
) -> Result<Value, ResolveError> {
    walk(Cow::Borrowed(tree), segments, options)
        .await
        .map(Cow::into_owned)
}

fn walk<'a>(
    mut cursor: Cow<'a, Value>,
    segments: &'a [Segment],
    options: &'a ResolveOptions,
) -> BoxFuture<'a, Result<Cow<'a, Value>, ResolveError>> {
    Box::pin(async move {
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();

            // An absent cursor short-circuits only before the last segment;
            // at the last one the key step below reports the miss itself.
            if cursor.is_null() && !last {
                return Ok(Cow::Owned(options.missing.clone()));
            }

            match segment {
                Segment::Wildcard => {
                    let rest = &segments[i + 1..];

                    // Lazy sequences materialize first, then fan out like
                    // arrays.
                    if let Value::Lazy(sequence) = cursor.as_ref() {
                        let items = sequence.materialize();
                        let collected = try_join_all(items.into_iter().map(|item| async move {
                            walk(Cow::Owned(item), rest, options)
                                .await
                                .map(Cow::into_owned)
                        }))
                        .await?;
                        return Ok(Cow::Owned(Value::Array(collected)));
                    }

                    return match cursor {
                        Cow::Borrowed(Value::Array(items)) => {
                            let collected = try_join_all(items.iter().map(|item| async move {
                                walk(Cow::Borrowed(item), rest, options)
                                    .await
                                    .map(Cow::into_owned)
                            }))
                            .await?;
                            Ok(Cow::Owned(Value::Array(collected)))
                        }
                        Cow::Owned(Value::Array(items)) => {
                            let collected = try_join_all(items.into_iter().map(|item| async move {
                                walk(Cow::Owned(item), rest, options)
                                    .await
                                    .map(Cow::into_owned)
                            }))
                            .await?;
                            Ok(Cow::Owned(Value::Array(collected)))
                        }
                        // A wildcard against anything else is a miss, not an
                        // error.
                        _ => Ok(Cow::Owned(options.missing.clone())),
                    };
                }
                Segment::Key(name) => {
                    cursor = match step_key(cursor, name, options)? {
                        Some(next) => next,
                        None => return Ok(Cow::Owned(options.missing.clone())),
                    };

                    // One unwrap per segment, awaited when the producer
                    // suspends.
                    let produced = match cursor.as_ref() {
                        Value::Thunk(thunk) => Some(thunk.call()),
                        Value::AsyncThunk(thunk) => Some(thunk.call().await),
                        _ => None,
                    };
                    if let Some(value) = produced {
                        cursor = Cow::Owned(value);
                    }
                }
            }
        }

        Ok(cursor)
    })
}
