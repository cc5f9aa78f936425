use std::borrow::Cow;

use crate::path::Segment;
use crate::value::Value;

use super::{step_key, ResolveError, ResolveOptions};

/// Resolve compiled segments against a tree without suspending.
///
/// [`crate::Thunk`] producers are invoked inline. An [`crate::AsyncThunk`]
/// is never invoked here: it stays in the cursor unresolved, so it either
/// comes back as-is (when it is the final value) or misses like any other
/// keyless value.
pub fn resolve_segments_sync(
    tree: &Value,
    segments: &[Segment],
    options: &ResolveOptions,
) -> Result<Value, ResolveError> {
    walk(Cow::Borrowed(tree), segments, options).map(Cow::into_owned)
}

fn walk<'a>(
    mut cursor: Cow<'a, Value>,
    segments: &[Segment],
    options: &ResolveOptions,
) -> Result<Cow<'a, Value>, ResolveError> {
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();

        // An absent cursor short-circuits only before the last segment; at
        // the last one the key step below reports the miss itself.
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
                    let mut collected = Vec::with_capacity(items.len());
                    for item in items {
                        collected.push(walk(Cow::Owned(item), rest, options)?.into_owned());
                    }
                    return Ok(Cow::Owned(Value::Array(collected)));
                }

                return match cursor {
                    Cow::Borrowed(Value::Array(items)) => {
                        let mut collected = Vec::with_capacity(items.len());
                        for item in items {
                            collected.push(walk(Cow::Borrowed(item), rest, options)?.into_owned());
                        }
                        Ok(Cow::Owned(Value::Array(collected)))
                    }
                    Cow::Owned(Value::Array(items)) => {
                        let mut collected = Vec::with_capacity(items.len());
                        for item in items {
                            collected.push(walk(Cow::Owned(item), rest, options)?.into_owned());
                        }
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

                // One unwrap per segment: a thunk child becomes whatever it
                // produces.
                let produced = match cursor.as_ref() {
                    Value::Thunk(thunk) => Some(thunk.call()),
                    _ => None,
                };
                if let Some(value) = produced {
                    cursor = Cow::Owned(value);
                }
            }
        }
    }

    Ok(cursor)
}
