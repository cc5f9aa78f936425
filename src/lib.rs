#![deny(warnings)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(unused_allocation)]
#![deny(unused_extern_crates)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::module_name_repetitions)]

//! Resolve dotted / wildcard string paths against dynamically shaped data
//! trees.
//!
//! A raw path string such as `one.*.id` is compiled into a sequence of
//! [`Segment`]s, then walked against a [`Value`] tree: mappings, ordered
//! sequences, lazy sequences and deferred (thunk) values. The walk either
//! reaches a value, fans out over a sequence, or falls back to a
//! caller-supplied missing sentinel.
//!
//! ```
//! use treepath::{resolve_sync, value, ResolveOptions};
//!
//! let tree = value!({ one: [{ id: "1st" }, { id: "2nd" }] });
//! let ids = resolve_sync(&tree, "one.*.id", &ResolveOptions::default()).unwrap();
//! assert_eq!(ids, value!(["1st", "2nd"]));
//! ```

pub mod path;
pub mod resolver;
pub mod value;

pub use path::{parse_path, OwnedPath, PathCache, PathParseError, Segment};
#[cfg(any(test, feature = "test"))]
pub use path::reset_global_cache;
pub use resolver::{
    resolve, resolve_segments, resolve_segments_sync, resolve_sync, ResolveError, ResolveOptions,
    Resolver,
};
pub use value::{AsyncThunk, KeyString, LazySequence, ObjectMap, Thunk, Value};
