//! This module contains all of the logic for paths.
//!
//! A path names a location inside a dynamically shaped [`crate::Value`] tree,
//! the way a file path names a location inside a directory tree.
//!
//! # Example
//! Below is a sample tree. Different fields can be accessed with paths.
//! ```json
//! {
//!   "one": [
//!       { "id": "1st" },
//!       { "id": "2nd" }
//!    ],
//!    "s.o.m.e": 38
//! }
//! ```
//!
//! | path        | value it points to                     |
//! |-------------|----------------------------------------|
//! | `one`       | `[{ "id": "1st" }, { "id": "2nd" }]`   |
//! | `one.0.id`  | `"1st"`                                |
//! | `one.*.id`  | `["1st", "2nd"]` (wildcard fan-out)    |
//! | `s\.o\.m\.e`| `38` (escaped dots are literal)        |
//!
//! # Syntax
//! `.` separates keys, `*` fans out over every element of a sequence, and
//! `\` escapes any of `. * \` into a literal key character. A backslash in
//! front of anything else is dropped. Empty keys are not rejected; they
//! simply never match anything.
//!
//! [`parse_path`] compiles a raw string into an [`OwnedPath`] of
//! [`Segment`]s. Parsing is deterministic, so compiled paths are memoized in
//! a bounded [`PathCache`]; the [`path!`][crate::path!] macro builds a
//! pre-parsed path when the segments are already known (the macro does not
//! parse).

use snafu::Snafu;

mod cache;
mod owned;
mod parser;

pub use cache::{parse_path_cached, PathCache};
#[cfg(any(test, feature = "test"))]
pub use cache::reset_global_cache;
pub(crate) use cache::global_cache;
pub use owned::{OwnedPath, Segment};
pub use parser::parse_path;

/// Key names that address a value's type/inheritance linkage rather than its
/// own data. Dot-terminated keys with these names are rejected at parse time,
/// regardless of any resolver option.
pub const RESERVED_KEYS: [&str; 2] = ["prototype", "__proto__"];

#[must_use]
pub(crate) fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum PathParseError {
    #[snafu(display("using {key:?} in path {path:?} is not allowed"))]
    ForbiddenKey { key: String, path: String },
}

/// Syntactic sugar for creating a pre-parsed path.
///
/// Example: `path!("one", Segment::Wildcard, "id")` is the pre-parsed path of
/// `one.*.id`.
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        $crate::path::OwnedPath::from(vec![$($crate::path::Segment::from($segment),)*])
    };
}
