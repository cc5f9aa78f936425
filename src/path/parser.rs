use tracing::warn;

use super::{is_reserved_key, ForbiddenKeySnafu, OwnedPath, PathParseError, Segment};

const WARN_DOT_BEFORE: &str =
    "must either put '.' (dot) BEFORE '*' or escape that with '\\' (backslash)";
const WARN_DOT_AFTER: &str =
    "must either put '.' (dot) AFTER '*' or escape that with '\\' (backslash)";

const fn is_special(c: char) -> bool {
    matches!(c, '.' | '*' | '\\')
}

/// Parse a raw dotted path into its segment sequence.
///
/// The scan is a single left-to-right pass:
///
/// * an unescaped `.` terminates the current key; dot-terminated keys named
///   after a reserved reflective key fail with
///   [`PathParseError::ForbiddenKey`],
/// * an unescaped `*` emits [`Segment::Wildcard`] without touching the key
///   buffer, warning when the separating dot around it is missing; a `.`
///   directly after the wildcard is consumed as its separator,
/// * `\` escapes `.` `*` `\` into the key; before any other character (or at
///   end of input) it is dropped,
/// * whatever remains in the key buffer at end of input is flushed as a
///   final key. Trailing keys are not checked against the reserved names;
///   only dot-terminated ones are.
pub fn parse_path(path: &str) -> Result<OwnedPath, PathParseError> {
    let mut segments = Vec::new();
    let mut key = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(&next) = chars.peek() {
                    if is_special(next) {
                        key.push(next);
                        chars.next();
                    }
                }
            }
            '.' => {
                if is_reserved_key(&key) {
                    return ForbiddenKeySnafu { key, path }.fail();
                }
                segments.push(Segment::Key(std::mem::take(&mut key).into()));
            }
            '*' => {
                if !key.is_empty() {
                    warn!(message = WARN_DOT_BEFORE, path = %path);
                }
                segments.push(Segment::Wildcard);
                match chars.peek() {
                    // The dot directly after a wildcard is the wildcard's own
                    // separator, never the start of a new key.
                    Some('.') => {
                        chars.next();
                    }
                    Some(_) => warn!(message = WARN_DOT_AFTER, path = %path),
                    None => {}
                }
            }
            _ => key.push(c),
        }
    }

    if !key.is_empty() {
        segments.push(Segment::Key(key.into()));
    }

    Ok(segments.into())
}
