use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{parse_path, PathParseError};
use crate::value::KeyString;

/// One compiled unit of a path: either a literal key to look up, or the
/// wildcard marker that applies the remaining path to every element of a
/// sequence.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(KeyString),
    Wildcard,
}

impl Segment {
    pub fn key(name: impl Into<KeyString>) -> Self {
        Self::Key(name.into())
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }

    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }

    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Wildcard => None,
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::key(name)
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::key(name)
    }
}

impl From<KeyString> for Segment {
    fn from(name: KeyString) -> Self {
        Segment::Key(name)
    }
}

/// A pre-parsed path.
///
/// Serializes through its string form: `Display` re-escapes the characters
/// the grammar reserves, so a round-trip through a string yields the same
/// segments.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnedPath {
    pub segments: Vec<Segment>,
}

impl OwnedPath {
    #[must_use]
    pub fn root() -> Self {
        vec![].into()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn single_key(name: &str) -> Self {
        vec![Segment::key(name)].into()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn push_key(&mut self, name: &str) {
        self.segments.push(Segment::key(name));
    }

    #[must_use]
    pub fn with_key_appended(&self, name: &str) -> Self {
        let mut new_path = self.clone();
        new_path.push_key(name);
        new_path
    }
}

impl From<Vec<Segment>> for OwnedPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromStr for OwnedPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl TryFrom<String> for OwnedPath {
    type Error = PathParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OwnedPath> for String {
    fn from(path: OwnedPath) -> Self {
        path.to_string()
    }
}

impl Display for OwnedPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_char('.')?;
            }
            match segment {
                Segment::Wildcard => f.write_char('*')?,
                Segment::Key(key) => {
                    for c in key.chars() {
                        if matches!(c, '.' | '*' | '\\') {
                            f.write_char('\\')?;
                        }
                        f.write_char(c)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Segment {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        if bool::arbitrary(g) {
            Segment::Wildcard
        } else {
            let mut name = String::arbitrary(g);
            // Empty keys and reserved names don't survive a display/parse
            // round-trip; nudge them out of the generated space.
            if name.is_empty() || super::is_reserved_key(&name) {
                name.push('k');
            }
            Segment::key(name)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Segment::Wildcard => Box::new(std::iter::empty()),
            Segment::Key(key) => Box::new(
                key.to_string()
                    .shrink()
                    .filter(|name| !name.is_empty())
                    .map(Segment::key),
            ),
        }
    }
}
