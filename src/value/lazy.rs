use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex};

use super::Value;

type SharedIter = Arc<Mutex<Option<Box<dyn Iterator<Item = Value> + Send>>>>;

/// A one-shot forward sequence.
///
/// Unlike [`Value::Array`], a lazy sequence has no indexed access: key
/// lookups against it miss, and a wildcard materializes it in one pass. Once
/// materialized (or otherwise consumed) it yields nothing further.
#[derive(Clone)]
pub struct LazySequence(SharedIter);

impl LazySequence {
    pub fn new(iter: impl Iterator<Item = Value> + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Some(Box::new(iter)))))
    }

    /// Drain the underlying iterator into an ordered sequence. A second
    /// materialization yields an empty one.
    #[must_use]
    pub fn materialize(&self) -> Vec<Value> {
        let mut slot = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match slot.take() {
            Some(iter) => iter.collect(),
            None => Vec::new(),
        }
    }

    /// See [`super::Thunk::ptr_eq`].
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for LazySequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("LazySequence(..)")
    }
}

impl<I> From<I> for LazySequence
where
    I: Iterator<Item = Value> + Send + 'static,
{
    fn from(iter: I) -> Self {
        Self::new(iter)
    }
}
