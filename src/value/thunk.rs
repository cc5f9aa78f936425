use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::Value;

/// A zero-argument deferred value producer.
///
/// When traversal steps into a `Thunk` it is invoked once and the walk
/// continues with whatever it returned. The producer must return an
/// immediately available value; see [`AsyncThunk`] for producers that
/// suspend.
#[derive(Clone)]
pub struct Thunk(Arc<dyn Fn() -> Value + Send + Sync>);

impl Thunk {
    pub fn new(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(producer))
    }

    /// Invoke the producer.
    #[must_use]
    pub fn call(&self) -> Value {
        (self.0)()
    }

    /// Thunks have no structural identity; two are equal when they share the
    /// same producer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Thunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

/// A zero-argument deferred value producer whose result must be awaited.
///
/// Only the suspending resolver invokes these; the blocking resolver carries
/// them through unresolved.
#[derive(Clone)]
pub struct AsyncThunk(Arc<dyn Fn() -> BoxFuture<'static, Value> + Send + Sync>);

impl AsyncThunk {
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(producer())))
    }

    /// Invoke the producer, returning the pending result.
    #[must_use]
    pub fn call(&self) -> BoxFuture<'static, Value> {
        (self.0)()
    }

    /// See [`Thunk::ptr_eq`].
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for AsyncThunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("AsyncThunk(..)")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn call_produces_value() {
        let thunk = Thunk::new(|| Value::from("good"));
        assert_eq!(thunk.call(), Value::from("good"));
        // Invocable repeatedly.
        assert_eq!(thunk.call(), Value::from("good"));
    }

    #[test]
    fn equality_is_identity() {
        let a = Thunk::new(|| Value::Null);
        let b = Thunk::new(|| Value::Null);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[tokio::test]
    async fn async_call_produces_value() {
        let thunk = AsyncThunk::new(|| async { Value::from(42) });
        assert_eq!(thunk.call().await, Value::from(42));
    }
}
