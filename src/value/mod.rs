//! The dynamically shaped value model the resolver walks.
//!
//! Every node in a data tree is a [`Value`]: a scalar, a mapping of
//! [`KeyString`] to values, an ordered sequence, a one-shot [`LazySequence`],
//! or a deferred producer ([`Thunk`] / [`AsyncThunk`]) that is invoked when
//! traversal lands on it. The resolver only ever reads the tree; nothing in
//! this module mutates a value in place.

mod convert;
mod keystring;
mod lazy;
mod thunk;
#[allow(clippy::module_inception)]
mod value;

pub use self::keystring::KeyString;
pub use self::lazy::LazySequence;
pub use self::thunk::{AsyncThunk, Thunk};
pub use self::value::{ObjectMap, Value};

/// A macro to easily generate Values
///
/// ```
/// use treepath::value;
///
/// let tree = value!({ one: [{ id: "1st" }, { id: "2nd" }], count: 2 });
/// ```
#[macro_export]
macro_rules! value {
    ([]) => ({
        $crate::value::Value::Array(vec![])
    });

    ([$($v:tt),+ $(,)?]) => ({
        let vec: Vec<$crate::value::Value> = vec![$($crate::value!($v)),+];
        $crate::value::Value::Array(vec)
    });

    ({}) => ({
        $crate::value::Value::Object(::std::collections::BTreeMap::default())
    });

    ({$($($k1:literal)? $($k2:ident)?: $v:tt),+ $(,)?}) => ({
        let map = vec![$((String::from($($k1)? $(stringify!($k2))?).into(), $crate::value!($v))),+]
            .into_iter()
            .collect::<::std::collections::BTreeMap<_, $crate::value::Value>>();

        $crate::value::Value::Object(map)
    });

    (null) => ({
        $crate::value::Value::Null
    });

    ($k:expr) => ({
        $crate::value::Value::from($k)
    });
}
