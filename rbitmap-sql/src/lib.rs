//! `rb_*` and `rb64_*` query functions over serialized [`rbitmap`] blobs.
//!
//! Every function takes its arguments as [`SqlValue`]s, the value model a
//! host engine hands to user-defined functions, and returns an [`Output`].
//! Scalar functions decode their blob arguments, run one bitmap operation and
//! re-encode the result. Aggregates fold one row at a time into a
//! [`GroupState`] and finalize to a blob.
//!
//! ```rust
//! use rbitmap_sql::{registry, SqlValue};
//!
//! fn integers(values: &[i64]) -> Vec<SqlValue> {
//!     values.iter().copied().map(SqlValue::Integer).collect()
//! }
//!
//! let functions = registry();
//! let a = functions.call("rb_create", &integers(&[1, 2, 3, 4])).unwrap();
//! let b = functions.call("rb_create", &integers(&[2, 6, 7, 8])).unwrap();
//!
//! let args = [a.into_value().unwrap(), b.into_value().unwrap()];
//! assert_eq!(functions.call("rb_or_count", &args).unwrap().as_integer(), Some(7));
//!
//! let group = functions
//!     .fold("rb_group_create", &integers(&[1, 4, 4]))
//!     .unwrap();
//! let count = functions.call("rb_count", &[group.into_value().unwrap()]).unwrap();
//! assert_eq!(count.as_integer(), Some(2));
//! ```

use std::sync::OnceLock;

pub mod aggregates;
mod args;
mod config;
mod error;
mod registry;
pub mod scalars;
mod value;

pub use aggregates::{AggregateKind, GroupAggregate, GroupState, NullPolicy, Phase};
pub use config::{EmptyGroupResult, FunctionConfig};
pub use error::FunctionError;
pub use registry::{Arity, FunctionDef, FunctionKind, FunctionRegistry, ScalarFn};
pub use value::{Member, MemberArray, Output, SqlValue};

/// The process-wide registry, built with the default [`FunctionConfig`] on first use.
pub fn registry() -> &'static FunctionRegistry {
    static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(FunctionRegistry::new)
}
