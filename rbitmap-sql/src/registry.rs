use std::collections::BTreeMap;

use log::debug;

use crate::aggregates::{AggregateKind, GroupAggregate, GroupState};
use crate::config::{EmptyGroupResult, FunctionConfig};
use crate::error::FunctionError;
use crate::scalars::{self, BinaryOp};
use crate::value::{Member, Output, SqlValue};

/// A scalar function: the name it is called under and its arguments.
pub type ScalarFn = fn(&str, &[SqlValue]) -> Result<Output, FunctionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    /// The argument count as host registration APIs expect it, `-1` for variadic.
    pub fn n_arg(self) -> i32 {
        match self {
            Arity::Exact(n) => n as i32,
            Arity::Variadic => -1,
        }
    }
}

#[derive(Clone, Copy)]
pub enum FunctionKind {
    Scalar(ScalarFn),
    Aggregate(fn(EmptyGroupResult) -> Box<dyn GroupAggregate>),
}

#[derive(Clone)]
pub struct FunctionDef {
    pub name: String,
    pub arity: Arity,
    pub kind: FunctionKind,
}

impl FunctionDef {
    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, FunctionKind::Aggregate(_))
    }
}

/// Every `rb_*` and `rb64_*` function, bound by name.
///
/// Lookups are case-insensitive. A registry holds nothing but function
/// definitions; all working state belongs to the call or group using it.
pub struct FunctionRegistry {
    functions: BTreeMap<String, FunctionDef>,
    config: FunctionConfig,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::with_config(FunctionConfig::default())
    }

    pub fn with_config(config: FunctionConfig) -> Self {
        let mut registry = FunctionRegistry {
            functions: BTreeMap::new(),
            config,
        };
        registry.register_width::<u32>();
        registry.register_width::<u64>();
        debug!("registered {} bitmap functions", registry.functions.len());
        registry
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_ascii_lowercase())
    }

    /// All definitions, ordered by name.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.functions.values()
    }

    /// Calls a scalar function.
    pub fn call(&self, name: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
        let def = self.lookup(name)?;
        let FunctionKind::Scalar(f) = def.kind else {
            return Err(FunctionError::WrongKind {
                function: def.name.clone(),
                expected: "a scalar function",
            });
        };
        if let Arity::Exact(expected) = def.arity {
            if args.len() != expected {
                return Err(FunctionError::Arity {
                    function: def.name.clone(),
                    expected,
                    found: args.len(),
                });
            }
        }
        f(&def.name, args)
    }

    /// Starts a new group of an aggregate function.
    pub fn aggregate(&self, name: &str) -> Result<Box<dyn GroupAggregate>, FunctionError> {
        let def = self.lookup(name)?;
        match def.kind {
            FunctionKind::Aggregate(init) => Ok(init(self.config.empty_group)),
            FunctionKind::Scalar(_) => Err(FunctionError::WrongKind {
                function: def.name.clone(),
                expected: "an aggregate function",
            }),
        }
    }

    /// Runs an aggregate over one group of rows, in order.
    pub fn fold<'a>(
        &self,
        name: &str,
        rows: impl IntoIterator<Item = &'a SqlValue>,
    ) -> Result<Output, FunctionError> {
        let mut state = self.aggregate(name)?;
        for row in rows {
            state.step(row)?;
        }
        state.finalize()
    }

    fn lookup(&self, name: &str) -> Result<&FunctionDef, FunctionError> {
        self.get(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_owned()))
    }

    fn insert<V: Member>(&mut self, suffix: &str, arity: Arity, kind: FunctionKind) {
        let name = format!("{}_{}", V::PREFIX, suffix);
        self.functions.insert(name.clone(), FunctionDef { name, arity, kind });
    }

    fn register_width<V: Member>(&mut self) {
        let scalar = FunctionKind::Scalar;

        self.insert::<V>("create", Arity::Variadic, scalar(scalars::create::<V>));
        self.insert::<V>("count", Arity::Exact(1), scalar(scalars::count::<V>));
        self.insert::<V>("add", Arity::Exact(2), scalar(scalars::add::<V>));
        self.insert::<V>("remove", Arity::Exact(2), scalar(scalars::remove::<V>));
        self.insert::<V>("array", Arity::Exact(1), scalar(scalars::array::<V>));

        self.insert::<V>(
            "and",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary::<V>(BinaryOp::And, f, a)),
        );
        self.insert::<V>(
            "or",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary::<V>(BinaryOp::Or, f, a)),
        );
        self.insert::<V>(
            "xor",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary::<V>(BinaryOp::Xor, f, a)),
        );
        self.insert::<V>(
            "not",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary::<V>(BinaryOp::Not, f, a)),
        );

        self.insert::<V>(
            "and_count",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary_count::<V>(BinaryOp::And, f, a)),
        );
        self.insert::<V>(
            "or_count",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary_count::<V>(BinaryOp::Or, f, a)),
        );
        self.insert::<V>(
            "xor_count",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary_count::<V>(BinaryOp::Xor, f, a)),
        );
        self.insert::<V>(
            "not_count",
            Arity::Exact(2),
            scalar(|f, a| scalars::binary_count::<V>(BinaryOp::Not, f, a)),
        );

        #[cfg(feature = "multiway")]
        if self.config.multiway {
            self.insert::<V>("and_many", Arity::Variadic, scalar(scalars::and_many::<V>));
            self.insert::<V>("or_many", Arity::Variadic, scalar(scalars::or_many::<V>));
        }

        let aggregate = FunctionKind::Aggregate;
        self.insert::<V>(
            AggregateKind::Create.name(),
            Arity::Exact(1),
            aggregate(|empty| Box::new(GroupState::<V>::new(AggregateKind::Create, empty))),
        );
        self.insert::<V>(
            AggregateKind::And.name(),
            Arity::Exact(1),
            aggregate(|empty| Box::new(GroupState::<V>::new(AggregateKind::And, empty))),
        );
        self.insert::<V>(
            AggregateKind::Or.name(),
            Arity::Exact(1),
            aggregate(|empty| Box::new(GroupState::<V>::new(AggregateKind::Or, empty))),
        );
    }
}
