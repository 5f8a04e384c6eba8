//! Aggregate functions: one running bitmap per group.
//!
//! A [`GroupState`] is created when a group starts, folds each row in with
//! [`GroupState::step`] and is consumed by [`GroupState::finalize`]. Dropping
//! a state without finalizing it discards the partial bitmap.

use log::warn;
use rbitmap::RoaringBitmap;

use crate::args;
use crate::config::EmptyGroupResult;
use crate::error::FunctionError;
use crate::value::{Member, Output, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    /// `group_create(value)`: one integer per row.
    Create,
    /// `group_and(blob)`
    And,
    /// `group_or(blob)`
    Or,
}

/// How an aggregate treats a NULL row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// The row must carry a value; NULL is an argument error.
    Reject,
    /// NULL fails the whole group.
    Fail,
    /// NULL contributes nothing.
    Skip,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 3] =
        [AggregateKind::Create, AggregateKind::And, AggregateKind::Or];

    pub fn name(self) -> &'static str {
        match self {
            AggregateKind::Create => "group_create",
            AggregateKind::And => "group_and",
            AggregateKind::Or => "group_or",
        }
    }

    pub fn null_policy(self) -> NullPolicy {
        match self {
            AggregateKind::Create => NullPolicy::Reject,
            AggregateKind::And => NullPolicy::Fail,
            AggregateKind::Or => NullPolicy::Skip,
        }
    }
}

/// Where a group is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No row seen yet.
    Empty,
    Accumulating,
    /// A row failed; the group will finalize to that error.
    Failed,
}

/// The running state of one aggregate group.
#[derive(Debug, Clone)]
pub struct GroupState<V: Member> {
    kind: AggregateKind,
    function: String,
    empty_group: EmptyGroupResult,
    rb: Option<RoaringBitmap<V>>,
    error: Option<FunctionError>,
}

impl<V: Member> GroupState<V> {
    pub fn new(kind: AggregateKind, empty_group: EmptyGroupResult) -> Self {
        GroupState {
            kind,
            function: format!("{}_{}", V::PREFIX, kind.name()),
            empty_group,
            rb: None,
            error: None,
        }
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        match (&self.error, &self.rb) {
            (Some(_), _) => Phase::Failed,
            (None, None) => Phase::Empty,
            (None, Some(_)) => Phase::Accumulating,
        }
    }

    /// Folds one row into the group.
    ///
    /// The first failure is recorded and returned; once failed, later rows
    /// are ignored and [`finalize`](Self::finalize) reports that failure.
    pub fn step(&mut self, row: &SqlValue) -> Result<(), FunctionError> {
        if self.error.is_some() {
            return Ok(());
        }
        let result = self.accumulate(row);
        if let Err(e) = &result {
            warn!("{}: discarding group state: {}", self.function, e);
            self.rb = None;
            self.error = Some(e.clone());
        }
        result
    }

    fn accumulate(&mut self, row: &SqlValue) -> Result<(), FunctionError> {
        if row.is_null() {
            match self.kind.null_policy() {
                NullPolicy::Skip => {
                    self.rb.get_or_insert_with(RoaringBitmap::new);
                    return Ok(());
                }
                NullPolicy::Fail => {
                    return Err(FunctionError::NullOperand {
                        function: self.function.clone(),
                    })
                }
                NullPolicy::Reject => {}
            }
        }

        match self.kind {
            AggregateKind::Create => {
                let value = args::member::<V>(&self.function, row)?;
                self.rb.get_or_insert_with(RoaringBitmap::new).add(value);
            }
            AggregateKind::Or => {
                let other = args::bitmap::<V>(&self.function, row)?;
                match &mut self.rb {
                    Some(rb) => rb.or_inplace(&other),
                    None => self.rb = Some(other),
                }
            }
            AggregateKind::And => {
                let other = args::bitmap::<V>(&self.function, row)?;
                match &mut self.rb {
                    Some(rb) => rb.and_inplace(&other),
                    None => self.rb = Some(other),
                }
            }
        }
        Ok(())
    }

    /// Combines the partial state of another slice of the same group.
    pub fn merge(&mut self, other: GroupState<V>) {
        if self.error.is_some() {
            return;
        }
        if let Some(e) = other.error {
            self.rb = None;
            self.error = Some(e);
            return;
        }
        let Some(other) = other.rb else {
            return;
        };
        match &mut self.rb {
            Some(rb) if self.kind == AggregateKind::And => rb.and_inplace(&other),
            Some(rb) => rb.or_inplace(&other),
            None => self.rb = Some(other),
        }
    }

    /// Encodes the group result, or reports the failure that ended it.
    pub fn finalize(self) -> Result<Output, FunctionError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        match (self.rb, self.empty_group) {
            (Some(rb), _) => Ok(Output::Blob(rb.serialize())),
            (None, EmptyGroupResult::EmptyBitmap) => {
                Ok(Output::Blob(RoaringBitmap::<V>::new().serialize()))
            }
            (None, EmptyGroupResult::Null) => Ok(Output::Null),
        }
    }
}

/// A group state with its width erased, as the registry hands it out.
pub trait GroupAggregate: Send {
    fn step(&mut self, row: &SqlValue) -> Result<(), FunctionError>;

    fn phase(&self) -> Phase;

    fn finalize(self: Box<Self>) -> Result<Output, FunctionError>;
}

impl<V: Member> GroupAggregate for GroupState<V> {
    fn step(&mut self, row: &SqlValue) -> Result<(), FunctionError> {
        GroupState::step(self, row)
    }

    fn phase(&self) -> Phase {
        GroupState::phase(self)
    }

    fn finalize(self: Box<Self>) -> Result<Output, FunctionError> {
        GroupState::finalize(*self)
    }
}
