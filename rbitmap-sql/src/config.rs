/// What an aggregate group with no rows finalizes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyGroupResult {
    /// The encoding of an empty bitmap.
    #[default]
    EmptyBitmap,
    Null,
}

/// Runtime options of a [`FunctionRegistry`](crate::FunctionRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionConfig {
    pub empty_group: EmptyGroupResult,
    /// Register `rb[64]_and_many` and `rb[64]_or_many`. Has no effect
    /// unless the `multiway` feature is enabled.
    pub multiway: bool,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            empty_group: EmptyGroupResult::default(),
            multiway: cfg!(feature = "multiway"),
        }
    }
}
