//! The value model shared with the host engine.

use std::fmt;

use rbitmap::Value;

/// A dynamically typed argument, as the host passes it to a function.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self {
        SqlValue::Blob(value.to_vec())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// The members of a bitmap, handed to the host's row expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberArray {
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl MemberArray {
    pub fn len(&self) -> usize {
        match self {
            MemberArray::U32(members) => members.len(),
            MemberArray::U64(members) => members.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members widened to `u64`, in ascending order.
    pub fn to_u64_vec(&self) -> Vec<u64> {
        match self {
            MemberArray::U32(members) => members.iter().map(|&m| u64::from(m)).collect(),
            MemberArray::U64(members) => members.clone(),
        }
    }
}

/// The result of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Null,
    Integer(i64),
    Blob(Vec<u8>),
    Members(MemberArray),
}

impl Output {
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Output::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Output::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn members(&self) -> Option<&MemberArray> {
        match self {
            Output::Members(members) => Some(members),
            _ => None,
        }
    }

    /// Converts a scalar output back into an argument for another call.
    ///
    /// Returns `None` for [`Output::Members`], which the host expands into
    /// rows instead.
    pub fn into_value(self) -> Option<SqlValue> {
        match self {
            Output::Null => Some(SqlValue::Null),
            Output::Integer(i) => Some(SqlValue::Integer(i)),
            Output::Blob(blob) => Some(SqlValue::Blob(blob)),
            Output::Members(_) => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Null => f.write_str("NULL"),
            Output::Integer(i) => write!(f, "{i}"),
            Output::Blob(blob) => write!(f, "<blob {} bytes>", blob.len()),
            Output::Members(members) => write!(f, "<{} members>", members.len()),
        }
    }
}

/// A member width exposed under its own function prefix.
pub trait Member: Value {
    /// `rb` for 32-bit members, `rb64` for 64-bit members.
    const PREFIX: &'static str;

    fn into_members(members: Vec<Self>) -> MemberArray;
}

impl Member for u32 {
    const PREFIX: &'static str = "rb";

    fn into_members(members: Vec<u32>) -> MemberArray {
        MemberArray::U32(members)
    }
}

impl Member for u64 {
    const PREFIX: &'static str = "rb64";

    fn into_members(members: Vec<u64>) -> MemberArray {
        MemberArray::U64(members)
    }
}
