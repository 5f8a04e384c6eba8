use rbitmap::RoaringBitmap;

use crate::error::FunctionError;
use crate::value::{Member, SqlValue};

pub(crate) fn exact<'a, const N: usize>(
    function: &str,
    args: &'a [SqlValue],
) -> Result<&'a [SqlValue; N], FunctionError> {
    args.try_into().map_err(|_| FunctionError::Arity {
        function: function.to_owned(),
        expected: N,
        found: args.len(),
    })
}

/// Decodes a blob argument. NULL is the empty bitmap.
pub(crate) fn bitmap<V: Member>(
    function: &str,
    arg: &SqlValue,
) -> Result<RoaringBitmap<V>, FunctionError> {
    match arg {
        SqlValue::Null => Ok(RoaringBitmap::new()),
        SqlValue::Blob(blob) => Ok(RoaringBitmap::try_deserialize(blob)?),
        other => Err(FunctionError::argument(
            function,
            format_args!("expected a bitmap blob, found {}", other.type_name()),
        )),
    }
}

/// Converts an integer argument to a member of width `V`.
pub(crate) fn member<V: Member>(function: &str, arg: &SqlValue) -> Result<V, FunctionError> {
    match *arg {
        SqlValue::Integer(i) => u64::try_from(i)
            .ok()
            .and_then(V::from_u64)
            .ok_or_else(|| {
                FunctionError::argument(
                    function,
                    format_args!("{i} is not a {}-bit unsigned integer", V::BITS),
                )
            }),
        ref other => Err(FunctionError::argument(
            function,
            format_args!("expected an integer, found {}", other.type_name()),
        )),
    }
}

pub(crate) fn cardinality(function: &str, cardinality: u64) -> Result<i64, FunctionError> {
    i64::try_from(cardinality).map_err(|_| {
        FunctionError::argument(
            function,
            format_args!("cardinality {cardinality} does not fit an integer"),
        )
    })
}
