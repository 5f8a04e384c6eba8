//! Scalar functions, generic over the member width.
//!
//! Each function has the signature of a [`ScalarFn`](crate::ScalarFn) once
//! its width is fixed: the name it was called under (for error messages) and
//! the raw arguments.

use rbitmap::RoaringBitmap;

use crate::args;
use crate::error::FunctionError;
use crate::value::{Member, Output, SqlValue};

/// The two-operand set operations, under their query names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    /// Members of the left operand absent from the right.
    Not,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [BinaryOp::And, BinaryOp::Or, BinaryOp::Xor, BinaryOp::Not];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Not => "not",
        }
    }

    fn apply<V: Member>(self, mut lhs: RoaringBitmap<V>, rhs: &RoaringBitmap<V>) -> RoaringBitmap<V> {
        match self {
            BinaryOp::And => lhs.and_inplace(rhs),
            BinaryOp::Or => lhs.or_inplace(rhs),
            BinaryOp::Xor => lhs.xor_inplace(rhs),
            BinaryOp::Not => lhs.andnot_inplace(rhs),
        }
        lhs
    }

    fn cardinality<V: Member>(self, lhs: &RoaringBitmap<V>, rhs: &RoaringBitmap<V>) -> u64 {
        match self {
            BinaryOp::And => lhs.and_cardinality(rhs),
            BinaryOp::Or => lhs.or_cardinality(rhs),
            BinaryOp::Xor => lhs.xor_cardinality(rhs),
            BinaryOp::Not => lhs.andnot_cardinality(rhs),
        }
    }
}

fn blob<V: Member>(bitmap: &RoaringBitmap<V>) -> Output {
    Output::Blob(bitmap.serialize())
}

/// `create(v1, v2, ...)`: a bitmap of the distinct integer arguments.
pub fn create<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let members = args
        .iter()
        .map(|arg| args::member::<V>(function, arg))
        .collect::<Result<Vec<V>, _>>()?;
    Ok(blob(&RoaringBitmap::of(&members)))
}

/// `count(blob)`
pub fn count<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let [arg] = args::exact::<1>(function, args)?;
    let bitmap = args::bitmap::<V>(function, arg)?;
    Ok(Output::Integer(args::cardinality(function, bitmap.cardinality())?))
}

/// `add(blob, value)`
pub fn add<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let [arg, value] = args::exact::<2>(function, args)?;
    let mut bitmap = args::bitmap::<V>(function, arg)?;
    bitmap.add(args::member::<V>(function, value)?);
    Ok(blob(&bitmap))
}

/// `remove(blob, value)`
pub fn remove<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let [arg, value] = args::exact::<2>(function, args)?;
    let mut bitmap = args::bitmap::<V>(function, arg)?;
    bitmap.remove(args::member::<V>(function, value)?);
    Ok(blob(&bitmap))
}

/// `and/or/xor/not(a, b)`
pub fn binary<V: Member>(
    op: BinaryOp,
    function: &str,
    args: &[SqlValue],
) -> Result<Output, FunctionError> {
    let [lhs, rhs] = args::exact::<2>(function, args)?;
    let lhs = args::bitmap::<V>(function, lhs)?;
    let rhs = args::bitmap::<V>(function, rhs)?;
    Ok(blob(&op.apply(lhs, &rhs)))
}

/// `and_count/or_count/xor_count/not_count(a, b)`: the cardinality of
/// [`binary`] without building the result.
pub fn binary_count<V: Member>(
    op: BinaryOp,
    function: &str,
    args: &[SqlValue],
) -> Result<Output, FunctionError> {
    let [lhs, rhs] = args::exact::<2>(function, args)?;
    let lhs = args::bitmap::<V>(function, lhs)?;
    let rhs = args::bitmap::<V>(function, rhs)?;
    Ok(Output::Integer(args::cardinality(
        function,
        op.cardinality(&lhs, &rhs),
    )?))
}

/// `array(blob)`: the members in ascending order.
pub fn array<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let [arg] = args::exact::<1>(function, args)?;
    let bitmap = args::bitmap::<V>(function, arg)?;
    Ok(Output::Members(V::into_members(bitmap.to_vec())))
}

/// Decodes every non-NULL argument.
fn present<V: Member>(
    function: &str,
    args: &[SqlValue],
) -> Result<Vec<RoaringBitmap<V>>, FunctionError> {
    args.iter()
        .filter(|arg| !arg.is_null())
        .map(|arg| args::bitmap::<V>(function, arg))
        .collect()
}

/// `and_many(b1, ..., bn)`. NULL arguments are skipped; with none left the
/// result is empty.
pub fn and_many<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let bitmaps = present::<V>(function, args)?;
    let refs: Vec<&RoaringBitmap<V>> = bitmaps.iter().collect();
    Ok(blob(&RoaringBitmap::fast_and(&refs)))
}

/// `or_many(b1, ..., bn)`. NULL arguments are skipped.
pub fn or_many<V: Member>(function: &str, args: &[SqlValue]) -> Result<Output, FunctionError> {
    let bitmaps = present::<V>(function, args)?;
    let refs: Vec<&RoaringBitmap<V>> = bitmaps.iter().collect();
    Ok(blob(&RoaringBitmap::fast_or(&refs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<SqlValue> {
        values.iter().copied().map(SqlValue::Integer).collect()
    }

    fn bitmap(values: &[u32]) -> SqlValue {
        SqlValue::Blob(RoaringBitmap::<u32>::of(values).serialize())
    }

    #[test]
    fn binary_ops() {
        let args = [bitmap(&[1, 2, 3, 4]), bitmap(&[2, 6, 7, 8])];
        let expected: [(BinaryOp, &[u32]); 4] = [
            (BinaryOp::And, &[2]),
            (BinaryOp::Or, &[1, 2, 3, 4, 6, 7, 8]),
            (BinaryOp::Xor, &[1, 3, 4, 6, 7, 8]),
            (BinaryOp::Not, &[1, 3, 4]),
        ];
        for (op, members) in expected {
            let out = binary::<u32>(op, op.name(), &args).unwrap();
            let decoded = RoaringBitmap::<u32>::try_deserialize(out.as_blob().unwrap()).unwrap();
            assert_eq!(decoded.to_vec(), members, "{}", op.name());

            let count = binary_count::<u32>(op, op.name(), &args).unwrap();
            assert_eq!(count.as_integer(), Some(members.len() as i64));
        }
    }

    #[test]
    fn null_operands_are_empty() {
        let args = [bitmap(&[1, 2]), SqlValue::Null];
        assert_eq!(
            binary_count::<u32>(BinaryOp::Or, "or_count", &args).unwrap(),
            Output::Integer(2)
        );
        assert_eq!(
            binary_count::<u32>(BinaryOp::And, "and_count", &args).unwrap(),
            Output::Integer(0)
        );
        assert_eq!(
            count::<u32>("count", &[SqlValue::Null]).unwrap(),
            Output::Integer(0)
        );
    }

    #[test]
    fn create_dedups() {
        let out = create::<u32>("create", &ints(&[7, 1, 7, 3])).unwrap();
        let out = array::<u32>("array", &[out.into_value().unwrap()]).unwrap();
        assert_eq!(out.members().unwrap().to_u64_vec(), [1, 3, 7]);

        let empty = create::<u64>("create", &[]).unwrap();
        assert_eq!(
            count::<u64>("count", &[empty.into_value().unwrap()]).unwrap(),
            Output::Integer(0)
        );
    }

    #[test]
    fn many_skips_nulls() {
        let args = [
            bitmap(&[1, 2, 3]),
            SqlValue::Null,
            bitmap(&[2, 3, 4]),
            bitmap(&[3, 5]),
        ];
        let and = and_many::<u32>("and_many", &args).unwrap();
        let and = array::<u32>("array", &[and.into_value().unwrap()]).unwrap();
        assert_eq!(and.members().unwrap().to_u64_vec(), [3]);

        let or = or_many::<u32>("or_many", &args).unwrap();
        let or = count::<u32>("count", &[or.into_value().unwrap()]).unwrap();
        assert_eq!(or, Output::Integer(5));

        let nulls = and_many::<u32>("and_many", &[SqlValue::Null, SqlValue::Null]).unwrap();
        assert_eq!(nulls, blob(&RoaringBitmap::<u32>::new()));

        assert!(matches!(
            or_many::<u32>("or_many", &[bitmap(&[1]), SqlValue::Blob(vec![1, 2, 3])]),
            Err(FunctionError::Format(_))
        ));
    }
}
