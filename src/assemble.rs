use nom::IResult;

use crate::{
	frame::{frame, Frame},
	value::{ErrorReply, Value},
	Error,
};

// Pre-allocation cap for wire-supplied counts.
const CHILD_CAPACITY: usize = 64;

/// Assemble the next complete value from the buffer.
///
/// Pulls frames from the [scanner](crate::frame) one at a time; leaf frames
/// map directly onto their [Value], aggregate headers recurse for their
/// declared child count. A missing child propagates as
/// [Incomplete](nom::Err::Incomplete) without consuming anything, so the
/// caller can retry once more bytes arrive.
pub fn value(input: &[u8]) -> IResult<&[u8], Value<'_>> {
	let (mut rest, frame) = frame(input)?;

	let value = match frame {
		Frame::Simple(str) => Value::SimpleString(str.into()),
		Frame::Error(payload) => Value::Error(ErrorReply::from_payload(payload)),
		Frame::Integer(int) => Value::Integer(int),
		Frame::BigNumber(num) => Value::BigNumber(num.into()),
		Frame::Double(double) => Value::Double(double),
		Frame::Boolean(bool) => Value::Boolean(bool),
		Frame::Null | Frame::NullBlob | Frame::NullAggregate => Value::Null,
		Frame::Blob(bytes) => Value::BlobString(bytes.into()),
		Frame::BlobError(payload) => Value::Error(ErrorReply::from_payload(payload)),
		Frame::Verbatim { format, text } => Value::VerbatimString {
			format,
			text: text.into(),
		},
		Frame::ArrayHeader(len) => {
			let mut items = Vec::with_capacity(len.min(CHILD_CAPACITY));
			for _ in 0..len {
				let (next, item) = value(rest)?;
				items.push(item);
				rest = next;
			}

			Value::Array(items)
		}
		Frame::MapHeader(len) => {
			let mut entries = Vec::with_capacity(len.min(CHILD_CAPACITY));
			for _ in 0..len {
				let (next, key) = value(rest)?;
				let (next, val) = value(next)?;
				entries.push((key, val));
				rest = next;
			}

			Value::Map(entries)
		}
		Frame::SetHeader(len) => {
			let mut items = Vec::with_capacity(len.min(CHILD_CAPACITY));
			for _ in 0..len {
				let (next, item) = value(rest)?;
				rest = next;

				// Wire duplicates collapse; the first occurrence wins.
				if !items.contains(&item) {
					items.push(item);
				}
			}

			Value::Set(items)
		}
	};

	Ok((rest, value))
}

/// Assemble every complete top-level value in the buffer.
///
/// Returns the values in wire order together with the unconsumed tail: the
/// span of a trailing incomplete value, or an empty slice. Malformed input is
/// an [Error::Protocol].
pub fn values(mut input: &[u8]) -> Result<(Vec<Value<'_>>, &[u8]), Error<'_>> {
	let mut out = Vec::new();

	while !input.is_empty() {
		match value(input) {
			Ok((rest, value)) => {
				out.push(value);
				input = rest;
			}
			Err(nom::Err::Incomplete(_)) => break,
			Err(err) => return Err(err.into()),
		}
	}

	Ok((out, input))
}

#[cfg(test)]
mod test {
	use crate::{array, Value};

	use super::{value, values};

	#[test]
	fn assemble_leaf() {
		let (rem, res) = value(b"+OK\r\n").expect("assembled value");

		assert_eq!(0, rem.len());
		assert_eq!(Value::simple_string("OK"), res);
	}

	#[test]
	fn assemble_array() {
		let (rem, res) = value(b"*3\r\n:1\r\n:2\r\n:3\r\n").expect("assembled value");

		assert_eq!(0, rem.len());
		assert_eq!(
			array![Value::Integer(1), Value::Integer(2), Value::Integer(3)],
			res
		);
	}

	#[test]
	fn assemble_nested_array() {
		let (rem, res) = value(b"*2\r\n*1\r\n+a\r\n#t\r\n").expect("assembled value");

		assert_eq!(0, rem.len());
		assert_eq!(
			array![array![Value::simple_string("a")], Value::Boolean(true)],
			res
		);
	}

	#[test]
	fn assemble_empty_array() {
		let (rem, res) = value(b"*0\r\n").expect("assembled value");

		assert_eq!(0, rem.len());
		assert_eq!(Value::Array(vec![]), res);
	}

	#[test]
	fn assemble_map_preserves_order_and_duplicates() {
		let (_, res) =
			value(b"%3\r\n+a\r\n:1\r\n+b\r\n:2\r\n+a\r\n:3\r\n").expect("assembled value");

		assert_eq!(
			Value::Map(vec![
				(Value::simple_string("a"), Value::Integer(1)),
				(Value::simple_string("b"), Value::Integer(2)),
				(Value::simple_string("a"), Value::Integer(3)),
			]),
			res
		);
	}

	#[test]
	fn assemble_set_deduplicates() {
		let (_, res) = value(b"~3\r\n+orange\r\n+orange\r\n+apple\r\n").expect("assembled value");

		assert_eq!(
			Value::Set(vec![
				Value::simple_string("orange"),
				Value::simple_string("apple"),
			]),
			res
		);
	}

	#[test]
	fn assemble_null_forms() {
		for wire in [&b"_\r\n"[..], b"$-1\r\n", b"*-1\r\n"] {
			let (_, res) = value(wire).expect("assembled value");
			assert_eq!(Value::Null, res, "wire {:?}", wire);
		}
	}

	#[test]
	fn underrun_is_incomplete() {
		// A complete header whose children have not all arrived.
		assert!(matches!(
			value(b"*3\r\n:1\r\n:2\r\n"),
			Err(nom::Err::Incomplete(_))
		));
		assert!(matches!(
			value(b"%1\r\n+key\r\n"),
			Err(nom::Err::Incomplete(_))
		));
	}

	#[test]
	fn values_returns_tail() {
		let (out, rest) = values(b":1\r\n:2\r\n$6\r\nfoo").expect("assembled values");

		assert_eq!(vec![Value::Integer(1), Value::Integer(2)], out);
		assert_eq!(b"$6\r\nfoo", rest);
	}

	#[test]
	fn values_keeps_partial_aggregate_intact() {
		let (out, rest) = values(b"+ok\r\n*2\r\n:1\r\n").expect("assembled values");

		assert_eq!(vec![Value::simple_string("ok")], out);
		assert_eq!(b"*2\r\n:1\r\n", rest);
	}

	#[test]
	fn values_rejects_garbage() {
		assert!(values(b":1\r\ngarbage\r\n").is_err());
	}
}
