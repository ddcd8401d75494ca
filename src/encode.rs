use std::io::Write;

use crate::{error::Result, value::Value, Error};

/// The wire form to use when writing [Value::Null].
#[derive(Debug, Clone)]
pub enum NullType {
	/// RESP3 null: `_\r\n`.
	Null,
	/// RESP2 null bulk string: `$-1\r\n`.
	BlobString,
	/// RESP2 null array: `*-1\r\n`.
	Array,
}

impl Default for NullType {
	fn default() -> Self {
		Self::Null
	}
}

#[derive(Debug, Clone, Default)]
pub struct Options {
	/// The wire form to use for null values.
	pub null_type: NullType,
}

/// Encode a command invocation from its argument list.
///
/// The wire form is an array of bulk strings: `*<N>\r\n` followed by each
/// argument as `$<byte-length>\r\n<bytes>\r\n`. Length prefixes count bytes
/// in the transport encoding: UTF-8 for strings, base-10 text for integers.
/// Only string and integer kinds are accepted as arguments.
#[tracing::instrument(level = "trace", err, skip_all)]
pub fn command<W>(args: &[Value<'_>], out: &mut W) -> Result<'static, ()>
where
	W: Write,
{
	write!(out, "*{}\r\n", args.len())?;

	for arg in args {
		match arg {
			Value::SimpleString(str) => write_blob(str.as_bytes(), out)?,
			Value::BlobString(bytes) => write_blob(bytes, out)?,
			Value::Integer(int) => write_blob(int.to_string().as_bytes(), out)?,
			other => return Err(Error::EncodeArgument(other.kind())),
		}
	}

	Ok(())
}

fn write_blob<W>(bytes: &[u8], out: &mut W) -> std::io::Result<()>
where
	W: Write,
{
	write!(out, "${}\r\n", bytes.len())?;
	out.write_all(bytes)?;
	out.write_all(b"\r\n")
}

/// Write `value` in its wire form.
///
/// Strings and errors keep their own frame kinds; aggregates recurse in
/// order. The null wire form follows [Options::null_type].
pub fn write_value<W>(value: &Value<'_>, out: &mut W, options: &Options) -> Result<'static, ()>
where
	W: Write,
{
	match value {
		Value::SimpleString(str) => write!(out, "+{}\r\n", str)?,
		Value::BlobString(bytes) => write_blob(bytes, out)?,
		Value::VerbatimString { format, text } => {
			write!(out, "={}\r\n", text.len() + 4)?;
			out.write_all(format)?;
			out.write_all(b":")?;
			out.write_all(text.as_bytes())?;
			out.write_all(b"\r\n")?;
		}
		Value::Integer(int) => write!(out, ":{}\r\n", int)?,
		Value::BigNumber(num) => write!(out, "({}\r\n", num)?,
		Value::Double(double) => write!(out, ",{}\r\n", double)?,
		Value::Boolean(bool) => write!(out, "#{}\r\n", if *bool { 't' } else { 'f' })?,
		Value::Null => match options.null_type {
			NullType::Null => out.write_all(b"_\r\n")?,
			NullType::BlobString => out.write_all(b"$-1\r\n")?,
			NullType::Array => out.write_all(b"*-1\r\n")?,
		},
		Value::Error(err) => {
			let payload = err.to_string();
			write!(out, "!{}\r\n", payload.len())?;
			out.write_all(payload.as_bytes())?;
			out.write_all(b"\r\n")?;
		}
		Value::Array(items) => {
			write!(out, "*{}\r\n", items.len())?;
			for item in items {
				write_value(item, out, options)?;
			}
		}
		Value::Map(entries) => {
			write!(out, "%{}\r\n", entries.len())?;
			for (key, val) in entries {
				write_value(key, out, options)?;
				write_value(val, out, options)?;
			}
		}
		Value::Set(items) => {
			write!(out, "~{}\r\n", items.len())?;
			for item in items {
				write_value(item, out, options)?;
			}
		}
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use crate::{array, Error, Value};

	use super::{command, write_value, NullType, Options};

	fn encoded(value: &Value<'_>, options: &Options) -> Vec<u8> {
		let mut out = Vec::new();
		write_value(value, &mut out, options).expect("encoded value");
		out
	}

	#[test]
	fn command_wire_form() {
		let mut out = Vec::new();
		command(
			&[
				Value::simple_string("SET"),
				Value::simple_string("string1"),
				Value::simple_string("124235"),
			],
			&mut out,
		)
		.expect("encoded command");

		assert_eq!(
			&b"*3\r\n$3\r\nSET\r\n$7\r\nstring1\r\n$6\r\n124235\r\n"[..],
			out
		);
	}

	#[test]
	fn command_integer_argument() {
		let mut out = Vec::new();
		command(
			&[Value::simple_string("EXPIRE"), Value::Integer(-1)],
			&mut out,
		)
		.expect("encoded command");

		assert_eq!(&b"*2\r\n$6\r\nEXPIRE\r\n$2\r\n-1\r\n"[..], out);
	}

	#[test]
	fn command_byte_length_is_utf8() {
		let mut out = Vec::new();
		command(&[Value::simple_string("héllo")], &mut out).expect("encoded command");

		// Five characters, six bytes.
		assert_eq!(&b"*1\r\n$6\r\nh\xc3\xa9llo\r\n"[..], out);
	}

	#[test]
	fn command_rejects_other_kinds() {
		for arg in [
			Value::Boolean(true),
			Value::Double(1.0),
			Value::Null,
			array![Value::Integer(1)],
			Value::BigNumber("12".into()),
		] {
			let err = command(&[arg], &mut Vec::new()).unwrap_err();
			assert!(matches!(err, Error::EncodeArgument(_)), "accepted {:?}", err);
		}
	}

	#[test]
	fn value_wire_forms() {
		let options = Options::default();

		assert_eq!(b"+OK\r\n".to_vec(), encoded(&Value::simple_string("OK"), &options));
		assert_eq!(
			b"$6\r\nfoobar\r\n".to_vec(),
			encoded(&Value::blob_string("foobar"), &options)
		);
		assert_eq!(b":42\r\n".to_vec(), encoded(&Value::Integer(42), &options));
		assert_eq!(b"#t\r\n".to_vec(), encoded(&Value::Boolean(true), &options));
		assert_eq!(b",inf\r\n".to_vec(), encoded(&Value::Double(f64::INFINITY), &options));
		assert_eq!(
			b"(3492890328409238509324850943850943825024385\r\n".to_vec(),
			encoded(
				&Value::BigNumber("3492890328409238509324850943850943825024385".into()),
				&options
			)
		);
		assert_eq!(
			b"=15\r\ntxt:Some string\r\n".to_vec(),
			encoded(
				&Value::VerbatimString {
					format: *b"txt",
					text: "Some string".into(),
				},
				&options
			)
		);
	}

	#[test]
	fn null_wire_form_follows_options() {
		assert_eq!(b"_\r\n".to_vec(), encoded(&Value::Null, &Options::default()));
		assert_eq!(
			b"$-1\r\n".to_vec(),
			encoded(
				&Value::Null,
				&Options {
					null_type: NullType::BlobString,
				}
			)
		);
		assert_eq!(
			b"*-1\r\n".to_vec(),
			encoded(
				&Value::Null,
				&Options {
					null_type: NullType::Array,
				}
			)
		);
	}

	#[test]
	fn aggregate_wire_forms() {
		let options = Options::default();

		assert_eq!(
			b"*2\r\n:1\r\n:2\r\n".to_vec(),
			encoded(&array![Value::Integer(1), Value::Integer(2)], &options)
		);
		assert_eq!(
			b"%1\r\n+a\r\n:1\r\n".to_vec(),
			encoded(
				&Value::Map(vec![(Value::simple_string("a"), Value::Integer(1))]),
				&options
			)
		);
		assert_eq!(
			b"~1\r\n+x\r\n".to_vec(),
			encoded(&Value::Set(vec![Value::simple_string("x")]), &options)
		);
	}
}
