use std::{borrow::Cow, fmt, str::from_utf8};

/// A single RESP reply value. Read the [Redis documentation](https://redis.io/docs/reference/protocol-spec/)
/// for details on which type to expect as a response.
///
/// RESP2 and RESP3 frames decode into the same lattice; the three null wire
/// forms all decode to [Value::Null].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
	SimpleString(Cow<'a, str>),
	BlobString(Cow<'a, [u8]>),
	VerbatimString { format: [u8; 3], text: Cow<'a, str> },
	Integer(i64),
	BigNumber(Cow<'a, str>),
	Double(f64),
	Boolean(bool),
	Null,
	Error(ErrorReply<'a>),
	Array(Vec<Value<'a>>),
	Map(Vec<(Value<'a>, Value<'a>)>),
	Set(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
	/// Convenience method to create a [Value::SimpleString].
	pub fn simple_string<T>(str: &'a T) -> Self
	where
		T: AsRef<str> + ?Sized,
	{
		Self::SimpleString(str.as_ref().into())
	}

	/// Convenience method to create a [Value::BlobString].
	pub fn blob_string<T>(bytes: &'a T) -> Self
	where
		T: AsRef<[u8]> + ?Sized,
	{
		Self::BlobString(bytes.as_ref().into())
	}

	/// Convenience method to create a [Value::Error].
	pub fn error(code: &'a str, message: &'a str) -> Self {
		Self::Error(ErrorReply {
			code: code.into(),
			message: message.into(),
		})
	}

	/// The name of this value's kind, as used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::SimpleString(_) => "simple string",
			Self::BlobString(_) => "blob string",
			Self::VerbatimString { .. } => "verbatim string",
			Self::Integer(_) => "integer",
			Self::BigNumber(_) => "big number",
			Self::Double(_) => "double",
			Self::Boolean(_) => "boolean",
			Self::Null => "null",
			Self::Error(_) => "error",
			Self::Array(_) => "array",
			Self::Map(_) => "map",
			Self::Set(_) => "set",
		}
	}

	/// Whether this value is [Value::Null].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// The value's bytes, for the string kinds.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::SimpleString(str) => Some(str.as_bytes()),
			Self::BlobString(bytes) => Some(bytes),
			Self::VerbatimString { text, .. } => Some(text.as_bytes()),
			_ => None,
		}
	}

	/// The value's text, for the string kinds. Blob strings must be UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::SimpleString(str) => Some(str),
			Self::VerbatimString { text, .. } => Some(text),
			Self::BlobString(bytes) => from_utf8(bytes).ok(),
			_ => None,
		}
	}

	/// The value as a signed 64-bit integer.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Integer(int) => Some(*int),
			_ => None,
		}
	}

	/// The value's elements, for an [Value::Array].
	pub fn into_array(self) -> Option<Vec<Value<'a>>> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Convert this value into owned data.
	pub fn into_owned(self) -> Value<'static> {
		match self {
			Self::SimpleString(str) => Value::SimpleString(str.into_owned().into()),
			Self::BlobString(bytes) => Value::BlobString(bytes.into_owned().into()),
			Self::VerbatimString { format, text } => Value::VerbatimString {
				format,
				text: text.into_owned().into(),
			},
			Self::Integer(int) => Value::Integer(int),
			Self::BigNumber(num) => Value::BigNumber(num.into_owned().into()),
			Self::Double(double) => Value::Double(double),
			Self::Boolean(bool) => Value::Boolean(bool),
			Self::Null => Value::Null,
			Self::Error(err) => Value::Error(err.into_owned()),
			Self::Array(items) => Value::Array(items.into_iter().map(Value::into_owned).collect()),
			Self::Map(entries) => Value::Map(
				entries
					.into_iter()
					.map(|(k, v)| (k.into_owned(), v.into_owned()))
					.collect(),
			),
			Self::Set(items) => Value::Set(items.into_iter().map(Value::into_owned).collect()),
		}
	}
}

impl<'a> From<&'a str> for Value<'a> {
	fn from(str: &'a str) -> Self {
		Self::SimpleString(str.into())
	}
}

impl From<String> for Value<'static> {
	fn from(str: String) -> Self {
		Self::SimpleString(str.into())
	}
}

impl<'a> From<&'a [u8]> for Value<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Self::BlobString(bytes.into())
	}
}

impl From<Vec<u8>> for Value<'static> {
	fn from(bytes: Vec<u8>) -> Self {
		Self::BlobString(bytes.into())
	}
}

impl From<i64> for Value<'static> {
	fn from(int: i64) -> Self {
		Self::Integer(int)
	}
}

impl From<bool> for Value<'static> {
	fn from(bool: bool) -> Self {
		Self::Boolean(bool)
	}
}

/// An error indicated by the peer, carried in-band through `parse`.
///
/// `code` is the first space-delimited token of the wire payload; `message`
/// is the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply<'a> {
	pub code: Cow<'a, str>,
	pub message: Cow<'a, str>,
}

impl<'a> ErrorReply<'a> {
	/// Split a wire payload on the first space into code and message.
	pub fn from_payload(payload: &'a str) -> Self {
		match payload.split_once(' ') {
			Some((code, message)) => Self {
				code: code.into(),
				message: message.into(),
			},
			None => Self {
				code: payload.into(),
				message: "".into(),
			},
		}
	}

	/// Convert this reply into an owned reply.
	pub fn into_owned(self) -> ErrorReply<'static> {
		ErrorReply {
			code: self.code.into_owned().into(),
			message: self.message.into_owned().into(),
		}
	}
}

impl fmt::Display for ErrorReply<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.message.is_empty() {
			f.write_str(&self.code)
		} else {
			write!(f, "{} {}", self.code, self.message)
		}
	}
}

/// Macro to simplify making a [Value::Array].
///
/// Changes:
/// ```rust
/// use resp_wire::Value;
///
/// Value::Array(vec![Value::simple_string("foo"), Value::simple_string("bar")]);
/// ```
/// into
/// ```rust
/// use resp_wire::{array, Value};
///
/// array!(Value::simple_string("foo"), Value::simple_string("bar"));
/// ```
#[macro_export]
macro_rules! array {
	($($items:expr),* $(,)?) => {
		$crate::Value::Array(vec![$($items),*])
	};
}
