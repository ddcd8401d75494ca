use bytes::{Buf, BufMut, BytesMut};
use nom::Needed;
use tokio_util::codec::{Decoder, Encoder};

use crate::{
	assemble,
	encode::{self, Options},
	error::Result,
	value::Value,
	Error,
};

/// Streaming RESP codec.
///
/// Owns the receive buffer: [write](Self::write) appends transport bytes,
/// [parse](Self::parse) drains every complete reply. Bytes belonging to a
/// trailing incomplete reply stay buffered until later writes complete it,
/// so fragment boundaries never matter.
///
/// Also implements [`Decoder`] and [`Encoder`] so it can drive a
/// [Framed](tokio_util::codec::Framed) transport directly; in that mode the
/// framing buffer is the transport's and the internal one goes unused.
///
/// Not thread-safe: a connection owns exactly one codec and serialises
/// access to it.
#[derive(Debug, Default)]
pub struct Codec {
	buf: BytesMut,
}

impl Codec {
	/// Create a codec with an empty receive buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append transport bytes to the receive buffer. Never fails.
	pub fn write(&mut self, chunk: &[u8]) {
		self.buf.extend_from_slice(chunk);
	}

	/// Parse every complete top-level reply buffered so far, in wire order.
	///
	/// Consumed bytes are released; the span of a trailing incomplete reply
	/// is retained for the next `write`/`parse` cycle. Incompleteness is not
	/// an error: an empty list just means nothing has completed yet.
	/// [Error::Protocol] is fatal: the stream can no longer be framed.
	#[tracing::instrument(level = "trace", err, skip_all)]
	pub fn parse(&mut self) -> Result<'static, Vec<Value<'static>>> {
		let start_len = self.buf.len();

		let (values, end_len) = match assemble::values(&self.buf) {
			Ok((values, rest)) => (
				values
					.into_iter()
					.map(Value::into_owned)
					.collect::<Vec<_>>(),
				rest.len(),
			),
			Err(err) => return Err(err.into_owned()),
		};

		self.buf.advance(start_len - end_len);
		Ok(values)
	}

	/// Encode a command invocation from its argument list.
	///
	/// See [encode::command] for the wire form and the accepted argument
	/// kinds.
	pub fn encode(&self, args: &[Value<'_>]) -> Result<'static, Vec<u8>> {
		let mut out = Vec::new();
		encode::command(args, &mut out)?;
		Ok(out)
	}
}

impl Decoder for Codec {
	type Item = Value<'static>;

	type Error = Error<'static>;

	fn decode(&mut self, src: &mut BytesMut) -> Result<'static, Option<Self::Item>> {
		let start_len = src.len();
		if start_len == 0 {
			return Ok(None);
		}

		match assemble::value(src) {
			Ok((rem, value)) => {
				let owned = value.into_owned();

				let end_len = rem.len();
				src.advance(start_len - end_len);

				Ok(Some(owned))
			}
			Err(nom::Err::Incomplete(needed)) => {
				if let Needed::Size(size) = needed {
					src.reserve(size.into());
				}

				Ok(None)
			}
			Err(err) => Err(Error::from(err).into_owned()),
		}
	}
}

impl<'a> Encoder<Value<'a>> for Codec {
	type Error = Error<'static>;

	fn encode(&mut self, item: Value<'a>, dst: &mut BytesMut) -> Result<'static, ()> {
		encode::write_value(&item, &mut dst.writer(), &Options::default())
	}
}

#[cfg(test)]
mod test {
	use bytes::BytesMut;
	use tokio_util::codec::Decoder;

	use crate::{array, Error, Value};

	use super::Codec;

	#[test]
	fn write_then_parse() {
		let mut codec = Codec::new();
		codec.write(b"+PONG\r\n");

		assert_eq!(
			vec![Value::simple_string("PONG")],
			codec.parse().expect("parsed")
		);
		assert!(codec.parse().expect("parsed").is_empty());
	}

	#[test]
	fn parse_retains_incomplete_tail() {
		let mut codec = Codec::new();
		codec.write(b"$6\r\nfoo");

		assert!(codec.parse().expect("parsed").is_empty());

		codec.write(b"bar\r\n");
		assert_eq!(
			vec![Value::blob_string("foobar")],
			codec.parse().expect("parsed")
		);
	}

	#[test]
	fn parse_retains_partial_aggregate() {
		let mut codec = Codec::new();
		codec.write(b"*2\r\n:1\r\n");

		assert!(codec.parse().expect("parsed").is_empty());

		codec.write(b":2\r\n");
		assert_eq!(
			vec![array![Value::Integer(1), Value::Integer(2)]],
			codec.parse().expect("parsed")
		);
	}

	#[test]
	fn parse_is_fatal_on_garbage() {
		let mut codec = Codec::new();
		codec.write(b"garbage\r\n");

		assert!(matches!(codec.parse(), Err(Error::Protocol(_))));
	}

	#[test]
	fn encode_then_parse_round_trip() {
		let mut codec = Codec::new();
		let wire = codec
			.encode(&[Value::simple_string("SET"), Value::Integer(7)])
			.expect("encoded");

		codec.write(&wire);
		assert_eq!(
			vec![array![Value::blob_string("SET"), Value::blob_string("7")]],
			codec.parse().expect("parsed")
		);
	}

	#[test]
	fn decoder_yields_one_value_per_call() {
		let mut codec = Codec::new();
		let mut src = BytesMut::from(&b":1\r\n:2\r\n"[..]);

		assert_eq!(Some(Value::Integer(1)), codec.decode(&mut src).expect("decoded"));
		assert_eq!(Some(Value::Integer(2)), codec.decode(&mut src).expect("decoded"));
		assert_eq!(None, codec.decode(&mut src).expect("decoded"));
	}

	#[test]
	fn decoder_waits_for_missing_bytes() {
		let mut codec = Codec::new();
		let mut src = BytesMut::from(&b"$6\r\nfoo"[..]);

		assert_eq!(None, codec.decode(&mut src).expect("decoded"));

		src.extend_from_slice(b"bar\r\n");
		assert_eq!(
			Some(Value::blob_string("foobar").into_owned()),
			codec.decode(&mut src).expect("decoded")
		);
	}
}
