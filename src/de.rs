use serde::{
	de::{
		self,
		value::{MapDeserializer, SeqDeserializer},
		DeserializeOwned,
	},
	forward_to_deserialize_any,
};

use crate::{error::Result, value::Value, Error};

/// Deserialize `T` from an assembled [Value].
///
/// Error replies abort with [Error::Redis]: a typed read has no slot for an
/// in-band error, so it escalates here rather than in `parse`.
pub fn from_value<'de, T>(value: &'de Value<'de>) -> Result<'de, T>
where
	T: DeserializeOwned,
{
	T::deserialize(value)
}

fn visit_items<'de, V>(
	items: impl Iterator<Item = &'de Value<'de>>,
	visitor: V,
) -> Result<'de, V::Value>
where
	V: de::Visitor<'de>,
{
	let mut deserializer = SeqDeserializer::new(items);
	let seq = visitor.visit_seq(&mut deserializer)?;
	deserializer.end()?;
	Ok(seq)
}

fn visit_entries<'de, V>(
	entries: impl Iterator<Item = (&'de Value<'de>, &'de Value<'de>)>,
	visitor: V,
) -> Result<'de, V::Value>
where
	V: de::Visitor<'de>,
{
	let mut deserializer = MapDeserializer::new(entries);
	let map = visitor.visit_map(&mut deserializer)?;
	deserializer.end()?;
	Ok(map)
}

impl<'de, 'a: 'de> de::Deserializer<'de> for &'a Value<'de> {
	type Error = Error<'de>;

	fn deserialize_any<V>(self, visitor: V) -> Result<'de, V::Value>
	where
		V: de::Visitor<'de>,
	{
		match self {
			Value::SimpleString(ref str) => visitor.visit_borrowed_str(str),
			Value::BlobString(ref bytes) => visitor.visit_borrowed_bytes(bytes),
			Value::VerbatimString { ref text, .. } => visitor.visit_borrowed_str(text),
			Value::Integer(int) => visitor.visit_i64(*int),
			Value::BigNumber(ref num) => visitor.visit_borrowed_str(num),
			Value::Double(double) => visitor.visit_f64(*double),
			Value::Boolean(bool) => visitor.visit_bool(*bool),
			Value::Null => visitor.visit_none(),
			Value::Error(err) => Err(Error::Redis(err.to_string().into())),
			Value::Array(items) | Value::Set(items) => visit_items(items.iter(), visitor),
			Value::Map(entries) => {
				visit_entries(entries.iter().map(|(key, val)| (key, val)), visitor)
			}
		}
	}

	fn deserialize_option<V>(self, visitor: V) -> Result<'de, V::Value>
	where
		V: de::Visitor<'de>,
	{
		match self {
			Value::Null => visitor.visit_none(),
			other => visitor.visit_some(other),
		}
	}

	fn deserialize_unit<V>(self, visitor: V) -> Result<'de, V::Value>
	where
		V: de::Visitor<'de>,
	{
		match self {
			Value::Error(err) => Err(Error::Redis(err.to_string().into())),
			_ => visitor.visit_unit(),
		}
	}

	fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<'de, V::Value>
	where
		V: de::Visitor<'de>,
	{
		self.deserialize_unit(visitor)
	}

	fn deserialize_newtype_struct<V>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<'de, V::Value>
	where
		V: de::Visitor<'de>,
	{
		visitor.visit_newtype_struct(self)
	}

	forward_to_deserialize_any! {
		bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
		bytes byte_buf seq tuple tuple_struct map struct enum identifier
		ignored_any
	}
}

impl<'de, 'a: 'de> de::IntoDeserializer<'de, Error<'de>> for &'a Value<'de> {
	type Deserializer = Self;

	fn into_deserializer(self) -> Self::Deserializer {
		self
	}
}
