use serde::{ser, Serialize};

use crate::{error::Result, value::Value, Error};

/// Serialize `T` into a [Value] tree.
///
/// Rust values map onto their native RESP3 kinds: booleans become
/// [Value::Boolean], floats [Value::Double], maps and structs [Value::Map],
/// and unsigned integers beyond the signed 64-bit range [Value::BigNumber].
pub fn to_value<T>(value: &T) -> Result<'static, Value<'static>>
where
	T: Serialize,
{
	value.serialize(Serializer)
}

impl ser::Serialize for Value<'_> {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		match self {
			Value::SimpleString(str) => str.serialize(serializer),
			Value::BlobString(bytes) => serde_bytes::serialize(bytes, serializer),
			Value::VerbatimString { text, .. } => text.serialize(serializer),
			Value::Integer(int) => int.serialize(serializer),
			Value::BigNumber(num) => num.serialize(serializer),
			Value::Double(double) => double.serialize(serializer),
			Value::Boolean(bool) => bool.serialize(serializer),
			Value::Null => serializer.serialize_unit(),
			Value::Error(err) => err.to_string().serialize(serializer),
			Value::Array(items) | Value::Set(items) => items.serialize(serializer),
			Value::Map(entries) => {
				serializer.collect_map(entries.iter().map(|(key, val)| (key, val)))
			}
		}
	}
}

struct Serializer;

impl ser::Serializer for Serializer {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	type SerializeSeq = SerializeVec;

	type SerializeTuple = SerializeVec;

	type SerializeTupleStruct = SerializeVec;

	type SerializeTupleVariant = SerializeVariantVec;

	type SerializeMap = SerializeEntries;

	type SerializeStruct = SerializeEntries;

	type SerializeStructVariant = SerializeVariantEntries;

	fn serialize_bool(self, v: bool) -> Result<'static, Self::Ok> {
		Ok(Value::Boolean(v))
	}

	fn serialize_i8(self, v: i8) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_i16(self, v: i16) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_i32(self, v: i32) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_i64(self, v: i64) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v))
	}

	fn serialize_u8(self, v: u8) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_u16(self, v: u16) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_u32(self, v: u32) -> Result<'static, Self::Ok> {
		Ok(Value::Integer(v.into()))
	}

	fn serialize_u64(self, v: u64) -> Result<'static, Self::Ok> {
		match i64::try_from(v) {
			Ok(int) => Ok(Value::Integer(int)),
			Err(_) => Ok(Value::BigNumber(v.to_string().into())),
		}
	}

	fn serialize_f32(self, v: f32) -> Result<'static, Self::Ok> {
		Ok(Value::Double(v.into()))
	}

	fn serialize_f64(self, v: f64) -> Result<'static, Self::Ok> {
		Ok(Value::Double(v))
	}

	fn serialize_char(self, v: char) -> Result<'static, Self::Ok> {
		Ok(Value::SimpleString(v.to_string().into()))
	}

	fn serialize_str(self, v: &str) -> Result<'static, Self::Ok> {
		Ok(Value::SimpleString(v.to_owned().into()))
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<'static, Self::Ok> {
		Ok(Value::BlobString(v.to_vec().into()))
	}

	fn serialize_none(self) -> Result<'static, Self::Ok> {
		Ok(Value::Null)
	}

	fn serialize_some<T: ?Sized>(self, value: &T) -> Result<'static, Self::Ok>
	where
		T: Serialize,
	{
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<'static, Self::Ok> {
		Ok(Value::Null)
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<'static, Self::Ok> {
		self.serialize_unit()
	}

	fn serialize_unit_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
	) -> Result<'static, Self::Ok> {
		self.serialize_str(variant)
	}

	fn serialize_newtype_struct<T: ?Sized>(
		self,
		_name: &'static str,
		value: &T,
	) -> Result<'static, Self::Ok>
	where
		T: Serialize,
	{
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized>(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		value: &T,
	) -> Result<'static, Self::Ok>
	where
		T: Serialize,
	{
		Ok(Value::Map(vec![(
			Value::simple_string(variant),
			value.serialize(Serializer)?,
		)]))
	}

	fn serialize_seq(self, len: Option<usize>) -> Result<'static, Self::SerializeSeq> {
		Ok(SerializeVec {
			vec: Vec::with_capacity(len.unwrap_or(0)),
		})
	}

	fn serialize_tuple(self, len: usize) -> Result<'static, Self::SerializeTuple> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_struct(
		self,
		_name: &'static str,
		len: usize,
	) -> Result<'static, Self::SerializeTupleStruct> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		len: usize,
	) -> Result<'static, Self::SerializeTupleVariant> {
		Ok(SerializeVariantVec {
			name: variant,
			vec: Vec::with_capacity(len),
		})
	}

	fn serialize_map(self, len: Option<usize>) -> Result<'static, Self::SerializeMap> {
		Ok(SerializeEntries {
			entries: Vec::with_capacity(len.unwrap_or(0)),
			key: None,
		})
	}

	fn serialize_struct(
		self,
		_name: &'static str,
		len: usize,
	) -> Result<'static, Self::SerializeStruct> {
		self.serialize_map(Some(len))
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		len: usize,
	) -> Result<'static, Self::SerializeStructVariant> {
		Ok(SerializeVariantEntries {
			name: variant,
			entries: Vec::with_capacity(len),
		})
	}
}

struct SerializeVec {
	vec: Vec<Value<'static>>,
}

impl ser::SerializeSeq for SerializeVec {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.vec.push(value.serialize(Serializer)?);
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Array(self.vec))
	}
}

impl ser::SerializeTuple for SerializeVec {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.vec.push(value.serialize(Serializer)?);
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Array(self.vec))
	}
}

impl ser::SerializeTupleStruct for SerializeVec {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.vec.push(value.serialize(Serializer)?);
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Array(self.vec))
	}
}

struct SerializeEntries {
	entries: Vec<(Value<'static>, Value<'static>)>,
	key: Option<Value<'static>>,
}

impl ser::SerializeMap for SerializeEntries {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.key = Some(key.serialize(Serializer)?);
		Ok(())
	}

	fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		let key = self
			.key
			.take()
			.ok_or_else(|| <Error as ser::Error>::custom("map value before key"))?;
		self.entries.push((key, value.serialize(Serializer)?));
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Map(self.entries))
	}
}

impl ser::SerializeStruct for SerializeEntries {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.entries
			.push((Value::simple_string(key), value.serialize(Serializer)?));
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Map(self.entries))
	}
}

struct SerializeVariantVec {
	name: &'static str,
	vec: Vec<Value<'static>>,
}

impl ser::SerializeTupleVariant for SerializeVariantVec {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.vec.push(value.serialize(Serializer)?);
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Map(vec![(
			Value::simple_string(self.name),
			Value::Array(self.vec),
		)]))
	}
}

struct SerializeVariantEntries {
	name: &'static str,
	entries: Vec<(Value<'static>, Value<'static>)>,
}

impl ser::SerializeStructVariant for SerializeVariantEntries {
	type Ok = Value<'static>;

	type Error = Error<'static>;

	fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<'static, ()>
	where
		T: Serialize,
	{
		self.entries
			.push((Value::simple_string(key), value.serialize(Serializer)?));
		Ok(())
	}

	fn end(self) -> Result<'static, Self::Ok> {
		Ok(Value::Map(vec![(
			Value::simple_string(self.name),
			Value::Map(self.entries),
		)]))
	}
}

#[cfg(test)]
mod test {
	use serde::Serialize;

	use crate::Value;

	use super::to_value;

	#[test]
	fn ser_scalars() {
		assert_eq!(Value::Boolean(true), to_value(&true).unwrap());
		assert_eq!(Value::Integer(42), to_value(&42u8).unwrap());
		assert_eq!(Value::Double(3.5), to_value(&3.5f32).unwrap());
		assert_eq!(Value::simple_string("foo"), to_value(&"foo").unwrap());
	}

	#[test]
	fn ser_u64_beyond_i64_is_big_number() {
		assert_eq!(
			Value::BigNumber("18446744073709551615".into()),
			to_value(&u64::MAX).unwrap()
		);
	}

	#[test]
	fn ser_option() {
		assert_eq!(Value::Null, to_value(&None::<i32>).unwrap());
		assert_eq!(Value::Integer(1), to_value(&Some(1i32)).unwrap());
	}

	#[test]
	fn ser_bytes() {
		let bytes = serde_bytes::ByteBuf::from(b"foo\r\nbar".to_vec());
		assert_eq!(
			Value::BlobString(b"foo\r\nbar".to_vec().into()),
			to_value(&bytes).unwrap()
		);
	}

	#[test]
	fn ser_seq() {
		assert_eq!(
			Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
			to_value(&vec![1i64, 2]).unwrap()
		);
	}

	#[test]
	fn ser_struct_as_map() {
		#[derive(Serialize)]
		struct Info {
			version: &'static str,
			connections: u32,
		}

		assert_eq!(
			Value::Map(vec![
				(
					Value::simple_string("version"),
					Value::simple_string("7.2")
				),
				(Value::simple_string("connections"), Value::Integer(4)),
			]),
			to_value(&Info {
				version: "7.2",
				connections: 4,
			})
			.unwrap()
		);
	}

	#[test]
	fn ser_enum_variants() {
		#[derive(Serialize)]
		enum Reply {
			Ok,
			Count(u32),
		}

		assert_eq!(Value::simple_string("Ok"), to_value(&Reply::Ok).unwrap());
		assert_eq!(
			Value::Map(vec![(Value::simple_string("Count"), Value::Integer(3))]),
			to_value(&Reply::Count(3)).unwrap()
		);
	}
}
