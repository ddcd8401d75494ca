use std::{borrow::Cow, str::from_utf8};

use nom::{
	branch::alt,
	bytes::streaming::{tag, take},
	character::streaming::{char, crlf, digit1, i64, not_line_ending, one_of, u64},
	combinator::{map, map_res, opt, recognize, value},
	error::ErrorKind,
	sequence::{delimited, pair, terminated, tuple},
	IResult, Needed,
};

/// A scanner error.
pub type ParseError<'a> = nom::Err<nom::error::Error<Cow<'a, [u8]>>>;
pub(crate) type RawError<'a> = nom::Err<nom::error::Error<&'a [u8]>>;

/// One self-delimited wire unit: a type byte plus its payload.
///
/// Aggregate headers carry only their declared child count; folding children
/// into trees is the assembler's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<'a> {
	Simple(&'a str),
	Error(&'a str),
	Integer(i64),
	BigNumber(&'a str),
	Double(f64),
	Boolean(bool),
	Null,
	Blob(&'a [u8]),
	NullBlob,
	BlobError(&'a str),
	Verbatim { format: [u8; 3], text: &'a str },
	ArrayHeader(usize),
	NullAggregate,
	MapHeader(usize),
	SetHeader(usize),
}

/// Scan the next frame.
///
/// Dispatches on the type byte; an unrecognised byte at a frame-start
/// position is a failure, an empty buffer is incompleteness.
pub fn frame(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	match data.first() {
		Some(b'+') => simple_string(data),
		Some(b'-') => simple_error(data),
		Some(b':') => integer(data),
		Some(b'$') => blob_string(data),
		Some(b'*') => array_header(data),
		Some(b'_') => null(data),
		Some(b'#') => boolean(data),
		Some(b',') => double(data),
		Some(b'(') => big_number(data),
		Some(b'!') => blob_error(data),
		Some(b'=') => verbatim_string(data),
		Some(b'%') => map_header(data),
		Some(b'~') => set_header(data),
		Some(_) => Err(nom::Err::Failure(nom::error::Error::new(
			data,
			ErrorKind::OneOf,
		))),
		None => Err(nom::Err::Incomplete(Needed::new(1))),
	}
}

/// Scan a simple string frame.
pub fn simple_string(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(
		map_res(delimited(char('+'), not_line_ending, crlf), from_utf8),
		Frame::Simple,
	)(data)
}

/// Scan a simple error frame.
pub fn simple_error(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(
		map_res(delimited(char('-'), not_line_ending, crlf), from_utf8),
		Frame::Error,
	)(data)
}

/// Scan an integer frame. The payload must fit a signed 64-bit integer.
pub fn integer(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(delimited(char(':'), i64, crlf), Frame::Integer)(data)
}

/// Scan a big number frame: an optionally signed decimal of any length.
pub fn big_number(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(
		map_res(
			delimited(char('('), recognize(pair(opt(one_of("+-")), digit1)), crlf),
			from_utf8,
		),
		Frame::BigNumber,
	)(data)
}

/// Scan a double frame: `inf`, `-inf`, or `[-]?digits[.digits]`.
///
/// Exponent notation, a bare leading dot, and `nan` are rejected.
pub fn double(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	let number = map_res(
		map_res(
			recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1))))),
			from_utf8,
		),
		str::parse::<f64>,
	);

	map(
		delimited(
			char(','),
			alt((
				value(f64::INFINITY, tag("inf")),
				value(f64::NEG_INFINITY, tag("-inf")),
				number,
			)),
			crlf,
		),
		Frame::Double,
	)(data)
}

/// Scan a boolean frame. The payload is exactly `t` or `f`.
pub fn boolean(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(
		delimited(
			char('#'),
			alt((value(true, char('t')), value(false, char('f')))),
			crlf,
		),
		Frame::Boolean,
	)(data)
}

/// Scan a null frame. The payload must be empty.
pub fn null(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	value(Frame::Null, pair(char('_'), crlf))(data)
}

/// Scan a blob string frame.
///
/// The body is consumed eagerly by its declared byte length, so bodies
/// containing CRLF are never scanned for frame boundaries. Length `-1` is the
/// null blob.
pub fn blob_string(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	let (data, len) = delimited(char('$'), i64, crlf)(data)?;
	match len {
		-1 => Ok((data, Frame::NullBlob)),
		0.. => map(terminated(take(len as usize), crlf), Frame::Blob)(data),
		_ => Err(nom::Err::Failure(nom::error::Error::new(
			data,
			ErrorKind::Digit,
		))),
	}
}

/// Scan a blob error frame. The body must be UTF-8.
pub fn blob_error(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	let (data, len) = delimited(char('!'), u64, crlf)(data)?;
	map(
		map_res(terminated(take(len as usize), crlf), from_utf8),
		Frame::BlobError,
	)(data)
}

/// Scan a verbatim string frame.
///
/// The body is at least four bytes: a three-byte format tag, a colon, then
/// the text.
pub fn verbatim_string(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	let (rest, len) = delimited(char('='), u64, crlf)(data)?;
	if len < 4 {
		return Err(nom::Err::Failure(nom::error::Error::new(
			rest,
			ErrorKind::Verify,
		)));
	}

	let (rest, body) = terminated(take(len as usize), crlf)(rest)?;
	if body[3] != b':' {
		return Err(nom::Err::Failure(nom::error::Error::new(
			rest,
			ErrorKind::Verify,
		)));
	}

	let text = from_utf8(&body[4..])
		.map_err(|_| nom::Err::Failure(nom::error::Error::new(rest, ErrorKind::Char)))?;

	Ok((
		rest,
		Frame::Verbatim {
			format: [body[0], body[1], body[2]],
			text,
		},
	))
}

/// Scan an array header. `-1` is the null aggregate.
pub fn array_header(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	let (rest, len) = delimited(char('*'), i64, crlf)(data)?;
	match len {
		-1 => Ok((rest, Frame::NullAggregate)),
		0.. => Ok((rest, Frame::ArrayHeader(len as usize))),
		_ => Err(nom::Err::Failure(nom::error::Error::new(
			rest,
			ErrorKind::Digit,
		))),
	}
}

/// Scan a map header. The count is in pairs.
pub fn map_header(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(delimited(char('%'), u64, crlf), |len| {
		Frame::MapHeader(len as usize)
	})(data)
}

/// Scan a set header.
pub fn set_header(data: &[u8]) -> IResult<&[u8], Frame<'_>> {
	map(delimited(char('~'), u64, crlf), |len| {
		Frame::SetHeader(len as usize)
	})(data)
}
