//! A streaming RESP2/RESP3 codec for Rust.
//!
//! ```
//! use resp_wire::{Codec, Value};
//!
//! let mut codec = Codec::new();
//! codec.write(b"+OK\r\n$5\r\nhel");
//!
//! // Only the complete reply is yielded; the blob's tail stays buffered.
//! assert_eq!(codec.parse()?, [Value::simple_string("OK")]);
//!
//! codec.write(b"lo\r\n");
//! assert_eq!(codec.parse()?, [Value::blob_string("hello")]);
//! # Ok::<_, resp_wire::Error<'static>>(())
//! ```
//!
//! Transport bytes go in through [Codec::write] in fragments of any size;
//! [Codec::parse] yields every reply that has fully arrived, in wire order.
//! [Codec::encode] produces the wire form of a command invocation. The codec
//! knows nothing of sockets. For an async transport, [Codec] also implements
//! the [tokio_util] `Decoder`/`Encoder` pair.
//!
//! Replies are returned as owned [Value]s. The [serde] utilities
//! [from_value] and [to_value] convert between RESP values and Rust
//! structures.

/// Fold frames into values.
pub mod assemble;
/// Stream RESP.
pub mod codec;
/// Convert values into Rust structures.
pub mod de;
/// Write commands and values.
pub mod encode;
/// Codec errors.
pub mod error;
/// Scan wire bytes into frames.
pub mod frame;
/// Convert Rust structures into values.
pub mod ser;
/// RESP values.
pub mod value;

pub use nom;

pub use codec::Codec;
pub use de::from_value;
pub use error::{Error, Result};
pub use ser::to_value;
pub use value::{ErrorReply, Value};
