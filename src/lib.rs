//! ## Session Traversal Utilities for NAT (STUN)
//!
//! A zero-allocation STUN message serializer and deserializer, covering the
//! STUN base protocol ([RFC5389]), the TURN relay extension ([RFC5766]) and
//! the ICE connectivity-check attributes ([RFC8445]).
//!
//! [RFC5389]: https://tools.ietf.org/html/rfc5389
//! [RFC5766]: https://tools.ietf.org/html/rfc5766
//! [RFC8445]: https://tools.ietf.org/html/rfc8445
//!
//! The codec never owns memory. [`StunSerializer`] writes a message into a
//! caller-supplied buffer (or, in sizing mode, merely counts the bytes a
//! real serialization would produce), and [`StunDeserializer`] yields
//! attribute views that borrow the input buffer. MESSAGE-INTEGRITY and
//! FINGERPRINT values are computed outside the codec: both sides expose the
//! exact byte coverage an external HMAC-SHA1 or CRC-32 must digest, and
//! [`calculate_integrity_hmac`]/[`calculate_fingerprint`] implement those
//! digests for callers that want them.
//!
//! ### STUN Message Structure
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |0 0|     STUN Message Type     |         Message Length        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Magic Cookie                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! |                     Transaction ID (96 bits)                  |
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! ### STUN Attributes
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |         Type                  |            Length             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Value (variable)                ....
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Every attribute is type-length-value encoded and padded to a 32-bit
//! boundary. FINGERPRINT, when present, must be the last attribute of a
//! message, and nothing but FINGERPRINT may follow MESSAGE-INTEGRITY; both
//! the serializer and the deserializer enforce this ordering.
//!
//! ### Example
//!
//! ```
//! use stun_wire::{
//!     StunDeserializer, StunHeader, StunMessageType, StunSerializer,
//! };
//!
//! let transaction_id = stun_wire::generate_transaction_id();
//! let header = StunHeader::new(StunMessageType::BindingRequest, &transaction_id);
//!
//! // Pre-size the message, then serialize it for real.
//! let mut sizer = StunSerializer::sizing(&header);
//! sizer.add_attribute_priority(0x6e7f1eff).unwrap();
//! sizer.add_attribute_username(b"guest").unwrap();
//! let size = sizer.finalize();
//!
//! let mut buffer = vec![0u8; size];
//! let mut serializer = StunSerializer::new(&header, &mut buffer).unwrap();
//! serializer.add_attribute_priority(0x6e7f1eff).unwrap();
//! serializer.add_attribute_username(b"guest").unwrap();
//! let length = serializer.finalize();
//! assert_eq!(length, size);
//!
//! // Decode it back; attribute values borrow `buffer`.
//! let mut deserializer = StunDeserializer::new(&buffer[..length]).unwrap();
//! let priority = deserializer.get_next_attribute().unwrap();
//! assert_eq!(priority.parse_priority().unwrap(), 0x6e7f1eff);
//! let username = deserializer.get_next_attribute().unwrap();
//! assert_eq!(username.value, Some(&b"guest"[..]));
//! ```

mod attribute;
pub mod definitions;
mod deserializer;
mod errors;
mod header;
mod integrity;
mod serializer;
mod utils;

pub use attribute::{StunAttribute, StunAttributeType, StunErrorCode};
pub use definitions::StunTransactionId;
pub use deserializer::{update_attribute_nonce, CoverageBuffer, StunDeserializer};
pub use errors::{IntegrityKeyGenerationError, StunError};
pub use header::{StunHeader, StunMessageType};
pub use integrity::{
    calculate_fingerprint, calculate_integrity_hmac, calculate_long_term_integrity_key,
    calculate_short_term_integrity_key,
};
pub use serializer::StunSerializer;
pub use utils::{check_for_stun_message_header, generate_transaction_id};
