use byteorder::{ByteOrder, NetworkEndian};
use num_derive::FromPrimitive;
use std::convert::TryFrom;

use crate::definitions::{
    StunTransactionId, STUN_HEADER_SIZE, STUN_MAGIC_COOKIE_OFFSET, STUN_MAGIC_COOKIE_U32,
    STUN_MESSAGE_LENGTH_OFFSET, STUN_TRANSACTION_ID_OFFSET, STUN_TRANSACTION_ID_SIZE,
};
use crate::errors::StunError;

/// [STUN message types](https://tools.ietf.org/html/rfc5389#section-6)
///
/// The 16-bit message type combines the message class (request, success
/// response, error response, or indication) with the message method (the
/// primary function). Binding is the method defined by STUN itself; the
/// Allocate/Refresh/CreatePermission/ChannelBind methods and the Send/Data
/// indications come from the TURN relay extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum StunMessageType {
    BindingRequest = 0x0001,
    BindingSuccessResponse = 0x0101,
    BindingFailureResponse = 0x0111,
    BindingIndication = 0x0011,
    AllocateRequest = 0x0003,
    AllocateSuccessResponse = 0x0103,
    AllocateErrorResponse = 0x0113,
    RefreshRequest = 0x0004,
    RefreshSuccessResponse = 0x0104,
    RefreshErrorResponse = 0x0114,
    CreatePermissionRequest = 0x0008,
    CreatePermissionSuccessResponse = 0x0108,
    CreatePermissionErrorResponse = 0x0118,
    ChannelBindRequest = 0x0009,
    ChannelBindSuccessResponse = 0x0109,
    ChannelBindErrorResponse = 0x0119,
    SendIndication = 0x0016,
    DataIndication = 0x0017,
}

/// [STUN message header](https://tools.ietf.org/html/rfc5389#section-6)
///
/// All STUN messages MUST start with a 20-byte header followed by zero
/// or more Attributes. The STUN header contains a STUN message type,
/// magic cookie, transaction ID, and message length.
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |0 0|     STUN Message Type     |         Message Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Magic Cookie                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                     Transaction ID (96 bits)                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The magic cookie field MUST contain the fixed value 0x2112A442 in network
/// byte order; it is validated on decode and written on encode but never
/// carried in this struct.
///
/// On encode the transaction id is supplied by the caller; on decode it is a
/// borrowed view into bytes [8..20) of the message buffer and must not
/// outlive it.
#[derive(Debug, Copy, Clone)]
pub struct StunHeader<'a> {
    /// Message type as carried in the first two bytes of the header.
    ///
    /// Kept as the raw wire value so that messages with methods this crate
    /// doesn't know about still decode; see [`StunHeader::known_type`].
    pub message_type: u16,
    /// 96-bit transaction identifier.
    pub transaction_id: &'a StunTransactionId,
    /// Length of the attribute section as declared by the header.
    /// Zero until a decoder fills it in.
    pub message_length: u16,
}

impl<'a> StunHeader<'a> {
    /// Creates a header for serialization.
    pub fn new(message_type: StunMessageType, transaction_id: &'a StunTransactionId) -> Self {
        Self {
            message_type: message_type as u16,
            transaction_id,
            message_length: 0,
        }
    }

    /// Decodes the fixed 20-byte header at the start of `message`.
    ///
    /// Validates the magic cookie but deliberately not the message type, so
    /// unknown methods pass through to the caller.
    pub fn decode(message: &'a [u8]) -> Result<Self, StunError> {
        if message.len() < STUN_HEADER_SIZE {
            return Err(StunError::BadParam);
        }

        let message_type = NetworkEndian::read_u16(message);
        let message_length = NetworkEndian::read_u16(&message[STUN_MESSAGE_LENGTH_OFFSET..]);
        let magic_cookie = NetworkEndian::read_u32(&message[STUN_MAGIC_COOKIE_OFFSET..]);

        if magic_cookie != STUN_MAGIC_COOKIE_U32 {
            return Err(StunError::MagicCookieMismatch);
        }

        let transaction_id = <&StunTransactionId>::try_from(
            &message[STUN_TRANSACTION_ID_OFFSET..STUN_TRANSACTION_ID_OFFSET + STUN_TRANSACTION_ID_SIZE],
        )
        .map_err(|_| StunError::BadParam)?;

        Ok(Self {
            message_type,
            transaction_id,
            message_length,
        })
    }

    /// The message type as a known constant, when recognized.
    pub fn known_type(&self) -> Option<StunMessageType> {
        num_traits::FromPrimitive::from_u16(self.message_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSACTION_ID: StunTransactionId = [
        0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0xab, 0xcd, 0xef, 0xa5,
    ];

    #[test]
    fn decode_binding_request_header() {
        let message = [
            0x00, 0x01, 0x00, 0x00, // Binding Request, length 0
            0x21, 0x12, 0xa4, 0x42, // magic cookie
            0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0xab, 0xcd, 0xef, 0xa5,
        ];

        let header = StunHeader::decode(&message).unwrap();
        assert_eq!(header.message_type, 0x0001);
        assert_eq!(header.known_type(), Some(StunMessageType::BindingRequest));
        assert_eq!(header.message_length, 0);
        assert_eq!(header.transaction_id, &TRANSACTION_ID);
    }

    #[test]
    fn decode_rejects_cookie_mismatch() {
        let mut message = [0u8; 20];
        message[4..8].copy_from_slice(&[0x21, 0x12, 0xa4, 0x41]);

        assert_eq!(
            StunHeader::decode(&message).unwrap_err(),
            StunError::MagicCookieMismatch
        );
    }

    #[test]
    fn decode_rejects_short_buffer() {
        assert_eq!(
            StunHeader::decode(&[0u8; 19]).unwrap_err(),
            StunError::BadParam
        );
    }

    #[test]
    fn unknown_message_type_decodes() {
        let mut message = [0u8; 20];
        message[0] = 0x00;
        message[1] = 0x02; // reserved method
        message[4..8].copy_from_slice(&[0x21, 0x12, 0xa4, 0x42]);

        let header = StunHeader::decode(&message).unwrap();
        assert_eq!(header.message_type, 0x0002);
        assert_eq!(header.known_type(), None);
    }
}
