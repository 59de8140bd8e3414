use byteorder::{ByteOrder, NetworkEndian};
use std::net::SocketAddr;

use crate::attribute::{address, AttributeOrder, StunAttribute, StunAttributeType};
use crate::definitions::{
    align_to_word, StunTransactionId, STUN_ATTRIBUTE_HEADER_SIZE, STUN_ATTRIBUTE_LENGTH_OFFSET,
    STUN_ATTRIBUTE_VALUE_OFFSET, STUN_FINGERPRINT_ATTR_SIZE, STUN_HEADER_SIZE,
    STUN_INTEGRITY_ATTR_SIZE,
};
use crate::errors::StunError;
use crate::header::StunHeader;

/// Byte ranges a MESSAGE-INTEGRITY or FINGERPRINT check over a received
/// message must cover.
///
/// The check is defined over the message with its header length field set to
/// the value it had when the sender computed the digest, which differs from
/// the final length whenever attributes follow. The deserializer only holds
/// a shared borrow of the message, so instead of patching the field in place
/// the substitution is expressed as ordered segments to feed to the digest.
#[derive(Debug, Copy, Clone)]
pub struct CoverageBuffer<'a> {
    head: &'a [u8],
    length_field: [u8; 2],
    body: &'a [u8],
}

impl<'a> CoverageBuffer<'a> {
    /// The covered ranges in message order: message type, substituted length
    /// field, and the rest of the coverage. Feed them to the digest in
    /// sequence.
    pub fn segments(&self) -> [&[u8]; 3] {
        [self.head, &self.length_field, self.body]
    }

    /// Total number of covered bytes.
    pub fn covered_length(&self) -> usize {
        self.head.len() + self.length_field.len() + self.body.len()
    }
}

/// Parses a STUN message from a borrowed byte buffer.
///
/// The deserializer owns nothing: the header's transaction id and every
/// attribute value it yields are views into the input buffer and must not
/// outlive it. Attributes are consumed in wire order through
/// [`StunDeserializer::get_next_attribute`]; the FINGERPRINT/
/// MESSAGE-INTEGRITY terminality rules are enforced while iterating.
///
/// ```
/// use stun_wire::{StunDeserializer, StunMessageType};
///
/// let message = [
///     0x00u8, 0x01, 0x00, 0x08, 0x21, 0x12, 0xa4, 0x42, 0x11, 0x12, 0x13, 0x14, 0x15, 0x11,
///     0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x00, 0x24, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2a,
/// ];
///
/// let mut deserializer = StunDeserializer::new(&message).unwrap();
/// assert_eq!(deserializer.header().known_type(), Some(StunMessageType::BindingRequest));
///
/// let attribute = deserializer.get_next_attribute().unwrap();
/// assert_eq!(attribute.parse_priority().unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct StunDeserializer<'a> {
    message: &'a [u8],
    header: StunHeader<'a>,
    current_index: usize,
    order: AttributeOrder,
}

impl<'a> StunDeserializer<'a> {
    /// Validates the fixed header and creates a deserializer positioned at
    /// the first attribute.
    ///
    /// Fails with `BadParam` when the buffer cannot hold a header,
    /// `MagicCookieMismatch` when the cookie is wrong, and
    /// `InvalidMessageLength` when the declared length plus the header size
    /// disagrees with the buffer length.
    pub fn new(message: &'a [u8]) -> Result<Self, StunError> {
        let header = StunHeader::decode(message)?;
        if header.message_length as usize + STUN_HEADER_SIZE != message.len() {
            return Err(StunError::InvalidMessageLength);
        }

        Ok(Self {
            message,
            header,
            current_index: STUN_HEADER_SIZE,
            order: AttributeOrder::default(),
        })
    }

    /// The decoded message header. Its transaction id borrows the input.
    pub fn header(&self) -> &StunHeader<'a> {
        &self.header
    }

    /// The 96-bit transaction id, borrowed from bytes [8..20) of the input.
    pub fn transaction_id(&self) -> &'a StunTransactionId {
        self.header.transaction_id
    }

    /// Current read offset from the start of the message.
    pub fn position(&self) -> usize {
        self.current_index
    }

    /// Yields the next attribute and advances the cursor past its padding.
    ///
    /// Returns `NoMoreAttributeFound` at the end of the stream,
    /// `InvalidAttributeOrder` when an attribute violates the terminality
    /// rules, and `OutOfMemory` when a declared value length overruns the
    /// input. On failure the cursor and ordering flags stay untouched.
    pub fn get_next_attribute(&mut self) -> Result<StunAttribute<'a>, StunError> {
        if self.remaining_length() < STUN_ATTRIBUTE_HEADER_SIZE {
            return Err(StunError::NoMoreAttributeFound);
        }

        let attribute_type = NetworkEndian::read_u16(&self.message[self.current_index..]);
        self.order.check(attribute_type)?;

        let value_length = NetworkEndian::read_u16(
            &self.message[self.current_index + STUN_ATTRIBUTE_LENGTH_OFFSET..],
        ) as usize;
        if self.remaining_length() < STUN_ATTRIBUTE_HEADER_SIZE + value_length {
            return Err(StunError::OutOfMemory);
        }

        let value = if value_length > 0 {
            let value_start = self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET;
            Some(&self.message[value_start..value_start + value_length])
        } else {
            None
        };

        self.order.update(attribute_type);
        // A truncated final padding consumes the rest of the message; the
        // next call reports the normal end of stream.
        self.current_index = (self.current_index
            + STUN_ATTRIBUTE_HEADER_SIZE
            + align_to_word(value_length))
        .min(self.message.len());

        Ok(StunAttribute {
            attribute_type,
            value,
        })
    }

    /// Read-only scan for the first attribute of the given type, leaving
    /// this context's cursor and flags untouched. The parent context is
    /// already validated, so the throwaway cursor starts directly past the
    /// header instead of re-running init.
    ///
    /// Exhausting the message reports `NoAttributeFound`, distinct from the
    /// `NoMoreAttributeFound` stream-end signal of iteration.
    pub fn find_attribute(
        &self,
        attribute_type: StunAttributeType,
    ) -> Result<StunAttribute<'a>, StunError> {
        let mut scan = StunDeserializer {
            message: self.message,
            header: self.header,
            current_index: STUN_HEADER_SIZE,
            order: AttributeOrder::default(),
        };

        loop {
            match scan.get_next_attribute() {
                Ok(attribute) if attribute.attribute_type == attribute_type as u16 => {
                    return Ok(attribute)
                }
                Ok(_) => continue,
                Err(StunError::NoMoreAttributeFound) => return Err(StunError::NoAttributeFound),
                Err(error) => return Err(error),
            }
        }
    }

    /// Parses an address attribute (plain or XOR variant) into a socket
    /// address. XOR variants are de-obfuscated with the magic cookie and
    /// this message's transaction id, so the result holds the real address.
    pub fn parse_attribute_address(
        &self,
        attribute: &StunAttribute<'a>,
    ) -> Result<SocketAddr, StunError> {
        let attribute_type = attribute.known_type().ok_or(StunError::BadParam)?;
        if !attribute_type.is_address() {
            return Err(StunError::BadParam);
        }

        let value = attribute.value.ok_or(StunError::BadParam)?;
        address::read_address_value(
            value,
            self.transaction_id(),
            attribute_type.is_xor_address(),
        )
    }

    /// Coverage an external HMAC-SHA1 must digest to check the
    /// MESSAGE-INTEGRITY attribute that was just consumed: everything before
    /// the attribute, under the header length the sender used. Fails with
    /// `BadParam` until the attribute has been consumed.
    pub fn integrity_buffer(&self) -> Result<CoverageBuffer<'a>, StunError> {
        self.coverage_buffer(STUN_INTEGRITY_ATTR_SIZE)
    }

    /// Coverage an external CRC-32 must digest to check the FINGERPRINT
    /// attribute that was just consumed.
    pub fn fingerprint_buffer(&self) -> Result<CoverageBuffer<'a>, StunError> {
        self.coverage_buffer(STUN_FINGERPRINT_ATTR_SIZE)
    }

    fn coverage_buffer(
        &self,
        trailing_attribute_size: usize,
    ) -> Result<CoverageBuffer<'a>, StunError> {
        if self.current_index < STUN_HEADER_SIZE + trailing_attribute_size {
            return Err(StunError::BadParam);
        }

        let declared_length = (self.current_index - STUN_HEADER_SIZE) as u16;
        Ok(CoverageBuffer {
            head: &self.message[..2],
            length_field: declared_length.to_be_bytes(),
            body: &self.message[4..self.current_index - trailing_attribute_size],
        })
    }

    fn remaining_length(&self) -> usize {
        self.message.len() - self.current_index
    }
}

/// Rewrites the value of the first NONCE attribute of a serialized message
/// in place, e.g. after a server rotates its nonce. The replacement must
/// have the same length as the existing value; the attribute is never
/// resized.
///
/// Reports `NoAttributeFound` when the message carries no NONCE and
/// `BadParam` when the lengths differ.
pub fn update_attribute_nonce(message: &mut [u8], nonce: &[u8]) -> Result<(), StunError> {
    let value_start = {
        let mut deserializer = StunDeserializer::new(&message[..])?;
        loop {
            let attribute_start = deserializer.position();
            match deserializer.get_next_attribute() {
                Ok(attribute)
                    if attribute.attribute_type == StunAttributeType::Nonce as u16 =>
                {
                    if attribute.value_length() as usize != nonce.len() {
                        return Err(StunError::BadParam);
                    }
                    break attribute_start + STUN_ATTRIBUTE_VALUE_OFFSET;
                }
                Ok(_) => continue,
                Err(StunError::NoMoreAttributeFound) => return Err(StunError::NoAttributeFound),
                Err(error) => return Err(error),
            }
        }
    };

    message[value_start..value_start + nonce.len()].copy_from_slice(nonce);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Binding request with PRIORITY, USERNAME "guest" and NONCE "abcd1234".
    const MESSAGE: [u8; 52] = [
        0x00, 0x01, 0x00, 0x20, 0x21, 0x12, 0xa4, 0x42, 0x11, 0x12, 0x13, 0x14, 0x15, 0x11, 0x11,
        0x11, 0x11, 0x11, 0x11, 0x11, // header
        0x00, 0x24, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2a, // PRIORITY = 42
        0x00, 0x06, 0x00, 0x05, 0x67, 0x75, 0x65, 0x73, 0x74, 0x00, 0x00, 0x00, // USERNAME
        0x00, 0x15, 0x00, 0x08, 0x61, 0x62, 0x63, 0x64, 0x31, 0x32, 0x33, 0x34, // NONCE
    ];

    #[test]
    fn iterates_attributes_in_order() {
        let mut deserializer = StunDeserializer::new(&MESSAGE).unwrap();
        assert_eq!(deserializer.header().message_type, 0x0001);
        assert_eq!(
            deserializer.transaction_id(),
            &[0x11, 0x12, 0x13, 0x14, 0x15, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11]
        );

        let priority = deserializer.get_next_attribute().unwrap();
        assert_eq!(priority.parse_priority().unwrap(), 42);
        assert_eq!(deserializer.position() % 4, 0);

        let username = deserializer.get_next_attribute().unwrap();
        assert_eq!(username.known_type(), Some(StunAttributeType::Username));
        assert_eq!(username.value, Some(&b"guest"[..]));
        assert_eq!(deserializer.position() % 4, 0);

        let nonce = deserializer.get_next_attribute().unwrap();
        assert_eq!(nonce.known_type(), Some(StunAttributeType::Nonce));

        assert_eq!(
            deserializer.get_next_attribute().unwrap_err(),
            StunError::NoMoreAttributeFound
        );
    }

    #[test]
    fn init_rejects_declared_length_mismatch() {
        let mut message = [0u8; 24];
        message[..8].copy_from_slice(&[0x00, 0x01, 0x00, 0x10, 0x21, 0x12, 0xa4, 0x42]);

        assert_eq!(
            StunDeserializer::new(&message).unwrap_err(),
            StunError::InvalidMessageLength
        );
    }

    #[test]
    fn init_rejects_cookie_mismatch() {
        let mut message = [0u8; 20];
        message[4..8].copy_from_slice(&[0x21, 0x12, 0xa4, 0x41]);

        assert_eq!(
            StunDeserializer::new(&message).unwrap_err(),
            StunError::MagicCookieMismatch
        );
    }

    #[test]
    fn init_rejects_short_buffer() {
        assert_eq!(
            StunDeserializer::new(&[0u8; 12]).unwrap_err(),
            StunError::BadParam
        );
    }

    #[test]
    fn declared_value_overrun_is_out_of_memory() {
        let mut message = [0u8; 28];
        message[..8].copy_from_slice(&[0x00, 0x01, 0x00, 0x08, 0x21, 0x12, 0xa4, 0x42]);
        // USERNAME claiming 32 value bytes with only 4 present.
        message[20..24].copy_from_slice(&[0x00, 0x06, 0x00, 0x20]);

        let mut deserializer = StunDeserializer::new(&message).unwrap();
        assert_eq!(
            deserializer.get_next_attribute().unwrap_err(),
            StunError::OutOfMemory
        );
        assert_eq!(deserializer.position(), 20);
    }

    #[test]
    fn find_attribute_does_not_disturb_iteration() {
        let mut deserializer = StunDeserializer::new(&MESSAGE).unwrap();
        deserializer.get_next_attribute().unwrap();

        let position = deserializer.position();
        let username = deserializer
            .find_attribute(StunAttributeType::Username)
            .unwrap();
        assert_eq!(username.value, Some(&b"guest"[..]));
        assert_eq!(deserializer.position(), position);

        assert_eq!(
            deserializer
                .find_attribute(StunAttributeType::Realm)
                .unwrap_err(),
            StunError::NoAttributeFound
        );
    }

    #[test]
    fn rejects_attribute_after_fingerprint() {
        let mut message = [0u8; 40];
        message[..8].copy_from_slice(&[0x00, 0x01, 0x00, 0x14, 0x21, 0x12, 0xa4, 0x42]);
        // FINGERPRINT followed by PRIORITY.
        message[20..28].copy_from_slice(&[0x80, 0x28, 0x00, 0x04, 0xde, 0xad, 0xbe, 0xef]);
        message[28..36].copy_from_slice(&[0x00, 0x24, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2a]);
        // Trailing room so iteration attempts another attribute.
        message[36..40].copy_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut deserializer = StunDeserializer::new(&message).unwrap();
        deserializer.get_next_attribute().unwrap();
        assert_eq!(
            deserializer.get_next_attribute().unwrap_err(),
            StunError::InvalidAttributeOrder
        );
    }

    #[test]
    fn update_nonce_rewrites_in_place() {
        let mut message = MESSAGE;
        update_attribute_nonce(&mut message, b"98765432").unwrap();

        let deserializer = StunDeserializer::new(&message).unwrap();
        let nonce = deserializer
            .find_attribute(StunAttributeType::Nonce)
            .unwrap();
        assert_eq!(nonce.value, Some(&b"98765432"[..]));
    }

    #[test]
    fn update_nonce_rejects_resize() {
        let mut message = MESSAGE;
        assert_eq!(
            update_attribute_nonce(&mut message, b"too-long-nonce").unwrap_err(),
            StunError::BadParam
        );
        // Message left untouched.
        assert_eq!(message, MESSAGE);
    }

    #[test]
    fn integrity_coverage_substitutes_sender_length() {
        // USERNAME then MESSAGE-INTEGRITY then FINGERPRINT.
        let mut message = [0u8; 64];
        message[..8].copy_from_slice(&[0x00, 0x01, 0x00, 0x2c, 0x21, 0x12, 0xa4, 0x42]);
        message[20..24].copy_from_slice(&[0x00, 0x06, 0x00, 0x05]);
        message[24..29].copy_from_slice(b"guest");
        message[32..36].copy_from_slice(&[0x00, 0x08, 0x00, 0x14]);
        message[56..60].copy_from_slice(&[0x80, 0x28, 0x00, 0x04]);

        let mut deserializer = StunDeserializer::new(&message).unwrap();
        deserializer.get_next_attribute().unwrap(); // USERNAME
        deserializer.get_next_attribute().unwrap(); // MESSAGE-INTEGRITY

        let coverage = deserializer.integrity_buffer().unwrap();
        // Everything before the integrity attribute.
        assert_eq!(coverage.covered_length(), 32);
        // Substituted length: up to and including MESSAGE-INTEGRITY.
        assert_eq!(coverage.segments()[1], &[0x00, 0x24]);

        deserializer.get_next_attribute().unwrap(); // FINGERPRINT
        let coverage = deserializer.fingerprint_buffer().unwrap();
        assert_eq!(coverage.covered_length(), 56);
        assert_eq!(coverage.segments()[1], &[0x00, 0x2c]);
    }

    #[test]
    fn coverage_requires_consumed_attribute() {
        // A 20-byte slice of MESSAGE has a stale declared length.
        assert_eq!(
            StunDeserializer::new(&MESSAGE[..20]).unwrap_err(),
            StunError::InvalidMessageLength
        );

        let minimal = [
            0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x11, 0x12, 0x13, 0x14, 0x15, 0x11,
            0x11, 0x11, 0x11, 0x11, 0x11, 0x11,
        ];
        let deserializer = StunDeserializer::new(&minimal).unwrap();
        assert_eq!(
            deserializer.integrity_buffer().unwrap_err(),
            StunError::BadParam
        );
    }
}
