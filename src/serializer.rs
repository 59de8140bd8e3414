use byteorder::{ByteOrder, NetworkEndian};
use std::net::SocketAddr;

use crate::attribute::{address, AttributeOrder, StunAttributeType};
use crate::definitions::{
    align_to_word, STUN_ATTRIBUTE_HEADER_SIZE, STUN_ATTRIBUTE_LENGTH_OFFSET,
    STUN_ATTRIBUTE_VALUE_OFFSET, STUN_ERROR_CODE_HEADER_SIZE, STUN_ERROR_REASON_MAX_SIZE,
    STUN_FINGERPRINT_ATTR_SIZE, STUN_HEADER_SIZE, STUN_INTEGRITY_ATTR_SIZE,
    STUN_MAGIC_COOKIE_OFFSET, STUN_MAGIC_COOKIE_U32, STUN_MESSAGE_LENGTH_OFFSET,
    STUN_TRANSACTION_ID_OFFSET, STUN_TRANSACTION_ID_SIZE,
};
use crate::errors::StunError;
use crate::header::StunHeader;

/// Destination of the serialized bytes.
///
/// `Sizing` is the buffer-less mode: the cursor advances and every check
/// that does not require the buffer still runs, but nothing is stored. It
/// exists so callers can pre-compute the exact size a real serialization
/// will produce.
#[derive(Debug)]
enum MessageBuffer<'a> {
    Writer(&'a mut [u8]),
    Sizing,
}

/// Writes a STUN message into a caller-supplied buffer.
///
/// The serializer owns no memory: it borrows the buffer for its own
/// lifetime and tracks a write cursor over it. Attributes are appended in
/// call order; FINGERPRINT must come last and only FINGERPRINT may follow
/// MESSAGE-INTEGRITY, which the serializer enforces before mutating
/// anything.
///
/// ```
/// use stun_wire::{StunHeader, StunMessageType, StunSerializer};
///
/// let transaction_id = [0x11u8, 0x12, 0x13, 0x14, 0x15, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11];
/// let header = StunHeader::new(StunMessageType::BindingRequest, &transaction_id);
///
/// let mut buffer = [0u8; 64];
/// let mut serializer = StunSerializer::new(&header, &mut buffer).unwrap();
/// serializer.add_attribute_priority(42).unwrap();
/// let length = serializer.finalize();
/// assert_eq!(length, 28);
/// ```
#[derive(Debug)]
pub struct StunSerializer<'a> {
    buffer: MessageBuffer<'a>,
    current_index: usize,
    order: AttributeOrder,
}

impl<'a> StunSerializer<'a> {
    /// Creates a serializer over `buffer` and writes the message header:
    /// type, placeholder length, magic cookie and transaction id. The length
    /// field stays zero until [`StunSerializer::finalize`] patches it.
    ///
    /// Fails with `BadParam` when the buffer cannot hold even the header.
    pub fn new(header: &StunHeader<'_>, buffer: &'a mut [u8]) -> Result<Self, StunError> {
        if buffer.len() < STUN_HEADER_SIZE {
            return Err(StunError::BadParam);
        }

        NetworkEndian::write_u16(buffer, header.message_type);
        // Message length is patched in finalize.
        NetworkEndian::write_u16(&mut buffer[STUN_MESSAGE_LENGTH_OFFSET..], 0);
        NetworkEndian::write_u32(&mut buffer[STUN_MAGIC_COOKIE_OFFSET..], STUN_MAGIC_COOKIE_U32);
        buffer[STUN_TRANSACTION_ID_OFFSET..STUN_HEADER_SIZE]
            .copy_from_slice(header.transaction_id);

        Ok(Self {
            buffer: MessageBuffer::Writer(buffer),
            current_index: STUN_HEADER_SIZE,
            order: AttributeOrder::default(),
        })
    }

    /// Creates a sizing serializer: a dry run that accepts the same
    /// operation sequence as a buffered one and reports the length it would
    /// have produced.
    pub fn sizing(_header: &StunHeader<'_>) -> Self {
        Self {
            buffer: MessageBuffer::Sizing,
            current_index: STUN_HEADER_SIZE,
            order: AttributeOrder::default(),
        }
    }

    /// Number of bytes the message occupies so far, header included.
    pub fn serialized_length(&self) -> usize {
        self.current_index
    }

    /// Appends a PRIORITY attribute.
    pub fn add_attribute_priority(&mut self, priority: u32) -> Result<(), StunError> {
        self.add_attribute_u32(StunAttributeType::Priority, priority)
    }

    /// Appends a FINGERPRINT attribute carrying an externally computed
    /// CRC-32. Must be the last attribute of the message.
    pub fn add_attribute_fingerprint(&mut self, crc32_fingerprint: u32) -> Result<(), StunError> {
        self.add_attribute_u32(StunAttributeType::Fingerprint, crc32_fingerprint)
    }

    /// Appends a LIFETIME attribute.
    pub fn add_attribute_lifetime(&mut self, lifetime: u32) -> Result<(), StunError> {
        self.add_attribute_u32(StunAttributeType::Lifetime, lifetime)
    }

    /// Appends a CHANGE-REQUEST attribute.
    pub fn add_attribute_change_request(&mut self, change_flag: u32) -> Result<(), StunError> {
        self.add_attribute_u32(StunAttributeType::ChangeRequest, change_flag)
    }

    /// Appends an ICE-CONTROLLED attribute.
    pub fn add_attribute_ice_controlled(&mut self, tie_breaker: u64) -> Result<(), StunError> {
        self.add_attribute_u64(StunAttributeType::IceControlled, tie_breaker)
    }

    /// Appends an ICE-CONTROLLING attribute.
    pub fn add_attribute_ice_controlling(&mut self, tie_breaker: u64) -> Result<(), StunError> {
        self.add_attribute_u64(StunAttributeType::IceControlling, tie_breaker)
    }

    /// Appends a USERNAME attribute.
    pub fn add_attribute_username(&mut self, username: &[u8]) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::Username, username)
    }

    /// Appends a DATA attribute.
    pub fn add_attribute_data(&mut self, data: &[u8]) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::Data, data)
    }

    /// Appends a REALM attribute.
    pub fn add_attribute_realm(&mut self, realm: &[u8]) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::Realm, realm)
    }

    /// Appends a NONCE attribute.
    pub fn add_attribute_nonce(&mut self, nonce: &[u8]) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::Nonce, nonce)
    }

    /// Appends a REQUESTED-TRANSPORT attribute.
    pub fn add_attribute_requested_transport(
        &mut self,
        requested_transport: &[u8],
    ) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::RequestedTransport, requested_transport)
    }

    /// Appends a MESSAGE-INTEGRITY attribute carrying an externally computed
    /// HMAC-SHA1. Only FINGERPRINT may be appended afterwards.
    pub fn add_attribute_integrity(&mut self, integrity: &[u8]) -> Result<(), StunError> {
        self.add_attribute_buffer(StunAttributeType::MessageIntegrity, integrity)
    }

    /// Appends a USE-CANDIDATE attribute (type only, no value).
    pub fn add_attribute_use_candidate(&mut self) -> Result<(), StunError> {
        self.add_attribute_type_only(StunAttributeType::UseCandidate)
    }

    /// Appends a DONT-FRAGMENT attribute (type only, no value).
    pub fn add_attribute_dont_fragment(&mut self) -> Result<(), StunError> {
        self.add_attribute_type_only(StunAttributeType::DontFragment)
    }

    /// Appends an ERROR-CODE attribute. The combined `error_code` (e.g. 401)
    /// is split into its class (hundreds digit) and number (code modulo 100)
    /// on the wire. The reason phrase must be non-empty.
    pub fn add_attribute_error_code(
        &mut self,
        error_code: u16,
        reason_phrase: &[u8],
    ) -> Result<(), StunError> {
        if reason_phrase.is_empty() || reason_phrase.len() > STUN_ERROR_REASON_MAX_SIZE {
            return Err(StunError::BadParam);
        }

        let value_length = STUN_ERROR_CODE_HEADER_SIZE + reason_phrase.len();
        let padded_length = align_to_word(value_length);
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + padded_length)?;
        self.order.check(StunAttributeType::ErrorCode as u16)?;

        self.write_attribute_header(StunAttributeType::ErrorCode as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            let value_start = self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET;
            NetworkEndian::write_u16(&mut buffer[value_start..], 0);
            buffer[value_start + 2] = (error_code / 100) as u8;
            buffer[value_start + 3] = (error_code % 100) as u8;
            let reason_start = value_start + STUN_ERROR_CODE_HEADER_SIZE;
            buffer[reason_start..reason_start + reason_phrase.len()]
                .copy_from_slice(reason_phrase);
            zero_fill(
                &mut buffer[value_start + value_length..value_start + padded_length],
            );
        }

        self.commit_attribute(StunAttributeType::ErrorCode as u16, padded_length);
        Ok(())
    }

    /// Appends a CHANNEL-NUMBER attribute; the reserved half-word is zero.
    pub fn add_attribute_channel_number(&mut self, channel_number: u16) -> Result<(), StunError> {
        let value_length = 4;
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + value_length)?;
        self.order.check(StunAttributeType::ChannelNumber as u16)?;

        self.write_attribute_header(StunAttributeType::ChannelNumber as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            let value_start = self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET;
            NetworkEndian::write_u16(&mut buffer[value_start..], channel_number);
            NetworkEndian::write_u16(&mut buffer[value_start + 2..], 0);
        }

        self.commit_attribute(StunAttributeType::ChannelNumber as u16, value_length);
        Ok(())
    }

    /// Appends a MAPPED-ADDRESS attribute.
    pub fn add_attribute_mapped_address(&mut self, address: &SocketAddr) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::MappedAddress)
    }

    /// Appends a RESPONSE-ADDRESS attribute.
    pub fn add_attribute_response_address(
        &mut self,
        address: &SocketAddr,
    ) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::ResponseAddress)
    }

    /// Appends a SOURCE-ADDRESS attribute.
    pub fn add_attribute_source_address(&mut self, address: &SocketAddr) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::SourceAddress)
    }

    /// Appends a CHANGED-ADDRESS attribute.
    pub fn add_attribute_changed_address(&mut self, address: &SocketAddr) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::ChangedAddress)
    }

    /// Appends a REFLECTED-FROM attribute.
    pub fn add_attribute_reflected_from(&mut self, address: &SocketAddr) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::ReflectedFrom)
    }

    /// Appends an XOR-MAPPED-ADDRESS attribute.
    pub fn add_attribute_xor_mapped_address(
        &mut self,
        address: &SocketAddr,
    ) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::XorMappedAddress)
    }

    /// Appends an XOR-PEER-ADDRESS attribute.
    pub fn add_attribute_xor_peer_address(
        &mut self,
        address: &SocketAddr,
    ) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::XorPeerAddress)
    }

    /// Appends an XOR-RELAYED-ADDRESS attribute.
    pub fn add_attribute_xor_relayed_address(
        &mut self,
        address: &SocketAddr,
    ) -> Result<(), StunError> {
        self.add_attribute_address(address, StunAttributeType::XorRelayedAddress)
    }

    /// Appends an address attribute of the given type. For the XOR variants
    /// the obfuscation is applied to a local copy; the caller's address is
    /// never mutated.
    pub fn add_attribute_address(
        &mut self,
        address: &SocketAddr,
        attribute_type: StunAttributeType,
    ) -> Result<(), StunError> {
        if !attribute_type.is_address() {
            return Err(StunError::BadParam);
        }

        let value_length = address::address_value_size(address);
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + value_length)?;
        self.order.check(attribute_type as u16)?;

        self.write_attribute_header(attribute_type as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            // The IPv6 obfuscation keys on the transaction id already written
            // into the header of the message under construction.
            let mut transaction_id = [0u8; STUN_TRANSACTION_ID_SIZE];
            transaction_id
                .copy_from_slice(&buffer[STUN_TRANSACTION_ID_OFFSET..STUN_HEADER_SIZE]);

            let value_start = self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET;
            address::write_address_value(
                &mut buffer[value_start..value_start + value_length],
                address,
                &transaction_id,
                attribute_type.is_xor_address(),
            );
        }

        self.commit_attribute(attribute_type as u16, value_length);
        Ok(())
    }

    /// Patches the header length field to the value the message will have
    /// once a MESSAGE-INTEGRITY attribute is appended and returns the byte
    /// range `[0, idx)` an external HMAC-SHA1 must cover. `None` when
    /// sizing. The cursor is left unchanged; the caller still appends the
    /// attribute itself afterwards.
    pub fn integrity_buffer(&mut self) -> Option<&[u8]> {
        self.patched_buffer(STUN_INTEGRITY_ATTR_SIZE)
    }

    /// Patches the header length field to the value the message will have
    /// once a FINGERPRINT attribute is appended and returns the byte range
    /// an external CRC-32 must cover. `None` when sizing.
    pub fn fingerprint_buffer(&mut self) -> Option<&[u8]> {
        self.patched_buffer(STUN_FINGERPRINT_ATTR_SIZE)
    }

    /// Patches the 16-bit length field to the final attribute-section length
    /// and returns the total serialized size. In sizing mode nothing is
    /// written and the would-be size is returned.
    pub fn finalize(mut self) -> usize {
        let length = self.current_index;
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            NetworkEndian::write_u16(
                &mut buffer[STUN_MESSAGE_LENGTH_OFFSET..],
                (length - STUN_HEADER_SIZE) as u16,
            );
        }

        length
    }

    fn patched_buffer(&mut self, trailing_attribute_size: usize) -> Option<&[u8]> {
        let current_index = self.current_index;
        match &mut self.buffer {
            MessageBuffer::Writer(buffer) => {
                NetworkEndian::write_u16(
                    &mut buffer[STUN_MESSAGE_LENGTH_OFFSET..],
                    (current_index - STUN_HEADER_SIZE + trailing_attribute_size) as u16,
                );
                Some(&buffer[..current_index])
            }
            MessageBuffer::Sizing => None,
        }
    }

    fn add_attribute_u32(
        &mut self,
        attribute_type: StunAttributeType,
        value: u32,
    ) -> Result<(), StunError> {
        let value_length = 4;
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + value_length)?;
        self.order.check(attribute_type as u16)?;

        self.write_attribute_header(attribute_type as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            NetworkEndian::write_u32(
                &mut buffer[self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET..],
                value,
            );
        }

        self.commit_attribute(attribute_type as u16, value_length);
        Ok(())
    }

    fn add_attribute_u64(
        &mut self,
        attribute_type: StunAttributeType,
        value: u64,
    ) -> Result<(), StunError> {
        let value_length = 8;
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + value_length)?;
        self.order.check(attribute_type as u16)?;

        self.write_attribute_header(attribute_type as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            NetworkEndian::write_u64(
                &mut buffer[self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET..],
                value,
            );
        }

        self.commit_attribute(attribute_type as u16, value_length);
        Ok(())
    }

    fn add_attribute_buffer(
        &mut self,
        attribute_type: StunAttributeType,
        value: &[u8],
    ) -> Result<(), StunError> {
        if value.is_empty() || value.len() > u16::max_value() as usize {
            return Err(StunError::BadParam);
        }

        let value_length = value.len();
        let padded_length = align_to_word(value_length);
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE + padded_length)?;
        self.order.check(attribute_type as u16)?;

        self.write_attribute_header(attribute_type as u16, value_length as u16);
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            let value_start = self.current_index + STUN_ATTRIBUTE_VALUE_OFFSET;
            buffer[value_start..value_start + value_length].copy_from_slice(value);
            zero_fill(&mut buffer[value_start + value_length..value_start + padded_length]);
        }

        self.commit_attribute(attribute_type as u16, padded_length);
        Ok(())
    }

    fn add_attribute_type_only(
        &mut self,
        attribute_type: StunAttributeType,
    ) -> Result<(), StunError> {
        self.ensure_capacity(STUN_ATTRIBUTE_HEADER_SIZE)?;
        self.order.check(attribute_type as u16)?;

        self.write_attribute_header(attribute_type as u16, 0);
        self.commit_attribute(attribute_type as u16, 0);
        Ok(())
    }

    /// Writes the attribute type and unpadded value length at the cursor.
    fn write_attribute_header(&mut self, attribute_type: u16, value_length: u16) {
        if let MessageBuffer::Writer(buffer) = &mut self.buffer {
            NetworkEndian::write_u16(&mut buffer[self.current_index..], attribute_type);
            NetworkEndian::write_u16(
                &mut buffer[self.current_index + STUN_ATTRIBUTE_LENGTH_OFFSET..],
                value_length,
            );
        }
    }

    /// Success path of an attribute add: records the ordering flags and
    /// advances the cursor past the padded value.
    fn commit_attribute(&mut self, attribute_type: u16, padded_value_length: usize) {
        self.order.update(attribute_type);
        self.current_index += STUN_ATTRIBUTE_HEADER_SIZE + padded_value_length;
    }

    fn ensure_capacity(&self, required: usize) -> Result<(), StunError> {
        match &self.buffer {
            MessageBuffer::Writer(buffer) if buffer.len() - self.current_index < required => {
                Err(StunError::OutOfMemory)
            }
            _ => Ok(()),
        }
    }
}

fn zero_fill(padding: &mut [u8]) {
    for byte in padding {
        *byte = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::StunMessageType;

    const TRANSACTION_ID: [u8; 12] = [
        0x11, 0x12, 0x13, 0x14, 0x15, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11,
    ];

    fn header() -> StunHeader<'static> {
        StunHeader::new(StunMessageType::BindingRequest, &TRANSACTION_ID)
    }

    #[test]
    fn minimal_binding_request() {
        let mut buffer = [0u8; 32];
        let serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        let length = serializer.finalize();

        assert_eq!(length, 20);
        assert_eq!(
            &buffer[..20],
            &[
                0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x11, 0x12, 0x13, 0x14, 0x15,
                0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11,
            ]
        );
    }

    #[test]
    fn priority_and_username() {
        let mut buffer = [0u8; 64];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_priority(42).unwrap();
        serializer.add_attribute_username(b"guest").unwrap();
        let length = serializer.finalize();

        assert_eq!(length, 40);
        // Header length field covers both attributes.
        assert_eq!(&buffer[2..4], &[0x00, 0x14]);
        assert_eq!(
            &buffer[20..28],
            &[0x00, 0x24, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2a]
        );
        assert_eq!(
            &buffer[28..40],
            &[0x00, 0x06, 0x00, 0x05, 0x67, 0x75, 0x65, 0x73, 0x74, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn init_rejects_short_buffer() {
        let mut buffer = [0u8; 19];
        assert_eq!(
            StunSerializer::new(&header(), &mut buffer).unwrap_err(),
            StunError::BadParam
        );
    }

    #[test]
    fn rejects_empty_buffer_attribute() {
        let mut buffer = [0u8; 64];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        assert_eq!(
            serializer.add_attribute_username(b"").unwrap_err(),
            StunError::BadParam
        );
    }

    #[test]
    fn out_of_memory_leaves_cursor_unchanged() {
        let mut buffer = [0u8; 24];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        assert_eq!(
            serializer.add_attribute_username(b"guest").unwrap_err(),
            StunError::OutOfMemory
        );
        assert_eq!(serializer.serialized_length(), 20);
    }

    #[test]
    fn order_violation_leaves_cursor_unchanged() {
        let mut buffer = [0u8; 64];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_fingerprint(0xdeadbeef).unwrap();

        let index = serializer.serialized_length();
        assert_eq!(
            serializer.add_attribute_priority(1).unwrap_err(),
            StunError::InvalidAttributeOrder
        );
        assert_eq!(serializer.serialized_length(), index);
    }

    #[test]
    fn only_fingerprint_may_follow_integrity() {
        let mut buffer = [0u8; 128];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_integrity(&[0u8; 20]).unwrap();

        assert_eq!(
            serializer.add_attribute_priority(1).unwrap_err(),
            StunError::InvalidAttributeOrder
        );
        serializer.add_attribute_fingerprint(0).unwrap();
    }

    #[test]
    fn sizing_matches_buffered_length() {
        let address: SocketAddr = "192.168.0.107:56748".parse().unwrap();

        let mut sizer = StunSerializer::sizing(&header());
        sizer.add_attribute_priority(42).unwrap();
        sizer.add_attribute_username(b"guest").unwrap();
        sizer.add_attribute_xor_mapped_address(&address).unwrap();
        sizer.add_attribute_error_code(401, b"Unauthorized").unwrap();
        let sized = sizer.finalize();

        let mut buffer = [0u8; 256];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_priority(42).unwrap();
        serializer.add_attribute_username(b"guest").unwrap();
        serializer.add_attribute_xor_mapped_address(&address).unwrap();
        serializer
            .add_attribute_error_code(401, b"Unauthorized")
            .unwrap();
        let written = serializer.finalize();

        assert_eq!(sized, written);
    }

    #[test]
    fn sizing_enforces_ordering() {
        let mut sizer = StunSerializer::sizing(&header());
        sizer.add_attribute_fingerprint(0).unwrap();
        assert_eq!(
            sizer.add_attribute_priority(1).unwrap_err(),
            StunError::InvalidAttributeOrder
        );
    }

    #[test]
    fn integrity_buffer_patches_future_length() {
        let mut buffer = [0u8; 128];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_username(b"guest").unwrap();

        let covered = serializer.integrity_buffer().unwrap();
        assert_eq!(covered.len(), 32);
        // idx - 20 + 24: the length once MESSAGE-INTEGRITY lands.
        assert_eq!(&covered[2..4], &[0x00, 0x24]);

        serializer.add_attribute_integrity(&[0u8; 20]).unwrap();
        let covered = serializer.fingerprint_buffer().unwrap();
        assert_eq!(covered.len(), 56);
        // idx - 20 + 8: the length once FINGERPRINT lands.
        assert_eq!(&covered[2..4], &[0x00, 0x2c]);
    }

    #[test]
    fn type_only_attributes() {
        let mut buffer = [0u8; 32];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_use_candidate().unwrap();
        serializer.add_attribute_dont_fragment().unwrap();
        let length = serializer.finalize();

        assert_eq!(length, 28);
        assert_eq!(&buffer[20..24], &[0x00, 0x25, 0x00, 0x00]);
        assert_eq!(&buffer[24..28], &[0x00, 0x1a, 0x00, 0x00]);
    }

    #[test]
    fn error_code_encoding() {
        let mut buffer = [0u8; 64];
        let mut serializer = StunSerializer::new(&header(), &mut buffer).unwrap();
        serializer.add_attribute_error_code(438, b"Stale Nonce").unwrap();
        let length = serializer.finalize();

        // 4 attr header + 4 error header + 11 reason, padded to 12.
        assert_eq!(length, 20 + 4 + 16);
        assert_eq!(&buffer[20..24], &[0x00, 0x09, 0x00, 0x0f]);
        assert_eq!(&buffer[24..28], &[0x00, 0x00, 0x04, 0x26]);
        assert_eq!(&buffer[28..39], b"Stale Nonce");
        assert_eq!(buffer[39], 0);
    }
}
