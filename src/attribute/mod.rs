use byteorder::{ByteOrder, NetworkEndian};
use num_traits::FromPrimitive;

use crate::errors::StunError;

pub(crate) mod address;
mod types;

pub use types::{StunAttributeType, StunErrorCode};

/// [STUN message attribute](https://tools.ietf.org/html/rfc5389#section-15)
///
/// After the STUN header are zero or more attributes. Each attribute
/// MUST be TLV encoded, with a 16-bit type, 16-bit length, and value.
/// Each STUN attribute MUST end on a 32-bit boundary: the value in the
/// length field contains the length prior to padding, while the on-wire
/// occupation is the length rounded up to the next multiple of four.
///
/// This is the raw decoded view: the value borrows the message buffer it was
/// parsed from and must not outlive it. The typed `parse_*` accessors
/// interpret the value for the fixed-shape attributes; address attributes
/// are parsed through the deserializer, which holds the transaction id
/// needed for XOR de-obfuscation.
#[derive(Debug, Copy, Clone)]
pub struct StunAttribute<'a> {
    /// Attribute type code as read from the wire.
    pub attribute_type: u16,
    /// Attribute value bytes, `None` for type-only attributes.
    pub value: Option<&'a [u8]>,
}

impl<'a> StunAttribute<'a> {
    /// Length of the value prior to padding, as carried in the length field.
    pub fn value_length(&self) -> u16 {
        self.value.map_or(0, |value| value.len() as u16)
    }

    /// The attribute type as a known constant, when recognized.
    pub fn known_type(&self) -> Option<StunAttributeType> {
        FromPrimitive::from_u16(self.attribute_type)
    }

    /// Parses a PRIORITY attribute.
    pub fn parse_priority(&self) -> Result<u32, StunError> {
        self.parse_u32(StunAttributeType::Priority)
    }

    /// Parses a FINGERPRINT attribute. The CRC itself is not validated.
    pub fn parse_fingerprint(&self) -> Result<u32, StunError> {
        self.parse_u32(StunAttributeType::Fingerprint)
    }

    /// Parses a LIFETIME attribute.
    pub fn parse_lifetime(&self) -> Result<u32, StunError> {
        self.parse_u32(StunAttributeType::Lifetime)
    }

    /// Parses a CHANGE-REQUEST attribute.
    pub fn parse_change_request(&self) -> Result<u32, StunError> {
        self.parse_u32(StunAttributeType::ChangeRequest)
    }

    /// Parses an ICE-CONTROLLED tie-breaker.
    pub fn parse_ice_controlled(&self) -> Result<u64, StunError> {
        self.parse_u64(StunAttributeType::IceControlled)
    }

    /// Parses an ICE-CONTROLLING tie-breaker.
    pub fn parse_ice_controlling(&self) -> Result<u64, StunError> {
        self.parse_u64(StunAttributeType::IceControlling)
    }

    /// Parses a CHANNEL-NUMBER attribute, dropping the reserved half-word.
    pub fn parse_channel_number(&self) -> Result<u16, StunError> {
        let value = self.expect_value(StunAttributeType::ChannelNumber)?;
        if value.len() != 4 {
            return Err(StunError::InvalidAttributeLength);
        }

        Ok(NetworkEndian::read_u16(value))
    }

    /// Parses an ERROR-CODE attribute into the combined error code
    /// (class * 100 + number) and the borrowed reason phrase.
    pub fn parse_error_code(&self) -> Result<(u16, &'a [u8]), StunError> {
        let value = self.expect_value(StunAttributeType::ErrorCode)?;
        if value.len() <= 4 {
            return Err(StunError::InvalidAttributeLength);
        }

        let error_code = u16::from(value[2]) * 100 + u16::from(value[3]);
        Ok((error_code, &value[4..]))
    }

    fn parse_u32(&self, attribute_type: StunAttributeType) -> Result<u32, StunError> {
        let value = self.expect_value(attribute_type)?;
        if value.len() != 4 {
            return Err(StunError::InvalidAttributeLength);
        }

        Ok(NetworkEndian::read_u32(value))
    }

    fn parse_u64(&self, attribute_type: StunAttributeType) -> Result<u64, StunError> {
        let value = self.expect_value(attribute_type)?;
        if value.len() != 8 {
            return Err(StunError::InvalidAttributeLength);
        }

        Ok(NetworkEndian::read_u64(value))
    }

    fn expect_value(&self, attribute_type: StunAttributeType) -> Result<&'a [u8], StunError> {
        if self.attribute_type != attribute_type as u16 {
            return Err(StunError::BadParam);
        }

        self.value.ok_or(StunError::BadParam)
    }
}

/// Tracks the attribute ordering rules shared by serialization and
/// deserialization: FINGERPRINT must be the last attribute, and nothing but
/// FINGERPRINT may follow MESSAGE-INTEGRITY.
///
/// The flags are monotone; `check` must pass before any bytes are written or
/// consumed, and `update` runs only on the success path so a failed
/// operation leaves the context untouched.
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct AttributeOrder {
    integrity_seen: bool,
    fingerprint_seen: bool,
}

impl AttributeOrder {
    pub(crate) fn check(&self, attribute_type: u16) -> Result<(), StunError> {
        if self.fingerprint_seen {
            return Err(StunError::InvalidAttributeOrder);
        }

        if self.integrity_seen && attribute_type != StunAttributeType::Fingerprint as u16 {
            return Err(StunError::InvalidAttributeOrder);
        }

        Ok(())
    }

    pub(crate) fn update(&mut self, attribute_type: u16) {
        if attribute_type == StunAttributeType::Fingerprint as u16 {
            self.fingerprint_seen = true;
        } else if attribute_type == StunAttributeType::MessageIntegrity as u16 {
            self.integrity_seen = true;
        }
    }
}
