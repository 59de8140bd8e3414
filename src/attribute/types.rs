use num_derive::FromPrimitive;

/// Readable representation of STUN attribute type codes.
///
/// Attributes with type values between 0x0000 and 0x7FFF are
/// comprehension-required, those between 0x8000 and 0xFFFF are
/// comprehension-optional. The registry below covers the STUN base set plus
/// the TURN relay and ICE connectivity-check extensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum StunAttributeType {
    MappedAddress = 0x0001,
    ResponseAddress = 0x0002,
    ChangeRequest = 0x0003,
    SourceAddress = 0x0004,
    ChangedAddress = 0x0005,
    Username = 0x0006,
    Password = 0x0007,
    MessageIntegrity = 0x0008,
    ErrorCode = 0x0009,
    UnknownAttributes = 0x000a,
    ReflectedFrom = 0x000b,
    ChannelNumber = 0x000c,
    Lifetime = 0x000d,
    XorPeerAddress = 0x0012,
    Data = 0x0013,
    Realm = 0x0014,
    Nonce = 0x0015,
    XorRelayedAddress = 0x0016,
    EvenPort = 0x0018,
    RequestedTransport = 0x0019,
    DontFragment = 0x001a,
    XorMappedAddress = 0x0020,
    ReservationToken = 0x0022,
    Priority = 0x0024,
    UseCandidate = 0x0025,
    Fingerprint = 0x8028,
    IceControlled = 0x8029,
    IceControlling = 0x802a,
}

/// Error code values carried by the ERROR-CODE attribute, with their
/// recommended reason phrases.
///
/// The combined code encodes as class (hundreds digit) and number (code
/// modulo 100) on the wire; pair these with
/// [`add_attribute_error_code`](crate::StunSerializer::add_attribute_error_code)
/// and [`parse_error_code`](crate::StunAttribute::parse_error_code).
/// `Success` is the no-error sentinel and never appears on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum StunErrorCode {
    Success = 0,
    Unauthorized = 401,
    StaleNonce = 438,
}

impl StunErrorCode {
    /// The recommended reason phrase for this error code.
    pub fn reason_phrase(self) -> &'static str {
        match self {
            StunErrorCode::Success => "Success",
            StunErrorCode::Unauthorized => "Unauthorized",
            StunErrorCode::StaleNonce => "Stale Nonce",
        }
    }
}

impl StunAttributeType {
    /// Whether the attribute carries an address value.
    pub(crate) fn is_address(self) -> bool {
        matches!(
            self,
            StunAttributeType::MappedAddress
                | StunAttributeType::ResponseAddress
                | StunAttributeType::SourceAddress
                | StunAttributeType::ChangedAddress
                | StunAttributeType::ReflectedFrom
                | StunAttributeType::XorPeerAddress
                | StunAttributeType::XorRelayedAddress
                | StunAttributeType::XorMappedAddress
        )
    }

    /// Whether the attribute's address value is XOR-obfuscated on the wire.
    pub(crate) fn is_xor_address(self) -> bool {
        matches!(
            self,
            StunAttributeType::XorPeerAddress
                | StunAttributeType::XorRelayedAddress
                | StunAttributeType::XorMappedAddress
        )
    }
}
