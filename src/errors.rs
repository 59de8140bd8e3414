use thiserror::Error;

/// Results surfaced by the serializer and deserializer.
///
/// Errors pass through to the caller unchanged; nothing is retried or logged
/// inside the codec. A failed operation never leaves the context partially
/// advanced.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StunError {
    /// The caller contract was violated: a value where none is allowed, a
    /// wrong attribute type handed to a typed parser, an invalid address
    /// family, or a buffer too small to hold a message header.
    #[error("Invalid argument.")]
    BadParam,
    /// Not enough room left in the serialization buffer, or a declared
    /// attribute value exceeds the remaining input during deserialization.
    #[error("Buffer too small for the requested operation.")]
    OutOfMemory,
    /// The magic cookie field doesn't match 0x2112A442. The byte sequence is
    /// likely not a STUN message.
    #[error("Magic cookie mismatch.")]
    MagicCookieMismatch,
    /// The length declared in the header disagrees with the buffer length.
    #[error("Declared message length disagrees with the buffer length.")]
    InvalidMessageLength,
    /// A typed parser saw the wrong value length for a fixed-size attribute.
    #[error("Unexpected value length for a fixed-size attribute.")]
    InvalidAttributeLength,
    /// An attribute violates the FINGERPRINT/MESSAGE-INTEGRITY terminality
    /// rule: FINGERPRINT must be last, and only FINGERPRINT may follow
    /// MESSAGE-INTEGRITY.
    #[error("Attribute violates the FINGERPRINT/MESSAGE-INTEGRITY ordering rule.")]
    InvalidAttributeOrder,
    /// Attribute iteration reached the end of the message. This is the
    /// normal stream-end signal, not a failure of the message.
    #[error("No more attributes left in the message.")]
    NoMoreAttributeFound,
    /// A targeted attribute search walked the whole message without a match.
    #[error("No attribute of the requested type found.")]
    NoAttributeFound,
}

/// Integrity key derivation errors.
#[derive(Error, Debug)]
pub enum IntegrityKeyGenerationError {
    /// SASLprep failure while processing a credential component.
    #[error("Failed to process a credential component via SASLprep.")]
    SaslPrepFailure(#[from] stringprep::Error),
}
