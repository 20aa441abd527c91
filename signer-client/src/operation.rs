//! Remote operations and their fixed wire shape.

use std::fmt;

/// Form field carrying the primary payload of every operation.
pub const DATA_FIELD: &str = "data";

/// Form field carrying the signature for [`Operation::CheckSign`].
pub const SIGNATURE_FIELD: &str = "sign";

/// Response body literal meaning a signature verified.
///
/// Any other body, including `"false"`, an empty body or `"TRUE"`, means
/// the signature did not verify.
pub const SIGNATURE_VALID: &str = "true";

/// One of the four operations exposed by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Encrypt plaintext server-side
    Encrypt,
    /// Decrypt ciphertext server-side
    Decrypt,
    /// Produce a detached signature
    Sign,
    /// Verify a detached signature
    CheckSign,
}

impl Operation {
    /// All operations, in wire-table order.
    pub const ALL: [Self; 4] = [Self::Encrypt, Self::Decrypt, Self::Sign, Self::CheckSign];

    /// Resource path appended to the base URL.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Encrypt => "/encrypt",
            Self::Decrypt => "/decrypt",
            Self::Sign => "/sign",
            Self::CheckSign => "/checkSign",
        }
    }

    /// Body fields the operation sends, in order.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Encrypt | Self::Decrypt | Self::Sign => &[DATA_FIELD],
            Self::CheckSign => &[DATA_FIELD, SIGNATURE_FIELD],
        }
    }

    /// Stable identifier used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::Sign => "sign",
            Self::CheckSign => "check_sign",
        }
    }

    /// Whether the response body is base64 bytes (as opposed to a verdict).
    #[must_use]
    pub const fn returns_bytes(self) -> bool {
        !matches!(self, Self::CheckSign)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources() {
        assert_eq!(Operation::Encrypt.resource(), "/encrypt");
        assert_eq!(Operation::Decrypt.resource(), "/decrypt");
        assert_eq!(Operation::Sign.resource(), "/sign");
        assert_eq!(Operation::CheckSign.resource(), "/checkSign");
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(Operation::Sign.required_fields(), &["data"]);
        assert_eq!(Operation::CheckSign.required_fields(), &["data", "sign"]);
    }

    #[test]
    fn test_only_check_sign_returns_verdict() {
        let verdicts: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| !op.returns_bytes())
            .collect();
        assert_eq!(verdicts, vec![Operation::CheckSign]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::CheckSign.to_string(), "check_sign");
    }
}
