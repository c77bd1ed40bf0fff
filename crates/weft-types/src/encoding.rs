//! Base64url helpers.
//!
//! The network encodes every identifier, hash and binary field as unpadded
//! base64url. Decoding is lenient about trailing `=` padding because some
//! clients emit it.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Unpadded base64url engine that accepts padded input on decode.
pub const B64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
pub fn to_b64url(bytes: &[u8]) -> String {
    B64URL.encode(bytes)
}

/// Decode a base64url string.
pub fn from_b64url(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    B64URL.decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_unpadded_url_safe() {
        let encoded = to_b64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(from_b64url("dGVzdA").expect("unpadded"), b"test");
        assert_eq!(from_b64url("dGVzdA==").expect("padded"), b"test");
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        assert!(from_b64url("+/8").is_err());
        assert!(from_b64url("not valid base64!!!").is_err());
    }
}
