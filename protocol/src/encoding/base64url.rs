// base64url: RFC4648 §5. JWKのバイナリ値はすべてパディングなしで表現する
// https://www.rfc-editor.org/rfc/rfc4648#section-5

use data_encoding::{BASE64, BASE64URL_NOPAD};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("illegal base64url string: length {0} leaves a single dangling character")]
    IllegalLength(usize),
    #[error("DecodeError: {0}")]
    DecodeError(#[from] data_encoding::DecodeError),
}

/// Encodes `bytes` with the URL-safe alphabet and strips all `=` padding.
pub fn encode(bytes: &[u8]) -> String {
    BASE64URL_NOPAD.encode(bytes)
}

/// Decodes an unpadded base64url string.
///
/// The input is mapped back onto the standard alphabet and re-padded from
/// `len % 4` before standard decoding. A remainder of 1 can never come from
/// an encoder and is rejected up front.
pub fn decode(input: &str) -> Result<Vec<u8>, FormatError> {
    let mut standard: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    match standard.len() % 4 {
        0 => {}
        2 => standard.push_str("=="),
        3 => standard.push('='),
        _ => return Err(FormatError::IllegalLength(input.len())),
    }

    Ok(BASE64.decode(standard.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_rfc4648_vectors_without_padding() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "Zg");
        assert_eq!(encode(b"fo"), "Zm8");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(b"foob"), "Zm9vYg");
        assert_eq!(encode(b"fooba"), "Zm9vYmE");
        assert_eq!(encode(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn substitutes_url_safe_characters() {
        // 0xfb 0xff -> "+/8=" in the standard alphabet
        assert_eq!(encode(&[0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn decodes_every_valid_remainder() {
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(decode("Zg").unwrap(), b"f");
        assert_eq!(decode("Zm8").unwrap(), b"fo");
        assert_eq!(decode("Zm9v").unwrap(), b"foo");
        assert_eq!(decode("AQAB").unwrap(), vec![0x01, 0x00, 0x01]);
    }

    #[test]
    fn rejects_length_with_remainder_one() {
        assert_eq!(decode("Zm9vY"), Err(FormatError::IllegalLength(5)));
        assert_eq!(decode("A"), Err(FormatError::IllegalLength(1)));
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(matches!(decode("Zm9v!A"), Err(FormatError::DecodeError(_))));
        assert!(matches!(decode("Zm 9"), Err(FormatError::DecodeError(_))));
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let encoded = encode(&bytes);
            prop_assert!(!encoded.contains(|c: char| matches!(c, '=' | '+' | '/')));
            prop_assert_eq!(encoded.len(), (bytes.len() * 4 + 2) / 3);
            prop_assert_eq!(decode(&encoded).unwrap(), bytes);
        }
    }
}
