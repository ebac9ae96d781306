use crate::keyring::jwk::{Algorithm, Curve};
use crate::x509::certificate::ObjectIdentifier;

pub const SHA256_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.11";
pub const SHA384_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.12";
pub const SHA512_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.13";
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
pub const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
pub const ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";

pub const SECP256R1: &str = "1.2.840.10045.3.1.7";
pub const SECP384R1: &str = "1.3.132.0.34";
pub const SECP521R1: &str = "1.3.132.0.35";

/// Maps a certificate signature algorithm onto a JWS `alg`.
pub fn signature_algorithm(oid: &ObjectIdentifier) -> Option<Algorithm> {
    match oid.value.as_str() {
        SHA256_WITH_RSA_ENCRYPTION => Some(Algorithm::Rs256),
        SHA384_WITH_RSA_ENCRYPTION => Some(Algorithm::Rs384),
        SHA512_WITH_RSA_ENCRYPTION => Some(Algorithm::Rs512),
        ECDSA_WITH_SHA256 => Some(Algorithm::Es256),
        ECDSA_WITH_SHA384 => Some(Algorithm::Es384),
        ECDSA_WITH_SHA512 => Some(Algorithm::Es512),
        _ => None,
    }
}

/// Maps a named curve onto a JWK `crv`.
pub fn named_curve(oid: &ObjectIdentifier) -> Option<Curve> {
    match oid.value.as_str() {
        SECP256R1 => Some(Curve::P256),
        SECP384R1 => Some(Curve::P384),
        SECP521R1 => Some(Curve::P521),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_supported_signature_algorithm() {
        let table = [
            (SHA256_WITH_RSA_ENCRYPTION, Algorithm::Rs256),
            (SHA384_WITH_RSA_ENCRYPTION, Algorithm::Rs384),
            (SHA512_WITH_RSA_ENCRYPTION, Algorithm::Rs512),
            (ECDSA_WITH_SHA256, Algorithm::Es256),
            (ECDSA_WITH_SHA384, Algorithm::Es384),
            (ECDSA_WITH_SHA512, Algorithm::Es512),
        ];
        for (oid, alg) in table {
            assert_eq!(signature_algorithm(&ObjectIdentifier::new(oid)), Some(alg));
        }
    }

    #[test]
    fn unknown_signature_algorithm_has_no_mapping() {
        // sha1WithRSAEncryption
        let oid = ObjectIdentifier::new("1.2.840.113549.1.1.5");
        assert_eq!(signature_algorithm(&oid), None);
    }

    #[test]
    fn maps_nist_curves() {
        assert_eq!(named_curve(&ObjectIdentifier::new(SECP256R1)), Some(Curve::P256));
        assert_eq!(named_curve(&ObjectIdentifier::new(SECP384R1)), Some(Curve::P384));
        assert_eq!(named_curve(&ObjectIdentifier::new(SECP521R1)), Some(Curve::P521));
        // secp256k1
        assert_eq!(named_curve(&ObjectIdentifier::new("1.3.132.0.10")), None);
    }
}
