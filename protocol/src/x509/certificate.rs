use std::fmt;

use crate::keyring::keypair::PublicKeyMaterial;

/// A dotted ASN.1 object identifier plus the name it is known by, if any.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    pub value: String,
    pub friendly_name: Option<String>,
}

impl ObjectIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        ObjectIdentifier {
            value: value.into(),
            friendly_name: None,
        }
    }

    pub fn with_friendly_name(value: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        ObjectIdentifier {
            value: value.into(),
            friendly_name: Some(friendly_name.into()),
        }
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friendly_name {
            Some(name) => write!(f, "{} - {}", self.value, name),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Everything the converter needs to know about one certificate.
///
/// Produced by a certificate loader; the converter never parses ASN.1
/// itself.
#[derive(Clone, Debug)]
pub struct CertificateDescriptor {
    /// Hex rendering of `hash`.
    pub thumbprint: String,
    /// SHA-1 over the DER encoding.
    pub hash: Vec<u8>,
    /// SHA-256 over the DER encoding, when the loader computed one.
    pub hash_sha256: Option<Vec<u8>>,
    pub raw_data: Vec<u8>,
    pub signature_algorithm: ObjectIdentifier,
    pub public_key: PublicKeyMaterial,
}
