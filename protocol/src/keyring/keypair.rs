use crate::x509::certificate::ObjectIdentifier;
use zeroize::{Zeroize, ZeroizeOnDrop};

// Key material handed over by the certificate loader. Every integer is the
// big-endian unsigned byte sequence, exactly as it will be base64url encoded.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicParameters {
    pub modulus: Vec<u8>,
    pub exponent: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcPublicParameters {
    pub curve: ObjectIdentifier,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    Rsa(RsaPublicParameters),
    Ec(EcPublicParameters),
    Unsupported { type_name: String },
}

impl PublicKeyMaterial {
    pub fn family(&self) -> &str {
        match self {
            PublicKeyMaterial::Rsa(_) => "RSA",
            PublicKeyMaterial::Ec(_) => "EC",
            PublicKeyMaterial::Unsupported { type_name } => type_name,
        }
    }
}

/// RSA private exponent plus the CRT parameters. `qi` is `q^-1 mod p`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateParameters {
    pub d: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub dp: Vec<u8>,
    pub dq: Vec<u8>,
    pub qi: Vec<u8>,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EcPrivateParameters {
    pub d: Vec<u8>,
}

#[derive(Clone)]
pub enum PrivateKeyMaterial {
    Rsa(RsaPrivateParameters),
    Ec(EcPrivateParameters),
}

impl PrivateKeyMaterial {
    pub fn family(&self) -> &'static str {
        match self {
            PrivateKeyMaterial::Rsa(_) => "RSA",
            PrivateKeyMaterial::Ec(_) => "EC",
        }
    }
}

impl std::fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // MEMO: never print the secret parameters.
        f.debug_tuple("PrivateKeyMaterial")
            .field(&self.family())
            .finish()
    }
}

/// A private key that may or may not hand out its raw parameters.
///
/// `None` means the key exists but is not exportable (unsupported
/// algorithm, non-standard prime layout, hardware backed, ...). It is never
/// used to report I/O or permission failures; those belong to whoever
/// loaded the key.
pub trait ExportPrivateKey {
    fn try_export_private_key(&self) -> Option<PrivateKeyMaterial>;
}

impl ExportPrivateKey for PrivateKeyMaterial {
    fn try_export_private_key(&self) -> Option<PrivateKeyMaterial> {
        Some(self.clone())
    }
}
