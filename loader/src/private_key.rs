use std::fmt;

use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
};
use der::Decode;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{DecodePrivateKey, EncryptedPrivateKeyInfo, PrivateKeyInfo};
use protocol::keyring::keypair::{
    EcPrivateParameters, EcPublicParameters, ExportPrivateKey, PrivateKeyMaterial, PublicKeyMaterial,
    RsaPrivateParameters,
};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey};

use crate::certificate::describe_oid;
use crate::error::LoaderError;

pub const PRIVATE_KEY_LABELS: [&str; 4] = [
    "PRIVATE KEY",
    "ENCRYPTED PRIVATE KEY",
    "RSA PRIVATE KEY",
    "EC PRIVATE KEY",
];

pub fn is_private_key_label(label: &str) -> bool {
    PRIVATE_KEY_LABELS.contains(&label)
}

/// A decoded private key, kept in its native form until export.
pub enum LoadedPrivateKey {
    Rsa(RsaPrivateKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
    /// Parsed fine, but the algorithm has no JWK rendering here.
    NotExportable { algorithm: String },
}

impl fmt::Debug for LoadedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadedPrivateKey::Rsa(_) => f.write_str("LoadedPrivateKey::Rsa"),
            LoadedPrivateKey::P256(_) => f.write_str("LoadedPrivateKey::P256"),
            LoadedPrivateKey::P384(_) => f.write_str("LoadedPrivateKey::P384"),
            LoadedPrivateKey::P521(_) => f.write_str("LoadedPrivateKey::P521"),
            LoadedPrivateKey::NotExportable { algorithm } => f
                .debug_struct("LoadedPrivateKey::NotExportable")
                .field("algorithm", algorithm)
                .finish(),
        }
    }
}

fn key_error(e: impl fmt::Display) -> LoaderError {
    LoaderError::Key(e.to_string())
}

impl LoadedPrivateKey {
    pub fn from_pem_block(
        label: &str,
        der: &[u8],
        password: Option<&str>,
    ) -> Result<Self, LoaderError> {
        match label {
            "PRIVATE KEY" => Self::from_pkcs8_der(der),
            "ENCRYPTED PRIVATE KEY" => Self::from_encrypted_pkcs8_der(der, password),
            "RSA PRIVATE KEY" => Ok(LoadedPrivateKey::Rsa(
                RsaPrivateKey::from_pkcs1_der(der).map_err(key_error)?,
            )),
            "EC PRIVATE KEY" => Self::from_sec1_der(der),
            other => Err(LoaderError::UnsupportedLabel(other.to_string())),
        }
    }

    /// Raw DER has no label, so try the encodings from most to least common.
    pub fn from_der(der: &[u8], password: Option<&str>) -> Result<Self, LoaderError> {
        if PrivateKeyInfo::from_der(der).is_ok() {
            return Self::from_pkcs8_der(der);
        }
        if EncryptedPrivateKeyInfo::from_der(der).is_ok() {
            return Self::from_encrypted_pkcs8_der(der, password);
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs1_der(der) {
            return Ok(LoadedPrivateKey::Rsa(key));
        }
        Self::from_sec1_der(der)
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, LoaderError> {
        let info = PrivateKeyInfo::from_der(der)?;
        let algorithm = info.algorithm.oid;

        if algorithm == RSA_ENCRYPTION {
            let key = RsaPrivateKey::from_pkcs8_der(der).map_err(key_error)?;
            return Ok(LoadedPrivateKey::Rsa(key));
        }
        if algorithm == ID_EC_PUBLIC_KEY {
            let curve = info.algorithm.parameters_oid().map_err(key_error)?;
            if curve == SECP_256_R_1 {
                return Ok(LoadedPrivateKey::P256(
                    p256::SecretKey::from_pkcs8_der(der).map_err(key_error)?,
                ));
            }
            if curve == SECP_384_R_1 {
                return Ok(LoadedPrivateKey::P384(
                    p384::SecretKey::from_pkcs8_der(der).map_err(key_error)?,
                ));
            }
            if curve == SECP_521_R_1 {
                return Ok(LoadedPrivateKey::P521(
                    p521::SecretKey::from_pkcs8_der(der).map_err(key_error)?,
                ));
            }
            return Ok(LoadedPrivateKey::NotExportable {
                algorithm: format!("EC {}", describe_oid(&curve)),
            });
        }

        Ok(LoadedPrivateKey::NotExportable {
            algorithm: describe_oid(&algorithm),
        })
    }

    pub fn from_encrypted_pkcs8_der(der: &[u8], password: Option<&str>) -> Result<Self, LoaderError> {
        let info = EncryptedPrivateKeyInfo::from_der(der)?;
        let password = password.ok_or(LoaderError::PasswordRequired)?;
        let document = info.decrypt(password)?;
        Self::from_pkcs8_der(document.as_bytes())
    }

    pub fn from_sec1_der(der: &[u8]) -> Result<Self, LoaderError> {
        if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
            return Ok(LoadedPrivateKey::P256(key));
        }
        if let Ok(key) = p384::SecretKey::from_sec1_der(der) {
            return Ok(LoadedPrivateKey::P384(key));
        }
        if let Ok(key) = p521::SecretKey::from_sec1_der(der) {
            return Ok(LoadedPrivateKey::P521(key));
        }
        Err(LoaderError::Key(
            "not a P-256, P-384 or P-521 SEC1 private key".to_string(),
        ))
    }

    /// Whether this key is the private half of `public_key`. Keys that cannot
    /// be exported cannot be compared either and are assumed to match.
    pub fn matches(&self, public_key: &PublicKeyMaterial) -> bool {
        match (self, public_key) {
            (LoadedPrivateKey::Rsa(key), PublicKeyMaterial::Rsa(public)) => {
                key.n().to_bytes_be() == public.modulus && key.e().to_bytes_be() == public.exponent
            }
            (LoadedPrivateKey::P256(key), PublicKeyMaterial::Ec(public)) => {
                let point = key.public_key().to_encoded_point(false);
                coordinates_match(point.x().map(|x| x.as_slice()), point.y().map(|y| y.as_slice()), public)
            }
            (LoadedPrivateKey::P384(key), PublicKeyMaterial::Ec(public)) => {
                let point = key.public_key().to_encoded_point(false);
                coordinates_match(point.x().map(|x| x.as_slice()), point.y().map(|y| y.as_slice()), public)
            }
            (LoadedPrivateKey::P521(key), PublicKeyMaterial::Ec(public)) => {
                let point = key.public_key().to_encoded_point(false);
                coordinates_match(point.x().map(|x| x.as_slice()), point.y().map(|y| y.as_slice()), public)
            }
            (LoadedPrivateKey::NotExportable { .. }, _) => true,
            _ => false,
        }
    }
}

fn coordinates_match(
    x: Option<&[u8]>,
    y: Option<&[u8]>,
    public: &EcPublicParameters,
) -> bool {
    x == Some(public.x.as_slice()) && y == Some(public.y.as_slice())
}

impl ExportPrivateKey for LoadedPrivateKey {
    fn try_export_private_key(&self) -> Option<PrivateKeyMaterial> {
        match self {
            LoadedPrivateKey::Rsa(key) => export_rsa(key),
            LoadedPrivateKey::P256(key) => Some(ec_material(key.to_bytes().to_vec())),
            LoadedPrivateKey::P384(key) => Some(ec_material(key.to_bytes().to_vec())),
            LoadedPrivateKey::P521(key) => Some(ec_material(key.to_bytes().to_vec())),
            LoadedPrivateKey::NotExportable { algorithm } => {
                log::warn!(
                    "private key ({algorithm}) is present but not exportable, emitting public members only"
                );
                None
            }
        }
    }
}

fn ec_material(d: Vec<u8>) -> PrivateKeyMaterial {
    PrivateKeyMaterial::Ec(EcPrivateParameters { d })
}

fn export_rsa(key: &RsaPrivateKey) -> Option<PrivateKeyMaterial> {
    // JWK "oth" would be needed for more than two primes
    let [p, q] = key.primes() else {
        log::warn!(
            "RSA private key has {} primes and is not exportable, emitting public members only",
            key.primes().len()
        );
        return None;
    };
    let Some(qi) = key.crt_coefficient() else {
        log::warn!("RSA private key has no CRT coefficient, emitting public members only");
        return None;
    };
    let one = BigUint::from(1u8);
    let dp = key.d() % &(p - &one);
    let dq = key.d() % &(q - &one);

    Some(PrivateKeyMaterial::Rsa(RsaPrivateParameters {
        d: key.d().to_bytes_be(),
        p: p.to_bytes_be(),
        q: q.to_bytes_be(),
        dp: dp.to_bytes_be(),
        dq: dq.to_bytes_be(),
        qi: qi.to_bytes_be(),
    }))
}
