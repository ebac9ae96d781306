use data_encoding::BASE64;
use thiserror::Error;

use crate::encoding::base64url;
use crate::keyring::jwk::{JsonWebKey, JwkHeader, KeyParameters, RsaPrivateFields};
use crate::keyring::keypair::{
    EcPublicParameters, ExportPrivateKey, PrivateKeyMaterial, PublicKeyMaterial,
    RsaPublicParameters,
};
use crate::x509::algorithms;
use crate::x509::certificate::{CertificateDescriptor, ObjectIdentifier};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsupportedKeyTypeError {
    #[error("key type: {type_name} not supported")]
    KeyType { type_name: String },
    #[error("unsupported curve type of {0}")]
    Curve(ObjectIdentifier),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error(transparent)]
    UnsupportedKeyType(#[from] UnsupportedKeyTypeError),
    #[error("unsupported algorithm of {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),
    #[error("private key type {private} does not match certificate key type {public}")]
    KeyMismatch { public: String, private: String },
}

/// Converts a certificate and, optionally, its exported private key into a
/// JWK. Either the whole key is produced or an error is returned.
pub fn convert(
    certificate: &CertificateDescriptor,
    private_key: Option<&PrivateKeyMaterial>,
) -> Result<JsonWebKey, ConvertError> {
    let parameters = key_parameters(&certificate.public_key, private_key)?;

    let alg = algorithms::signature_algorithm(&certificate.signature_algorithm)
        .ok_or_else(|| ConvertError::UnsupportedAlgorithm(certificate.signature_algorithm.clone()))?;

    let header = JwkHeader {
        kid: certificate.thumbprint.clone(),
        x5t: base64url::encode(&certificate.hash),
        x5t_s256: certificate.hash_sha256.as_deref().map(base64url::encode),
        x5c: vec![BASE64.encode(&certificate.raw_data)],
        alg,
    };

    Ok(JsonWebKey::new(header, parameters))
}

/// Like [`convert`], asking `private_key` for its parameters first. A key
/// that refuses to export is treated as absent.
pub fn convert_exporting(
    certificate: &CertificateDescriptor,
    private_key: &dyn ExportPrivateKey,
) -> Result<JsonWebKey, ConvertError> {
    let exported = private_key.try_export_private_key();
    convert(certificate, exported.as_ref())
}

fn key_parameters(
    public_key: &PublicKeyMaterial,
    private_key: Option<&PrivateKeyMaterial>,
) -> Result<KeyParameters, ConvertError> {
    match (public_key, private_key) {
        (PublicKeyMaterial::Rsa(public), None) => Ok(rsa_parameters(public, None)),
        (PublicKeyMaterial::Rsa(public), Some(PrivateKeyMaterial::Rsa(private))) => {
            Ok(rsa_parameters(
                public,
                Some(RsaPrivateFields {
                    d: base64url::encode(&private.d),
                    p: base64url::encode(&private.p),
                    q: base64url::encode(&private.q),
                    dp: base64url::encode(&private.dp),
                    dq: base64url::encode(&private.dq),
                    qi: base64url::encode(&private.qi),
                }),
            ))
        }
        (PublicKeyMaterial::Ec(public), None) => ec_parameters(public, None),
        (PublicKeyMaterial::Ec(public), Some(PrivateKeyMaterial::Ec(private))) => {
            ec_parameters(public, Some(base64url::encode(&private.d)))
        }
        (PublicKeyMaterial::Unsupported { type_name }, _) => {
            Err(UnsupportedKeyTypeError::KeyType {
                type_name: type_name.clone(),
            }
            .into())
        }
        (public, Some(private)) => Err(ConvertError::KeyMismatch {
            public: public.family().to_string(),
            private: private.family().to_string(),
        }),
    }
}

fn rsa_parameters(public: &RsaPublicParameters, private: Option<RsaPrivateFields>) -> KeyParameters {
    KeyParameters::Rsa {
        n: base64url::encode(&public.modulus),
        e: base64url::encode(&public.exponent),
        private,
    }
}

fn ec_parameters(
    public: &EcPublicParameters,
    d: Option<String>,
) -> Result<KeyParameters, ConvertError> {
    let crv = algorithms::named_curve(&public.curve)
        .ok_or_else(|| UnsupportedKeyTypeError::Curve(public.curve.clone()))?;
    Ok(KeyParameters::Ec {
        crv,
        x: base64url::encode(&public.x),
        y: base64url::encode(&public.y),
        d,
    })
}
