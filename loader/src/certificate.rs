use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
};
use const_oid::db::DB;
use der::{Decode, Encode};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::DecodePublicKey;
use protocol::keyring::keypair::{EcPublicParameters, PublicKeyMaterial, RsaPublicParameters};
use protocol::x509::certificate::{CertificateDescriptor, ObjectIdentifier};
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::Certificate;

use crate::error::LoaderError;

/// A parsed X.509 certificate together with the exact DER it was read from.
pub struct LoadedCertificate {
    certificate: Certificate,
    der: Vec<u8>,
}

impl LoadedCertificate {
    pub fn from_der(der: Vec<u8>) -> Result<Self, LoaderError> {
        let certificate = Certificate::from_der(&der)?;
        Ok(LoadedCertificate { certificate, der })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn subject(&self) -> String {
        self.certificate.tbs_certificate.subject.to_string()
    }

    /// Hashes are taken over the DER as read, never over a re-encoding.
    pub fn descriptor(&self) -> Result<CertificateDescriptor, LoaderError> {
        let der = self.der();
        let hash = Sha1::digest(der).to_vec();
        let hash_sha256 = Sha256::digest(der).to_vec();

        Ok(CertificateDescriptor {
            thumbprint: hex::encode_upper(&hash),
            hash,
            hash_sha256: Some(hash_sha256),
            raw_data: der.to_vec(),
            signature_algorithm: object_identifier(&self.certificate.signature_algorithm.oid),
            public_key: public_key_material(
                &self.certificate.tbs_certificate.subject_public_key_info,
            )?,
        })
    }
}

impl std::fmt::Debug for LoadedCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedCertificate")
            .field("subject", &self.subject())
            .finish()
    }
}

pub(crate) fn object_identifier(oid: &const_oid::ObjectIdentifier) -> ObjectIdentifier {
    match DB.by_oid(oid) {
        Some(name) => ObjectIdentifier::with_friendly_name(oid.to_string(), name),
        None => ObjectIdentifier::new(oid.to_string()),
    }
}

pub(crate) fn describe_oid(oid: &const_oid::ObjectIdentifier) -> String {
    object_identifier(oid).to_string()
}

fn key_error(e: impl std::fmt::Display) -> LoaderError {
    LoaderError::Key(e.to_string())
}

fn public_key_material(spki: &SubjectPublicKeyInfoOwned) -> Result<PublicKeyMaterial, LoaderError> {
    let algorithm = spki.algorithm.oid;

    if algorithm == RSA_ENCRYPTION {
        let key = RsaPublicKey::from_public_key_der(&spki.to_der()?).map_err(key_error)?;
        return Ok(PublicKeyMaterial::Rsa(RsaPublicParameters {
            modulus: key.n().to_bytes_be(),
            exponent: key.e().to_bytes_be(),
        }));
    }

    if algorithm == ID_EC_PUBLIC_KEY {
        let parameters = spki
            .algorithm
            .parameters
            .as_ref()
            .ok_or_else(|| LoaderError::Key("EC public key without named curve".to_string()))?;
        let curve = const_oid::ObjectIdentifier::from_der(&parameters.to_der()?)?;
        let point = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| LoaderError::Key("EC public key has unused bits".to_string()))?;
        let (x, y) = ec_coordinates(&curve, point)?;
        return Ok(PublicKeyMaterial::Ec(EcPublicParameters {
            curve: object_identifier(&curve),
            x,
            y,
        }));
    }

    Ok(PublicKeyMaterial::Unsupported {
        type_name: describe_oid(&algorithm),
    })
}

/// Splits a SEC1 point into affine coordinates. Points on the NIST curves are
/// decompressed first; any other curve keeps the point as found, since the
/// converter rejects it anyway.
fn ec_coordinates(
    curve: &const_oid::ObjectIdentifier,
    point: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), LoaderError> {
    let uncompressed = if *curve == SECP_256_R_1 {
        p256::PublicKey::from_sec1_bytes(point)
            .map(|key| key.to_encoded_point(false).as_bytes().to_vec())
    } else if *curve == SECP_384_R_1 {
        p384::PublicKey::from_sec1_bytes(point)
            .map(|key| key.to_encoded_point(false).as_bytes().to_vec())
    } else if *curve == SECP_521_R_1 {
        p521::PublicKey::from_sec1_bytes(point)
            .map(|key| key.to_encoded_point(false).as_bytes().to_vec())
    } else {
        Ok(point.to_vec())
    };
    let uncompressed = uncompressed.map_err(key_error)?;

    match uncompressed.split_first() {
        Some((&0x04, coordinates)) if coordinates.len() % 2 == 0 => {
            let (x, y) = coordinates.split_at(coordinates.len() / 2);
            Ok((x.to_vec(), y.to_vec()))
        }
        Some((_, coordinates)) => Ok((coordinates.to_vec(), Vec::new())),
        None => Err(LoaderError::Key("empty EC point".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_hashes_the_der_as_read() {
        let der = include_bytes!("../tests/fixtures/rsa2048.cer").to_vec();
        let certificate = LoadedCertificate::from_der(der.clone()).unwrap();
        let descriptor = certificate.descriptor().unwrap();

        assert_eq!(certificate.der(), der.as_slice());
        assert_eq!(descriptor.raw_data, der);
        assert_eq!(descriptor.hash, Sha1::digest(&der).to_vec());
        assert_eq!(descriptor.hash_sha256, Some(Sha256::digest(&der).to_vec()));
        assert_eq!(descriptor.thumbprint, "4480C201410850BBB87C1238EBB306EDE21F8D16");
    }

    #[test]
    fn names_known_object_identifiers() {
        let oid = object_identifier(&RSA_ENCRYPTION);
        assert_eq!(oid.value, "1.2.840.113549.1.1.1");
        assert!(oid.friendly_name.is_some());
    }

    #[test]
    fn splits_uncompressed_point_of_unknown_curve() {
        let curve = const_oid::ObjectIdentifier::new_unwrap("1.3.132.0.10");
        let mut point = vec![0x04];
        point.extend_from_slice(&[0xaa; 32]);
        point.extend_from_slice(&[0xbb; 32]);

        let (x, y) = ec_coordinates(&curve, &point).unwrap();
        assert_eq!(x, vec![0xaa; 32]);
        assert_eq!(y, vec![0xbb; 32]);
    }

    #[test]
    fn rejects_invalid_point_on_known_curve() {
        let err = ec_coordinates(&SECP_256_R_1, &[0x04, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, LoaderError::Key(_)));
    }
}
