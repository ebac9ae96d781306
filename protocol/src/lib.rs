//! Certificate to JSON Web Key conversion.
//!
//! The crate is pure: it never parses files or ASN.1. A loader hands over a
//! [`x509::certificate::CertificateDescriptor`] and, optionally, private key
//! material, and [`x509::converter::convert`] returns a
//! [`keyring::jwk::JsonWebKey`].

pub mod encoding;
pub mod keyring;
pub mod x509;
