use std::path::PathBuf;

use protocol::x509::converter::ConvertError;
use thiserror::Error;

/// Failures while reading a certificate or its private key. Kept apart from
/// [`ConvertError`] so callers can tell a bad file from an unsupported key.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),
    #[error("DER error: {0}")]
    Der(#[from] der::Error),
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] pkcs8::Error),
    #[error("PKCS#12 error: {0}")]
    Pkcs12(String),
    #[error("no certificate found in {0}")]
    NoCertificate(PathBuf),
    #[error("no private key found in {0}")]
    NoPrivateKey(PathBuf),
    #[error("unsupported PEM label: {0}")]
    UnsupportedLabel(String),
    #[error("private key is encrypted but no password was supplied")]
    PasswordRequired,
    #[error("key error: {0}")]
    Key(String),
    #[error("private key does not match the certificate public key")]
    KeyMismatch,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
