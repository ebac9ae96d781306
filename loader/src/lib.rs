use std::path::Path;

use protocol::keyring::jwk::JsonWebKey;
use protocol::x509::converter::{convert, convert_exporting};

pub mod armor;
pub mod certificate;
pub mod cli;
pub mod config;
pub mod error;
pub mod pfx;
pub mod private_key;

use armor::PemBlock;
use certificate::LoadedCertificate;
use config::{GeneratorConfig, OutputFormat};
use error::{LoaderError, RunError};
use private_key::LoadedPrivateKey;

/// A certificate and, when one was found, its private key.
#[derive(Debug)]
pub struct LoadedBundle {
    pub certificate: LoadedCertificate,
    pub private_key: Option<LoadedPrivateKey>,
}

impl LoadedBundle {
    pub fn to_jwk(&self) -> Result<JsonWebKey, RunError> {
        let descriptor = self.certificate.descriptor()?;
        log::debug!(
            "certificate {} thumbprint {} signed with {}",
            self.certificate.subject(),
            descriptor.thumbprint,
            descriptor.signature_algorithm
        );

        let jwk = match &self.private_key {
            Some(key) => {
                if !key.matches(&descriptor.public_key) {
                    return Err(LoaderError::KeyMismatch.into());
                }
                convert_exporting(&descriptor, key)?
            }
            None => convert(&descriptor, None)?,
        };
        Ok(jwk)
    }
}

/// A private key found in the certificate file itself. PEM keys stay encoded
/// until it is known that no key file replaces them.
enum BundledKey {
    Pem(PemBlock),
    Pfx(LoadedPrivateKey),
}

impl BundledKey {
    fn decode(self, password: Option<&str>) -> Result<LoadedPrivateKey, LoaderError> {
        match self {
            BundledKey::Pem(block) => {
                LoadedPrivateKey::from_pem_block(&block.label, &block.der, password)
            }
            BundledKey::Pfx(key) => Ok(key),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, LoaderError> {
    std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a certificate (DER, PEM or PKCS#12) and an optional private key.
///
/// A PEM or PKCS#12 certificate file may carry the private key as well; an
/// explicit `key_path` takes precedence over it.
pub fn load(
    certificate_path: &Path,
    key_path: Option<&Path>,
    password: Option<&str>,
) -> Result<LoadedBundle, LoaderError> {
    let input = read(certificate_path)?;
    let blocks = armor::decode_blocks(&input)?;

    let (certificate, bundled_key) = if !blocks.is_empty() {
        let mut certificate = None;
        let mut key = None;
        for PemBlock { label, der } in blocks {
            match label.as_str() {
                "CERTIFICATE" if certificate.is_none() => {
                    certificate = Some(LoadedCertificate::from_der(der)?);
                }
                name if key.is_none() && private_key::is_private_key_label(name) => {
                    key = Some(BundledKey::Pem(PemBlock {
                        label: name.to_string(),
                        der,
                    }));
                }
                name => log::debug!("skipping PEM block {name}"),
            }
        }
        let certificate =
            certificate.ok_or_else(|| LoaderError::NoCertificate(certificate_path.to_path_buf()))?;
        (certificate, key)
    } else if pfx::is_pfx(&input) {
        let (certificate, key) = pfx::load_pfx(certificate_path, &input, password)?;
        (certificate, key.map(BundledKey::Pfx))
    } else {
        (LoadedCertificate::from_der(input)?, None)
    };

    let private_key = match key_path {
        Some(path) => {
            if bundled_key.is_some() {
                log::debug!("key file {} replaces the bundled key", path.display());
            }
            Some(load_private_key(path, password)?)
        }
        None => bundled_key.map(|key| key.decode(password)).transpose()?,
    };
    log::info!(
        "loaded {} ({} private key)",
        certificate.subject(),
        if private_key.is_some() { "with" } else { "without" }
    );

    Ok(LoadedBundle {
        certificate,
        private_key,
    })
}

pub fn load_private_key(path: &Path, password: Option<&str>) -> Result<LoadedPrivateKey, LoaderError> {
    let input = read(path)?;
    let blocks = armor::decode_blocks(&input)?;
    if blocks.is_empty() {
        return LoadedPrivateKey::from_der(&input, password);
    }

    let block = blocks
        .iter()
        .find(|block| private_key::is_private_key_label(&block.label))
        .ok_or_else(|| LoaderError::NoPrivateKey(path.to_path_buf()))?;
    LoadedPrivateKey::from_pem_block(&block.label, &block.der, password)
}

/// Loads, converts and renders the certificate named by `options`.
pub fn run(options: &cli::GeneratorOptions, config: &GeneratorConfig) -> Result<String, RunError> {
    let password = options.password.as_deref().or(config.password());
    let bundle = load(&options.certificate, options.key.as_deref(), password)?;
    let jwk = bundle.to_jwk()?;

    let json = if options.compact || config.output_format() == OutputFormat::Compact {
        serde_json::to_string(&jwk)?
    } else {
        serde_json::to_string_pretty(&jwk)?
    };
    Ok(json)
}
