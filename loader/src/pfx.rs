// PKCS#12 (PFX) コンテナの読み込み。最初の証明書と秘密鍵のペアを取り出す

use std::path::Path;

use der::asn1::AnyRef;
use der::{Decode, Tag, Tagged};
use p12_keystore::{KeyStore, KeyStoreEntry};

use crate::certificate::LoadedCertificate;
use crate::error::LoaderError;
use crate::private_key::LoadedPrivateKey;

/// A PFX is a SEQUENCE opening with its INTEGER version, where a certificate
/// opens with the tbsCertificate SEQUENCE.
pub fn is_pfx(input: &[u8]) -> bool {
    match AnyRef::from_der(input) {
        Ok(outer) => {
            outer.tag() == Tag::Sequence && outer.value().first() == Some(&u8::from(Tag::Integer))
        }
        Err(_) => false,
    }
}

/// Opens the container at `path` and returns its first certificate and key
/// pair. A container holding certificates only yields the first of them
/// without a key.
pub fn load_pfx(
    path: &Path,
    input: &[u8],
    password: Option<&str>,
) -> Result<(LoadedCertificate, Option<LoadedPrivateKey>), LoaderError> {
    let keystore = KeyStore::from_pkcs12(input, password.unwrap_or("")).map_err(|e| {
        log::debug!("failed to open {}: {e}", path.display());
        match password {
            None => LoaderError::PasswordRequired,
            Some(_) => LoaderError::Pkcs12(e.to_string()),
        }
    })?;

    let mut bare_certificate = None;
    for (alias, entry) in keystore.entries() {
        match entry {
            KeyStoreEntry::PrivateKeyChain(chain) => {
                let Some(leaf) = chain.chain().first() else {
                    log::debug!("PFX entry {alias} has a key but no certificate");
                    continue;
                };
                log::debug!("using PFX entry {alias}");
                let certificate = LoadedCertificate::from_der(leaf.as_der().to_vec())?;
                let private_key = LoadedPrivateKey::from_pkcs8_der(chain.key())?;
                return Ok((certificate, Some(private_key)));
            }
            KeyStoreEntry::Certificate(certificate) if bare_certificate.is_none() => {
                bare_certificate = Some(certificate.as_der().to_vec());
            }
            _ => {}
        }
    }

    let der = bare_certificate.ok_or_else(|| LoaderError::NoCertificate(path.to_path_buf()))?;
    Ok((LoadedCertificate::from_der(der)?, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tells_pfx_from_certificate() {
        assert!(is_pfx(include_bytes!("../tests/fixtures/rsa2048.pfx")));
        assert!(!is_pfx(include_bytes!("../tests/fixtures/rsa2048.cer")));
        assert!(!is_pfx(b"-----BEGIN CERTIFICATE-----\n"));
    }
}
