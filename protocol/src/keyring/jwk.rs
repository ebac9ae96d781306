// JWK: Json Web Key. RFC7517で定義
// https://tex2e.github.io/rfc-translater/html/rfc7517.html
// パラメータ名と値はRFC7518 §6 を参照

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::encoding::base64url::{self, FormatError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum KeyType {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "EC")]
    Ec,
    #[serde(rename = "oct")]
    Octet,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "RSA",
            KeyType::Ec => "EC",
            KeyType::Octet => "oct",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum KeyUse {
    #[serde(rename = "sig")]
    Signature,
    #[serde(rename = "enc")]
    Encryption,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Curve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
}

impl Curve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }
}

/// JWS `alg` values this generator can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "RS384")]
    Rs384,
    #[serde(rename = "RS512")]
    Rs512,
    #[serde(rename = "ES256")]
    Es256,
    #[serde(rename = "ES384")]
    Es384,
    #[serde(rename = "ES512")]
    Es512,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Rs256 => "RS256",
            Algorithm::Rs384 => "RS384",
            Algorithm::Rs512 => "RS512",
            Algorithm::Es256 => "ES256",
            Algorithm::Es384 => "ES384",
            Algorithm::Es512 => "ES512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Certificate related members shared by every key type.
#[derive(Clone, Debug)]
pub(crate) struct JwkHeader {
    pub kid: String,
    pub x5t: String,
    pub x5t_s256: Option<String>,
    pub x5c: Vec<String>,
    pub alg: Algorithm,
}

#[derive(Clone, Debug)]
pub(crate) struct RsaPrivateFields {
    pub d: String,
    pub p: String,
    pub q: String,
    pub dp: String,
    pub dq: String,
    pub qi: String,
}

/// Exactly one key type group; private members are all or nothing.
#[derive(Clone, Debug)]
pub(crate) enum KeyParameters {
    Rsa {
        n: String,
        e: String,
        private: Option<RsaPrivateFields>,
    },
    Ec {
        crv: Curve,
        x: String,
        y: String,
        d: Option<String>,
    },
}

/// An immutable JSON Web Key.
///
/// Built once by the certificate converter; everything else is read only.
/// Serializes with the RFC7517 member names and omits absent members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JsonWebKey {
    #[serde(rename = "kty")] // key type. "EC", "RSA", "oct"
    kty: KeyType,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    key_use: Option<KeyUse>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    key_ops: Vec<String>,

    alg: Algorithm,

    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    x5u: Option<String>,

    // 証明書チェーン。url-safeではない標準base64のDER
    #[serde(skip_serializing_if = "Vec::is_empty")]
    x5c: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    x5t: Option<String>,

    #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
    x5t_s256: Option<String>,

    // RSA
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    e: Option<String>,

    // RSA / EC 共通の秘密鍵
    #[serde(skip_serializing_if = "Option::is_none")]
    d: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qi: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    oth: Vec<String>,

    // EC
    #[serde(skip_serializing_if = "Option::is_none")]
    crv: Option<Curve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<String>,

    // oct
    #[serde(skip_serializing_if = "Option::is_none")]
    k: Option<String>,

    #[serde(flatten)]
    additional_data: BTreeMap<String, serde_json::Value>,
}

impl JsonWebKey {
    pub(crate) fn new(header: JwkHeader, parameters: KeyParameters) -> Self {
        let mut jwk = JsonWebKey {
            kty: KeyType::Octet,
            key_use: Some(KeyUse::Signature),
            key_ops: Vec::new(),
            alg: header.alg,
            kid: Some(header.kid),
            x5u: None,
            x5c: header.x5c,
            x5t: Some(header.x5t),
            x5t_s256: header.x5t_s256,
            n: None,
            e: None,
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
            oth: Vec::new(),
            crv: None,
            x: None,
            y: None,
            k: None,
            additional_data: BTreeMap::new(),
        };

        match parameters {
            KeyParameters::Rsa { n, e, private } => {
                jwk.kty = KeyType::Rsa;
                jwk.n = Some(n);
                jwk.e = Some(e);
                if let Some(private) = private {
                    jwk.d = Some(private.d);
                    jwk.p = Some(private.p);
                    jwk.q = Some(private.q);
                    jwk.dp = Some(private.dp);
                    jwk.dq = Some(private.dq);
                    jwk.qi = Some(private.qi);
                }
            }
            KeyParameters::Ec { crv, x, y, d } => {
                jwk.kty = KeyType::Ec;
                jwk.crv = Some(crv);
                jwk.x = Some(x);
                jwk.y = Some(y);
                jwk.d = d;
            }
        }
        jwk
    }

    pub fn kty(&self) -> KeyType {
        self.kty
    }

    pub fn key_use(&self) -> Option<KeyUse> {
        self.key_use
    }

    pub fn key_ops(&self) -> &[String] {
        &self.key_ops
    }

    pub fn alg(&self) -> Algorithm {
        self.alg
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn x5u(&self) -> Option<&str> {
        self.x5u.as_deref()
    }

    pub fn x5c(&self) -> &[String] {
        &self.x5c
    }

    pub fn x5t(&self) -> Option<&str> {
        self.x5t.as_deref()
    }

    pub fn x5t_s256(&self) -> Option<&str> {
        self.x5t_s256.as_deref()
    }

    pub fn n(&self) -> Option<&str> {
        self.n.as_deref()
    }

    pub fn e(&self) -> Option<&str> {
        self.e.as_deref()
    }

    pub fn d(&self) -> Option<&str> {
        self.d.as_deref()
    }

    pub fn p(&self) -> Option<&str> {
        self.p.as_deref()
    }

    pub fn q(&self) -> Option<&str> {
        self.q.as_deref()
    }

    pub fn dp(&self) -> Option<&str> {
        self.dp.as_deref()
    }

    pub fn dq(&self) -> Option<&str> {
        self.dq.as_deref()
    }

    pub fn qi(&self) -> Option<&str> {
        self.qi.as_deref()
    }

    pub fn oth(&self) -> &[String] {
        &self.oth
    }

    pub fn crv(&self) -> Option<Curve> {
        self.crv
    }

    pub fn x(&self) -> Option<&str> {
        self.x.as_deref()
    }

    pub fn y(&self) -> Option<&str> {
        self.y.as_deref()
    }

    pub fn k(&self) -> Option<&str> {
        self.k.as_deref()
    }

    pub fn additional_data(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.additional_data
    }

    /// True when the complete private member set for `kty` is present.
    pub fn has_private_key(&self) -> bool {
        match self.kty {
            KeyType::Rsa => {
                self.d.is_some()
                    && self.p.is_some()
                    && self.q.is_some()
                    && self.dp.is_some()
                    && self.dq.is_some()
                    && self.qi.is_some()
            }
            KeyType::Ec => self.d.is_some(),
            KeyType::Octet => false,
        }
    }

    /// Key size in bits, measured on `n`, `x` or `k` depending on `kty`.
    pub fn key_size(&self) -> Result<usize, FormatError> {
        let primary = match self.kty {
            KeyType::Rsa => self.n.as_deref(),
            KeyType::Ec => self.x.as_deref(),
            KeyType::Octet => self.k.as_deref(),
        };
        match primary {
            Some(value) if !value.is_empty() => Ok(base64url::decode(value)?.len() * 8),
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> JwkHeader {
        JwkHeader {
            kid: "4480C201410850BBB87C1238EBB306EDE21F8D16".to_string(),
            x5t: "RIDCAUEIULu4fBI467MG7eIfjRY".to_string(),
            x5t_s256: None,
            x5c: vec!["MIIB".to_string()],
            alg: Algorithm::Rs256,
        }
    }

    fn rsa(private: Option<RsaPrivateFields>) -> JsonWebKey {
        JsonWebKey::new(
            header(),
            KeyParameters::Rsa {
                n: base64url::encode(&[0xc5; 256]),
                e: "AQAB".to_string(),
                private,
            },
        )
    }

    fn rsa_private() -> RsaPrivateFields {
        RsaPrivateFields {
            d: "ZA".to_string(),
            p: "cA".to_string(),
            q: "cQ".to_string(),
            dp: "ZHA".to_string(),
            dq: "ZHE".to_string(),
            qi: "cWk".to_string(),
        }
    }

    #[test]
    fn rsa_key_size_follows_modulus_length() {
        let jwk = rsa(None);
        assert_eq!(jwk.kty(), KeyType::Rsa);
        assert_eq!(jwk.key_size().unwrap(), 2048);
        assert!(!jwk.has_private_key());
    }

    #[test]
    fn rsa_private_members_are_all_or_nothing() {
        let jwk = rsa(Some(rsa_private()));
        assert!(jwk.has_private_key());
        assert_eq!(jwk.qi(), Some("cWk"));

        let public = rsa(None);
        assert_eq!(public.d(), None);
        assert_eq!(public.p(), None);
        assert_eq!(public.qi(), None);
    }

    #[test]
    fn ec_key_size_follows_x_coordinate() {
        let jwk = JsonWebKey::new(
            JwkHeader {
                alg: Algorithm::Es384,
                ..header()
            },
            KeyParameters::Ec {
                crv: Curve::P384,
                x: base64url::encode(&[1; 48]),
                y: base64url::encode(&[2; 48]),
                d: None,
            },
        );
        assert_eq!(jwk.kty(), KeyType::Ec);
        assert_eq!(jwk.key_size().unwrap(), 384);
        assert!(!jwk.has_private_key());
        assert_eq!(jwk.n(), None);
        assert_eq!(jwk.e(), None);
    }

    #[test]
    fn ec_private_key_needs_only_d() {
        let jwk = JsonWebKey::new(
            header(),
            KeyParameters::Ec {
                crv: Curve::P256,
                x: base64url::encode(&[1; 32]),
                y: base64url::encode(&[2; 32]),
                d: Some(base64url::encode(&[3; 32])),
            },
        );
        assert!(jwk.has_private_key());
        assert_eq!(jwk.p(), None);
    }

    #[test]
    fn malformed_primary_member_surfaces_format_error() {
        let jwk = JsonWebKey::new(
            header(),
            KeyParameters::Rsa {
                n: "AAAAA".to_string(),
                e: "AQAB".to_string(),
                private: None,
            },
        );
        assert_eq!(jwk.key_size(), Err(FormatError::IllegalLength(5)));
    }

    #[test]
    fn serializes_rfc_member_names_and_omits_absent_ones() {
        let value = serde_json::to_value(rsa(None)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["kty"], "RSA");
        assert_eq!(object["use"], "sig");
        assert_eq!(object["alg"], "RS256");
        assert_eq!(object["e"], "AQAB");
        assert_eq!(object["x5c"], serde_json::json!(["MIIB"]));
        for absent in ["d", "p", "q", "dp", "dq", "qi", "crv", "x", "y", "k", "x5u"] {
            assert!(!object.contains_key(absent), "{absent} should be omitted");
        }
        for empty in ["key_ops", "oth", "x5t#S256", "additional_data"] {
            assert!(!object.contains_key(empty), "{empty} should be omitted");
        }
    }

    #[test]
    fn serializes_certificate_sha256_thumbprint_name() {
        let jwk = JsonWebKey::new(
            JwkHeader {
                x5t_s256: Some("sp6z".to_string()),
                ..header()
            },
            KeyParameters::Ec {
                crv: Curve::P521,
                x: "AA".to_string(),
                y: "AA".to_string(),
                d: None,
            },
        );
        let value = serde_json::to_value(jwk).unwrap();
        assert_eq!(value["x5t#S256"], "sp6z");
        assert_eq!(value["crv"], "P-521");
    }
}
