use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
pub struct GeneratorOptions {
    /// Certificate file: DER (.cer), PEM or PKCS#12 (.pfx), optionally bundled with its private key
    pub certificate: PathBuf,

    /// Private key file: PKCS#8, encrypted PKCS#8, PKCS#1 or SEC1, PEM or DER
    #[clap(long, short)]
    pub key: Option<PathBuf>,

    /// Password of an encrypted private key or PKCS#12 file (defaults to $JWKGEN_PASSWORD)
    #[clap(long, short)]
    pub password: Option<String>,

    /// Print the JWK on a single line
    #[clap(long)]
    pub compact: bool,
}
