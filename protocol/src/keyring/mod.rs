pub mod jwk;
pub mod keypair;
