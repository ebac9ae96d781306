pub mod algorithms;
pub mod certificate;
pub mod converter;
