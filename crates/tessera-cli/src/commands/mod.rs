pub mod fingerprint;
pub mod inspect;
pub mod integer;
