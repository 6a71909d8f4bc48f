pub mod compiler;
pub mod fingerprint;
pub mod layout;
