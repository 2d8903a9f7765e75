//! Credential issuance and the request authorization gate.

pub(crate) mod gate;
pub(crate) mod password;
pub(crate) mod token;
