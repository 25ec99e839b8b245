//! HTTP middleware.

pub(crate) mod methods;
pub(crate) mod security;
