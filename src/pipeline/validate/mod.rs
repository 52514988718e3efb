//! Reply validation.
//!
//! A completion is normalized, then held to an ordered rule table. The
//! first rule it breaks is reported so the caller can retry with tighter
//! sampling.

pub mod rules;
pub mod validator;
pub mod normalize;

pub use normalize::normalize;
pub use validator::{validate, Rejection};
