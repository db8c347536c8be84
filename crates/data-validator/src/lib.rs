//! Data Validation
//!
//! Turns untrusted request payloads into observations the feature engine
//! can safely consume.

mod error;
mod input;
mod validator;

pub use error::ValidationError;
pub use input::PlanetInput;
pub use validator::Validator;
