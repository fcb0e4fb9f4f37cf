pub mod culture;
pub mod error;
pub mod validation;
