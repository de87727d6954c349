//! Signing and encoding utils shared by the mygengo crates.

mod error;
pub use error::Error;

pub mod helper;
pub mod sign;
