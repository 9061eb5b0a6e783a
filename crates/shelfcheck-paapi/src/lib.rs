pub mod client;
pub mod error;
mod signing;
pub mod types;

pub use client::PaapiClient;
pub use error::PaapiError;
