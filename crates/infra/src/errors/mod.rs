//! Infrastructure error types and conversions

mod conversions;

pub use conversions::InfraError;
