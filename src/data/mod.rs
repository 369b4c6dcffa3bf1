//! Data acquisition: provider client and response decoding.

pub mod decode;
pub mod provider;

pub use decode::{ProviderError, TimeseriesResponse, decode_response};
pub use provider::RatesClient;
