/*
[INPUT]:  HTTP client configuration and drawing-test service endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod report;
pub mod survey;
pub mod upload;

pub use error::{DrawTestError, ErrorKind, Result};

pub use client::{ClientConfig, DrawTestClient};
