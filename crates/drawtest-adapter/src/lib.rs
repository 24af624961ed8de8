/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public drawing-test adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod task_api;
pub mod types;

/// Scripted [`TaskApi`] double; downstream crates enable it with `features = ["test-util"]`
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

// Re-export commonly used types from http
pub use http::{ClientConfig, DrawTestClient, DrawTestError, ErrorKind, Result};

// Re-export the transport seam
pub use task_api::TaskApi;

#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockCalls, MockTaskApi};

// Re-export all types
pub use types::*;
