//! Chat-completion client for promptforge
//!
//! - [`ChatTransport`] is the seam to the network; [`HttpTransport`] is the
//!   reqwest implementation.
//! - [`CompletionClient`] performs one system+user completion call and
//!   reports failures in-band as a [`CompletionOutcome`].

mod completion;
mod http_transport;
mod settings;
mod transport;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use completion::{CompletionClient, CompletionFailure, CompletionOutcome};
pub use http_transport::HttpTransport;
pub use settings::CompletionSettings;
pub use transport::{ChatTransport, InboundResponse, OutboundRequest, TransportError};
pub use types::{ChatMessage, CompletionRequest, Role};
