//! Client for the Hetzner DNS API.
//!
//! [`HetznerClient`] wraps the handful of endpoints needed to manage challenge records:
//! listing zones, creating records, listing records of a zone and deleting records.
//! All HTTP traffic goes through a [`Transport`], by default the blocking [`ReqwestTransport`].

mod client;
mod transport;
mod types;

pub use client::HetznerClient;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport, TransportError};
pub use types::{Record, RecordType, Zone};

#[cfg(test)]
pub use transport::MockTransport;

use thiserror::Error;

/// Everything that can go wrong while talking to the Hetzner DNS API.
///
/// None of these are retried by the client.
#[derive(Error, Debug)]
pub enum HetznerError {
    /// No zone in the account matches any suffix of the domain
    #[error("Zone {0} not found in Hetzner account")]
    ZoneNotFound(String),
    #[error("Record with name {0} not found")]
    RecordNotFound(String),
    /// The API returned 401 for the configured token
    #[error("Malformed authorization or invalid API token")]
    NotAuthorized,
    /// The API returned 422, the request was well-formed but rejected
    #[error("Hetzner API rejected the request: {0}")]
    UnprocessableEntity(String),
    /// Unexpected status code or a body that does not have the expected shape
    #[error("Received an unexpected response from Hetzner API: {0}")]
    MalformedResponse(String),
    /// The client could not be set up, e.g. because the token is not a valid header value
    #[error("Invalid Hetzner client configuration: {0}")]
    Config(String),
    /// The API could not be reached. Passed through from the transport unchanged
    #[error(transparent)]
    Connection(#[from] TransportError),
}

impl HetznerError {
    /// Whether this error was caused by the network rather than by the API
    pub fn is_connection(&self) -> bool {
        matches!(self, HetznerError::Connection(_))
    }
}

impl From<serde_json::Error> for HetznerError {
    fn from(e: serde_json::Error) -> Self {
        HetznerError::MalformedResponse(e.to_string())
    }
}
