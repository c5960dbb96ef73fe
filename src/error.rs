//! Defines the crate level error type shared by the API client, the export
//! writers, and the report facade.

/// The errors that may occur while fetching inventory data or writing report
/// output.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The configured API base URL could not be parsed as a URL.
    ///
    /// Callers should pass in the string that failed to parse.
    #[error("invalid API base URL \"{0}\"")]
    InvalidBaseUrl(String),

    /// A request never produced a response, e.g. connection refused, DNS
    /// failure or timeout.
    ///
    /// Views receiving this error should keep the collection they already
    /// hold: the data is stale, not gone.
    #[error("could not reach the inventory API at {0}: {1}")]
    Fetch(String, String),

    /// The API answered with a non-success status code.
    #[error("the inventory API returned HTTP {1} for {0}")]
    ApiStatus(String, u16),

    /// A response body was not the JSON shape the client expected.
    ///
    /// From the caller's perspective this is still a failed fetch; the
    /// separate variant exists so the logs can tell transport problems from
    /// contract drift on the server.
    #[error("could not decode the response from {0}: {1}")]
    Decode(String, String),

    /// An error occurred while getting the local offset from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An exported file could not be written to disk.
    #[error("could not write \"{0}\": {1}")]
    ExportIo(String, String),

    /// An operation that requires a signed-in user was called without an
    /// active session.
    #[error("no active session, sign in first")]
    MissingSession,
}
