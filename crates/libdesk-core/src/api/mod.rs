//! Request/response plumbing for the campus library server.
//!
//! This module provides the fixed protocol envelope (`Request`, `Response`),
//! the `Transport` seam the rest of the crate talks through, and an HTTP
//! implementation of it.

pub mod error;
pub mod protocol;
pub mod transport;

pub use error::{CommandError, TransportError};
pub use protocol::{decode_list, Request, Response, Status};
pub use transport::{HttpTransport, Transport};
