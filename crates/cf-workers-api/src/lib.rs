//! Cloudflare Workers API plumbing
//!
//! Turns typed Workers operations into HTTP requests and provider envelopes
//! back into results:
//!
//! ```text
//! [ Operation (validated args) ]
//!        | to_request(&Config)
//!        v
//! [ ProviderRequest ] --Transport::send--> [ ProviderResponse ]
//!                                                | into_result()
//!                                                v
//!                                   [ result Value | Error::Provider ]
//! ```
//!
//! The only binary wire concern is the script upload, which is encoded by
//! [`multipart::MultipartForm`].

pub mod config;
pub mod error;
pub mod multipart;
pub mod operations;
pub mod request;
pub mod response;
pub mod transport;

pub use config::{Config, DEFAULT_API_BASE};
pub use error::{Error, Result};
pub use operations::{Operation, OperationKind};
pub use request::{Method, ProviderRequest, RequestBody};
pub use response::ProviderResponse;
pub use transport::{HttpTransport, Transport};
