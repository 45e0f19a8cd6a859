//! HTTP service layer for hashbatch.
//!
//! This crate owns the transport boundary of the batch hashing endpoint:
//!
//! - **Router**: Maps method + path to a [`Route`]
//! - **Handler trait**: Defines the boundary between HTTP and business logic
//! - **Service**: Hyper `Service` implementation wrapping a handler
//! - **Response helpers**: JSON success and bare failure responses

pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use dispatch::BatchHandler;
pub use response::HashResponseBody;
pub use router::Route;
pub use service::{HashHttpConfig, HashHttpService};
