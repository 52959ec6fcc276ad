//! # Railyard Core
//!
//! Types shared by every Railyard crate:
//!
//! - [`exception`]: the workspace error enum and `Result` alias
//! - [`request`]: the HTTP method enum and the request abstraction the router
//!   reads paths and query parameters from

pub mod exception;
pub mod request;

pub use exception::{Error, Result};
pub use request::{QueryParams, RequestMethod, RouteRequest, RouteRequestBuilder};
