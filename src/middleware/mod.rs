pub mod chain;
pub mod config;
pub mod error;
pub mod headers;
pub mod response;
pub mod traits;

use bytes::Bytes;
use http_body_util::Full;

pub use chain::MiddlewareChain;
pub use config::MiddlewareConfig;
pub use error::MiddlewareError;
pub use response::handle_middleware_error;
pub use traits::Middleware;

pub type Request = hyper::Request<Full<Bytes>>;
pub type Response = hyper::Response<Full<Bytes>>;
