//! Request value, response sink and the application service.

pub mod request;
pub mod response;
pub mod service;

pub use request::{parse_query_string, Request};
pub use response::{HeaderLine, Response, SentResponse, DEFAULT_CONTENT_TYPE};
pub use service::AppService;
