pub mod common;
pub mod principal;
pub mod request;
pub mod service_request;
