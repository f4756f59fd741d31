//! Built-in chain middleware.

pub mod access_log;
pub mod request_id;

pub use access_log::access_log;
pub use request_id::request_id;
