pub mod error;
pub mod rest;

pub use error::{ApiError, ApiResult};
pub use rest::router;
