//! API response types shared by the route handlers.

pub mod extract;
pub mod response;

pub use extract::{ApiJson, ApiQuery};
pub use response::{Created, DataResponse, ListResponse, MessageResponse};
