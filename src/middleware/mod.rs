pub mod auth;
pub mod response;
pub mod timeout;

pub use auth::jwt_auth_middleware;
pub use response::{ApiResponse, ApiResult};
pub use timeout::request_timeout_middleware;
