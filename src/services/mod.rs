pub mod ai_service;
pub mod rate_limiter;
pub mod search_service;

pub use ai_service::*;
pub use rate_limiter::*;
pub use search_service::*;
