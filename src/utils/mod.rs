pub mod prompts;
pub mod sse;

pub use prompts::*;
pub use sse::*;
