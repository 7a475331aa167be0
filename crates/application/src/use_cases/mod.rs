//! Application use cases (business logic orchestration).

mod send_authenticated;
mod session_status;
mod sign_in;
mod sign_out;

pub use send_authenticated::*;
pub use session_status::*;
pub use sign_in::*;
pub use sign_out::*;
