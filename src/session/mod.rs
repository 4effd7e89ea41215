pub mod cookie;
pub mod handle;
pub mod store;

pub use cookie::session_cookie;
pub use handle::*;
pub use store::*;
