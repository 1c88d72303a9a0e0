pub mod core_auth;
pub mod error;
pub mod helper;
pub mod provider;

pub use core_auth::PasswdEntry;
pub use error::AuthError;
pub use provider::{AuthProvider, PasswdDatabase, UserRegistry};
