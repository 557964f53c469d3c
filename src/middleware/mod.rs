pub mod auth;

pub use auth::{basic_auth, bearer_auth};
