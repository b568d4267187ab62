pub mod auth;

pub use auth::{session_user_id, CurrentProfile};
