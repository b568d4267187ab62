mod message;
mod profile;
mod server;

pub use message::*;
pub use profile::*;
pub use server::*;

use serde::Serialize;

/// One batch of a message history, listed oldest-first.
///
/// `next_cursor` names the oldest item of the batch and is only present when
/// older items exist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// The raw user id carried by the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}
