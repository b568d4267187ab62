pub mod events;
pub mod gateway;
pub mod handler;
pub mod topic;

pub use topic::{Topic, TopicKind};
