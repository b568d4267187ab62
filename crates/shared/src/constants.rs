pub const APP_NAME: &str = "Parley";

// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_SERVER_NAME_LENGTH: usize = 100;
pub const MAX_CHANNEL_NAME_LENGTH: usize = 100;
pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_UID_LENGTH: usize = 128;

/// Messages per page, newest batch first.
pub const MESSAGE_BATCH_SIZE: i64 = 20;

/// Content written over a message when it is soft-deleted.
pub const DELETED_MESSAGE_CONTENT: &str = "This message has been deleted.";

/// Every server is created with this text channel; it cannot be renamed or removed.
pub const DEFAULT_CHANNEL_NAME: &str = "General";

pub const SESSION_COOKIE: &str = "__session";
