pub mod errors;
pub mod id;
pub mod notifications;
pub mod types;

pub use errors::{ConfigError, ParleyError, StorageError};
pub use id::{new_correlation_id, SessionId};
pub use notifications::{Notification, NotificationLevel};
pub use types::{Message, Role};

pub type Result<T> = std::result::Result<T, ParleyError>;
