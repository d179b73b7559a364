mod record;
mod repository;
mod sender;
mod value_objects;

pub use record::{NotificationOutcome, NotificationRecord};
pub use repository::NotificationLogRepository;
pub use sender::{NotificationSender, SendError};
pub use value_objects::{ChannelConfig, ChannelType, UrgencyTier};
