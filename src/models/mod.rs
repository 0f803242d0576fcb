//! Typed records extracted from site markup.
//!
//! Each record has a `from_html` constructor taking one fragment string.
//! Records are plain owned values: a topic owns its log and comments, and a
//! comment owns its replies.

mod comment;
mod conversation;
mod group;
mod listing;
pub mod log_entry;
mod notification;
mod topic;
mod wiki;

pub use comment::{Comment, Walk};
pub use conversation::{Conversation, Message};
pub use group::Group;
pub use listing::TopicListing;
pub use log_entry::{LogEntryData, LogEntryKind, TopicLogEntry};
pub use notification::{Notification, NotificationKind};
pub use topic::Topic;
pub use wiki::WikiPage;
