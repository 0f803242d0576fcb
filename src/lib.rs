//! Tildee: typed records from Tildes markup.
//!
//! Turns HTML fragments served by a Tildes site (topic pages, comments,
//! notifications, conversations, listings, group rows and wiki pages) into
//! owned, immutable records. Fetching the markup is left to the caller.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod dump;
pub mod error;
pub mod fragment;
pub mod models;
pub mod status;

pub use error::{ExtractError, Result};
pub use models::{
    Comment, Conversation, Group, LogEntryData, LogEntryKind, Message, Notification,
    NotificationKind, Topic, TopicListing, TopicLogEntry, WikiPage,
};
pub use status::AccessStatus;
