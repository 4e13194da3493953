//! Wire-level message envelope.
//!
//! Every frame exchanged with a client is one JSON envelope. The field set
//! is the externally binding contract of this server; everything else is
//! internal.

use serde::{Deserialize, Serialize};

/// Message kinds carried on the wire.
///
/// `Username` and `Userlist` are control messages; only `Chat`, `Image` and
/// `File` payloads are ever persisted to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Username,
    Chat,
    Image,
    File,
    Userlist,
}

impl MessageKind {
    /// Whether messages of this kind are stored in the history buffer.
    pub fn is_persistable(self) -> bool {
        matches!(self, MessageKind::Chat | MessageKind::Image | MessageKind::File)
    }
}

/// The JSON envelope exchanged with clients.
///
/// Unknown `type` values fail deserialization; a missing `username` or
/// `content` decodes as the empty string. The `users` array is attached by
/// the server to outbound `userlist` envelopes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "imageData", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

impl Envelope {
    /// Build a plain chat envelope.
    pub fn chat(username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Chat,
            username: username.into(),
            content: content.into(),
            image_data: None,
            filename: None,
            file_data: None,
            users: None,
        }
    }

    /// Build the roster envelope broadcast after membership or name changes.
    ///
    /// `username` and `content` stay empty to preserve the legacy envelope
    /// shape; the roster travels in the `users` array.
    pub fn userlist(users: Vec<String>) -> Self {
        Self {
            kind: MessageKind::Userlist,
            username: String::new(),
            content: String::new(),
            image_data: None,
            filename: None,
            file_data: None,
            users: Some(users),
        }
    }
}
