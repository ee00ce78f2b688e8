use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editors::DraftError;

/// Domain errors surfaced by the shell, the player and the mall.
#[derive(Error, Debug)]
pub enum EmpireError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unknown media item: {0}")]
    UnknownMedia(String),

    #[error("unknown post: {0}")]
    UnknownPost(String),

    #[error("unknown shop item: {0}")]
    UnknownShopItem(String),

    #[error("invalid draft: {0}")]
    InvalidDraft(#[from] DraftError),

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    PermissionDenied,
    Network,
    Storage,
    Info,
}

/// Transient, non-blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self { Self::new(NoticeKind::PermissionDenied, message) }
    pub fn network(message: impl Into<String>) -> Self { Self::new(NoticeKind::Network, message) }
    pub fn info(message: impl Into<String>) -> Self { Self::new(NoticeKind::Info, message) }
}

impl From<&EmpireError> for Notice {
    fn from(err: &EmpireError) -> Self {
        let kind = match err {
            EmpireError::PermissionDenied(_) => NoticeKind::PermissionDenied,
            EmpireError::Storage(_) => NoticeKind::Storage,
            _ => NoticeKind::Info,
        };
        Notice::new(kind, err.to_string())
    }
}
