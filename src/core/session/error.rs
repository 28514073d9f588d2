//! Remote error taxonomy
//!
//! The remote API reports many distinct errors. They all collapse into the
//! five [`FailureKind`]s through [`TransportError::classify`]; nothing else in
//! the crate inspects individual variants.
//!
//! | Variant | Kind |
//! |------|------|
//! | FloodWait | Throttled |
//! | AdminRequired, BannedInChannel, ChannelPrivate, WriteForbidden, DeleteForbidden | PermissionDenied |
//! | PeerInvalid, UserDeactivated, ChannelInvalid | EntityGone |
//! | SessionRevoked, Disconnected | Infrastructure |
//! | Rpc, Network, Other | Unknown |

use std::time::Duration;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Error reported by a remote session call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("A wait of {seconds} seconds is required")]
    FloodWait { seconds: u64 },

    #[error("Chat admin privileges are required")]
    AdminRequired,

    #[error("The account is banned in this channel")]
    BannedInChannel,

    #[error("The channel is private or the account was removed from it")]
    ChannelPrivate,

    #[error("Writing to this chat is forbidden")]
    WriteForbidden,

    #[error("Deleting these messages is forbidden")]
    DeleteForbidden,

    #[error("The peer id is invalid")]
    PeerInvalid,

    #[error("The user has been deleted or deactivated")]
    UserDeactivated,

    #[error("The channel no longer exists")]
    ChannelInvalid,

    #[error("The session was revoked: {0}")]
    SessionRevoked(String),

    #[error("The session is disconnected: {0}")]
    Disconnected(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

/// How the orchestrator reacts to a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Remote asked to slow down; the whole lane pauses
    Throttled { retry_after: Duration },
    /// Not allowed; not retried
    PermissionDenied,
    /// The entity no longer exists; counted as skipped
    EntityGone,
    /// The session itself is unusable; aborts the run
    Infrastructure,
    /// Anything else; counted as failed
    Unknown,
}

impl TransportError {
    pub fn flood_wait(seconds: u64) -> Self {
        Self::FloodWait { seconds }
    }

    pub fn rpc(code: i32, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn classify(&self) -> FailureKind {
        match self {
            Self::FloodWait { seconds } => FailureKind::Throttled {
                retry_after: Duration::from_secs(*seconds),
            },
            Self::AdminRequired
            | Self::BannedInChannel
            | Self::ChannelPrivate
            | Self::WriteForbidden
            | Self::DeleteForbidden => FailureKind::PermissionDenied,
            Self::PeerInvalid | Self::UserDeactivated | Self::ChannelInvalid => {
                FailureKind::EntityGone
            }
            Self::SessionRevoked(_) | Self::Disconnected(_) => FailureKind::Infrastructure,
            Self::Rpc { .. } | Self::Network(_) | Self::Other(_) => FailureKind::Unknown,
        }
    }

    /// Remote error code, as used in permission failure messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::FloodWait { .. } => "FLOOD_WAIT",
            Self::AdminRequired => "CHAT_ADMIN_REQUIRED",
            Self::BannedInChannel => "USER_BANNED_IN_CHANNEL",
            Self::ChannelPrivate => "CHANNEL_PRIVATE",
            Self::WriteForbidden => "CHAT_WRITE_FORBIDDEN",
            Self::DeleteForbidden => "MESSAGE_DELETE_FORBIDDEN",
            Self::PeerInvalid => "PEER_ID_INVALID",
            Self::UserDeactivated => "INPUT_USER_DEACTIVATED",
            Self::ChannelInvalid => "CHANNEL_INVALID",
            Self::SessionRevoked(_) => "SESSION_REVOKED",
            Self::Disconnected(_) => "DISCONNECTED",
            Self::Rpc { .. } => "RPC_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Other(_) => "UNKNOWN",
        }
    }

    pub fn is_throttle(&self) -> bool {
        matches!(self.classify(), FailureKind::Throttled { .. })
    }
}
