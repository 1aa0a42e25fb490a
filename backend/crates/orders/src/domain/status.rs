use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle: `pending -> in-progress -> completed`, with
/// `cancelled` as the other terminal state.
///
/// Stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(i16)]
pub enum OrderStatus {
    #[default]
    Pending = 0,
    InProgress = 1,
    Completed = 2,
    Cancelled = 3,
}

impl OrderStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use OrderStatus::*;
        match self {
            Pending => "pending",
            InProgress => "in-progress",
            Completed => "completed",
            Cancelled => "cancelled",
        }
    }

    /// No transition leaves a final state.
    #[inline]
    pub const fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Targets accepted by the status update endpoint.
    #[inline]
    pub const fn is_settable(&self) -> bool {
        match self {
            OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Completed => true,
            OrderStatus::Cancelled => false,
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use OrderStatus::*;
        match id {
            0 => Some(Pending),
            1 => Some(InProgress),
            2 => Some(Completed),
            3 => Some(Cancelled),
            _ => None,
        }
    }

    /// Accepts `in-progress`, `in_progress` and `in progress`.
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use OrderStatus::*;
        match code.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "pending" => Some(Pending),
            "in-progress" => Some(InProgress),
            "completed" => Some(Completed),
            "cancelled" => Some(Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
