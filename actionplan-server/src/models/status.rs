//! Action status buckets

/// Status of an action, as stored in `action.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    Completed,
    Overdue,
    InProgress,
    Nouveau,
}

impl ActionStatus {
    /// Every bucket, in the order statistics report them.
    pub const ALL: [ActionStatus; 4] = [
        Self::Completed,
        Self::Overdue,
        Self::InProgress,
        Self::Nouveau,
    ];

    /// Get string representation, identical to the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::InProgress => "in_progress",
            Self::Nouveau => "nouveau",
        }
    }
}
