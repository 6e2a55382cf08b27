//! Confirmation state for destructive actions.

/// Where a destructive action stands with the user.
///
/// `Idle` becomes `AwaitingConfirmation` once the action is requested; the
/// user's answer moves it to `Confirmed` or `Cancelled`. Answers given while
/// nothing is pending are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Idle,
    AwaitingConfirmation,
    Confirmed,
    Cancelled,
}

impl Confirmation {
    pub fn request(self) -> Self {
        match self {
            Self::Idle => Self::AwaitingConfirmation,
            other => other,
        }
    }

    pub fn confirm(self) -> Self {
        match self {
            Self::AwaitingConfirmation => Self::Confirmed,
            other => other,
        }
    }

    pub fn decline(self) -> Self {
        match self {
            Self::AwaitingConfirmation => Self::Cancelled,
            other => other,
        }
    }

    /// Requested action with the answer carried by a request, if any.
    pub fn from_answer(answer: Option<bool>) -> Self {
        let pending = Self::Idle.request();
        match answer {
            Some(true) => pending.confirm(),
            Some(false) => pending.decline(),
            None => pending,
        }
    }
}
