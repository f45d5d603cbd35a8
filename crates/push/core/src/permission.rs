//! Notification permission state.

/// Permission to display notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not been asked yet.
    #[default]
    Undetermined,
    /// The user allowed notifications.
    Granted,
    /// The user refused notifications.
    Denied,
}

impl PermissionState {
    /// Check if notifications may be shown.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }

    /// Apply the user's answer to a permission prompt.
    ///
    /// Only an undetermined state moves. A settled state keeps its value, so a
    /// denial is never turned into a grant by asking again.
    pub fn resolve(self, answer: PermissionState) -> PermissionState {
        match (self, answer) {
            (Self::Undetermined, Self::Undetermined) => Self::Denied,
            (Self::Undetermined, answer) => answer,
            (settled, _) => settled,
        }
    }

    /// Whether a prompt would be shown from this state.
    pub fn can_prompt(self) -> bool {
        self == Self::Undetermined
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Undetermined => "undetermined",
            Self::Granted => "granted",
            Self::Denied => "denied",
        };
        f.write_str(s)
    }
}
