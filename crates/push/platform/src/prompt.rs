//! Non-interactive permission prompt.

use std::sync::atomic::{AtomicUsize, Ordering};

use push_core::PermissionState;

use crate::PermissionPrompt;

/// Prompt that always gives the same answer and counts how often it was shown.
#[derive(Debug)]
pub struct FixedPrompt {
    answer: PermissionState,
    asked: AtomicUsize,
}

impl FixedPrompt {
    /// Prompt answering `answer`.
    pub fn new(answer: PermissionState) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// Prompt that grants.
    pub fn granting() -> Self {
        Self::new(PermissionState::Granted)
    }

    /// Prompt that denies.
    pub fn denying() -> Self {
        Self::new(PermissionState::Denied)
    }

    /// How many times the prompt was shown.
    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl PermissionPrompt for FixedPrompt {
    async fn ask(&self) -> PermissionState {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
