//! Permission prompts for the command line.

use std::io::{BufRead, Write};

use push_core::PermissionState;
use push_platform::{FixedPrompt, PermissionPrompt};

/// Prompt chosen from the command line flags.
pub enum CliPrompt {
    Fixed(FixedPrompt),
    Terminal,
}

impl CliPrompt {
    pub fn from_flags(grant: bool, deny: bool) -> Self {
        if grant {
            Self::Fixed(FixedPrompt::granting())
        } else if deny {
            Self::Fixed(FixedPrompt::denying())
        } else {
            Self::Terminal
        }
    }
}

impl PermissionPrompt for CliPrompt {
    async fn ask(&self) -> PermissionState {
        match self {
            Self::Fixed(prompt) => prompt.ask().await,
            Self::Terminal => ask_terminal().await,
        }
    }
}

async fn ask_terminal() -> PermissionState {
    let answer = tokio::task::spawn_blocking(|| {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "Allow notifications? [y/N] ");
        let _ = stderr.flush();

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).map(|_| line)
    })
    .await;

    match answer {
        Ok(Ok(line)) => parse_answer(&line),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "could not read permission answer");
            PermissionState::Undetermined
        }
        Err(e) => {
            tracing::warn!(error = %e, "permission prompt task failed");
            PermissionState::Undetermined
        }
    }
}

fn parse_answer(line: &str) -> PermissionState {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "allow" => PermissionState::Granted,
        _ => PermissionState::Denied,
    }
}
