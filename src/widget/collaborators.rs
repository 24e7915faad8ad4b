use crate::models::User;
use tracing::{error, info};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Shows transient notifications to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: &str);
}

/// Source of the signed-in user, if any
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Auth provider with a fixed identity, e.g. taken from settings
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_in(name: impl Into<String>) -> Self {
        Self {
            user: Some(User {
                name: name.into(),
                email: None,
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// Prints notifications to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Error => {
                error!(toast = message, "notification");
                eprintln!("✗ {}", message);
            }
            ToastKind::Success => {
                info!(toast = message, "notification");
                println!("✓ {}", message);
            }
            ToastKind::Info => {
                info!(toast = message, "notification");
                println!("{}", message);
            }
        }
    }
}
