//! Password gate for the faculty page.
//!
//! This only hides content from casual visitors; the password ships with the
//! page configuration and the comparison happens client-side.

use secrecy::{ExposeSecret, SecretString};

/// Whether the gated content is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

/// Hides gated content until the configured password is entered.
#[derive(Debug, Clone)]
pub struct ContentGate {
    password: Option<SecretString>,
    state: GateState,
}

impl ContentGate {
    /// A locked gate. Without a password it can never be unlocked.
    #[must_use]
    pub fn new(password: Option<SecretString>) -> Self {
        if password.is_none() {
            tracing::warn!("content gate has no password configured, it will stay locked");
        }
        Self {
            password,
            state: GateState::Locked,
        }
    }

    /// Try `attempt`. Returns the state afterwards.
    ///
    /// Once unlocked the gate stays unlocked for the session.
    pub fn unlock(&mut self, attempt: &str) -> GateState {
        if self.state == GateState::Unlocked {
            return self.state;
        }
        let matches = self
            .password
            .as_ref()
            .is_some_and(|p| p.expose_secret() == attempt);
        if matches {
            self.state = GateState::Unlocked;
        } else {
            tracing::debug!("content gate password rejected");
        }
        self.state
    }

    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_unlocks() {
        let mut gate = ContentGate::new(Some(SecretString::from("opensesame")));
        assert_eq!(gate.state(), GateState::Locked);
        assert_eq!(gate.unlock("opensesame"), GateState::Unlocked);
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_wrong_password_stays_locked() {
        let mut gate = ContentGate::new(Some(SecretString::from("opensesame")));
        assert_eq!(gate.unlock("OpenSesame"), GateState::Locked);
        assert_eq!(gate.unlock(""), GateState::Locked);
    }

    #[test]
    fn test_unconfigured_gate_never_unlocks() {
        let mut gate = ContentGate::new(None);
        assert_eq!(gate.unlock(""), GateState::Locked);
        assert_eq!(gate.unlock("anything"), GateState::Locked);
    }

    #[test]
    fn test_stays_unlocked() {
        let mut gate = ContentGate::new(Some(SecretString::from("opensesame")));
        gate.unlock("opensesame");
        assert_eq!(gate.unlock("wrong"), GateState::Unlocked);
    }
}
