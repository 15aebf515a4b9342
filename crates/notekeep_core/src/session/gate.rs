//! Password gate in front of the notes list.
//!
//! The stored secret lives under the `password` preference key and is
//! compared to user input by plain equality.

use crate::prefs::{Preferences, PrefsError};
use log::{info, warn};
use thiserror::Error;

/// Preference key holding the gate secret.
pub const PASSWORD_KEY: &str = "password";

#[derive(Debug, Error)]
pub enum GateError {
    #[error("incorrect password")]
    WrongPassword,
    #[error("new password cannot be empty")]
    EmptyPassword,
    #[error(transparent)]
    Prefs(#[from] PrefsError),
}

/// Proof that the gate was passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unlocked(());

/// Checks user input against the stored secret.
pub struct SessionGate {
    prefs: Preferences,
    default_password: String,
}

impl SessionGate {
    /// Installs `default_password` when the store has no secret yet.
    pub fn install(
        mut prefs: Preferences,
        default_password: impl Into<String>,
    ) -> Result<Self, GateError> {
        let default_password = default_password.into();
        if !prefs.contains(PASSWORD_KEY) {
            prefs.put_string(PASSWORD_KEY, default_password.clone())?;
            info!("event=gate_install module=session status=ok source=default");
        }
        Ok(Self {
            prefs,
            default_password,
        })
    }

    /// Returns `Unlocked` when `input` equals the stored secret.
    pub fn unlock(&self, input: &str) -> Result<Unlocked, GateError> {
        let stored = self
            .prefs
            .get_string(PASSWORD_KEY)
            .unwrap_or(self.default_password.as_str());
        if input == stored {
            info!("event=gate_unlock module=session status=ok");
            Ok(Unlocked(()))
        } else {
            warn!("event=gate_unlock module=session status=rejected");
            Err(GateError::WrongPassword)
        }
    }

    /// Replaces the secret after checking the current one.
    pub fn change_password(&mut self, current: &str, new_password: &str) -> Result<(), GateError> {
        self.unlock(current)?;
        if new_password.is_empty() {
            return Err(GateError::EmptyPassword);
        }
        self.prefs.put_string(PASSWORD_KEY, new_password)?;
        info!("event=gate_change module=session status=ok");
        Ok(())
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_installs_default() {
        let gate = SessionGate::install(Preferences::in_memory(), "1234").unwrap();
        assert!(gate.unlock("1234").is_ok());
        assert!(matches!(gate.unlock("0000"), Err(GateError::WrongPassword)));
        assert_eq!(gate.preferences().get_string(PASSWORD_KEY), Some("1234"));
    }

    #[test]
    fn existing_secret_is_kept() {
        let mut prefs = Preferences::in_memory();
        prefs.put_string(PASSWORD_KEY, "hunter2").unwrap();

        let gate = SessionGate::install(prefs, "1234").unwrap();
        assert!(gate.unlock("hunter2").is_ok());
        assert!(gate.unlock("1234").is_err());
    }

    #[test]
    fn change_password_requires_current_secret() {
        let mut gate = SessionGate::install(Preferences::in_memory(), "1234").unwrap();

        assert!(matches!(
            gate.change_password("bad", "next"),
            Err(GateError::WrongPassword)
        ));
        assert!(matches!(
            gate.change_password("1234", ""),
            Err(GateError::EmptyPassword)
        ));
        gate.change_password("1234", "next").unwrap();
        assert!(gate.unlock("next").is_ok());
    }
}
