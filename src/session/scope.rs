use std::sync::Mutex;

use super::{BuildSession, Result, SessionError};

/// Holds the one active [`BuildSession`], if any.
///
/// Collaborators receive the scope by reference and reach the build through
/// [`SessionScope::with`]. Calling it while no session is active is a
/// programming error and is reported as [`SessionError::OutsideScope`].
#[derive(Default)]
pub struct SessionScope {
    active: Mutex<Option<BuildSession>>,
}

impl SessionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope with `session` already active.
    pub fn active(session: BuildSession) -> Self {
        let scope = Self::new();
        scope.begin(session);
        scope
    }

    /// Make `session` the active session, replacing any previous one.
    pub fn begin(&self, session: BuildSession) {
        let mut active = self.active.lock().expect("session lock poisoned");
        if active.is_some() {
            tracing::warn!("Replacing an already active build session");
        }
        *active = Some(session);
    }

    /// End the active session and hand it back.
    pub fn end(&self) -> Option<BuildSession> {
        self.active.lock().expect("session lock poisoned").take()
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().expect("session lock poisoned").is_some()
    }

    /// Run `f` against the active session.
    pub fn with<R>(&self, f: impl FnOnce(&mut BuildSession) -> R) -> Result<R> {
        let mut active = self.active.lock().expect("session lock poisoned");
        match active.as_mut() {
            Some(session) => Ok(f(session)),
            None => {
                tracing::error!("Build state accessed with no active session");
                Err(SessionError::OutsideScope)
            }
        }
    }

    /// Like [`with`](Self::with) for operations that can fail themselves.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut BuildSession) -> Result<R>) -> Result<R> {
        self.with(f)?
    }
}
