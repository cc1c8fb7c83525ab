//! Login and admin gate.
//!
//! A single shared username/password pair opens a session. The session
//! token is a random UUID and must accompany every request. Admin pages
//! additionally need the session unlocked with the admin password.
//! Sessions idle for longer than the timeout are dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{sha256_hex, HandoverConfig};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired session")]
    InvalidSession,

    #[error("admin access is locked for this session")]
    AdminLocked,
}

/// Roughly one ward shift.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone)]
struct Session {
    admin_unlocked: bool,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            admin_unlocked: false,
            last_seen: Instant::now(),
        }
    }
}

/// In-process session table.
#[derive(Debug)]
pub struct AuthGate {
    username: String,
    password_digest: String,
    admin_password_digest: String,
    sessions: HashMap<String, Session>,
    idle_timeout: Duration,
}

impl AuthGate {
    pub fn new(config: &HandoverConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_digest: config.password_digest().to_string(),
            admin_password_digest: config.admin_password_digest().to_string(),
            sessions: HashMap::new(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Check credentials and open a session, returning its token.
    pub fn login(&mut self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.username || sha256_hex(password) != self.password_digest {
            warn!(username, "Rejected login");
            return Err(AuthError::InvalidCredentials);
        }
        self.prune_idle();
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), Session::new());
        info!(username, "Opened session");
        Ok(token)
    }

    /// Check a token and mark the session as active.
    pub fn require(&mut self, token: &str) -> Result<(), AuthError> {
        self.touch(token).map(|_| ())
    }

    pub fn unlock_admin(&mut self, token: &str, admin_password: &str) -> Result<(), AuthError> {
        let admin_password_digest = self.admin_password_digest.clone();
        let session = self.touch(token)?;
        if sha256_hex(admin_password) != admin_password_digest {
            warn!("Rejected admin unlock");
            return Err(AuthError::InvalidCredentials);
        }
        session.admin_unlocked = true;
        info!("Unlocked admin for session");
        Ok(())
    }

    pub fn require_admin(&mut self, token: &str) -> Result<(), AuthError> {
        if self.touch(token)?.admin_unlocked {
            Ok(())
        } else {
            Err(AuthError::AdminLocked)
        }
    }

    /// Revoke a session. Unknown tokens are ignored.
    pub fn logout(&mut self, token: &str) {
        if self.sessions.remove(token).is_some() {
            info!("Closed session");
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn touch(&mut self, token: &str) -> Result<&mut Session, AuthError> {
        let idle_timeout = self.idle_timeout;
        let expired = match self.sessions.get(token) {
            Some(s) => s.last_seen.elapsed() >= idle_timeout,
            None => return Err(AuthError::InvalidSession),
        };
        if expired {
            self.sessions.remove(token);
            info!("Session expired");
            return Err(AuthError::InvalidSession);
        }
        let session = self
            .sessions
            .get_mut(token)
            .ok_or(AuthError::InvalidSession)?;
        session.last_seen = Instant::now();
        Ok(session)
    }

    fn prune_idle(&mut self) {
        let idle_timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| s.last_seen.elapsed() < idle_timeout);
        let pruned = before - self.sessions.len();
        if pruned > 0 {
            info!(pruned, "Dropped idle sessions");
        }
    }
}
