use std::thread;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{auth::AuthUser, session::SessionStore},
    error::{AppError, AppResult},
    model::user::User,
    models::LoginReqDto,
    utils::roster::Directory,
};

/// Who is logged in, backed by a swappable session store.
#[derive(Debug)]
pub struct AuthState<S> {
    current: Option<User>,
    store: S,
    login_delay: Duration,
}

impl<S: SessionStore> AuthState<S> {
    pub fn new(store: S, login_delay: Duration) -> Self {
        Self {
            current: None,
            store,
            login_delay,
        }
    }

    /// Picks up the session saved by a previous run. A session that cannot
    /// be read back is discarded and the state starts logged out.
    pub fn restore(&mut self) -> AppResult<()> {
        match self.store.load() {
            Ok(Some(user)) => {
                info!(user_id = %user.id, role = %user.role(), "Session restored");
                self.current = Some(user);
            }
            Ok(None) => debug!("No stored session"),
            Err(AppError::SessionFormat(e)) => {
                warn!(error = %e, "Discarding unreadable session");
                self.store.clear()?;
                self.current = None;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Checks the credentials against the directory. A mismatch is `Ok(false)`
    /// and leaves both the state and the store untouched.
    #[instrument(name = "auth_login", skip(self, directory, req), fields(email = %req.email))]
    pub fn login(&mut self, directory: &Directory, req: &LoginReqDto) -> AppResult<bool> {
        info!("Login request received");

        if !self.login_delay.is_zero() {
            thread::sleep(self.login_delay);
        }

        let Some(user) = directory.find_by_credentials(&req.email, &req.password) else {
            info!("Invalid credentials");
            return Ok(false);
        };

        self.store.save(user)?;
        self.current = Some(user.clone());

        info!(user_id = %user.id, role = %user.role(), "Login successful");
        Ok(true)
    }

    pub fn logout(&mut self) -> AppResult<()> {
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "Logged out");
        }
        self.store.clear()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn require_user(&self) -> AppResult<AuthUser> {
        self.current
            .as_ref()
            .map(AuthUser::from)
            .ok_or(AppError::NotAuthenticated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
