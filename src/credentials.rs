use std::fmt;

pub const USER_VAR: &str = "GITBOOK_USER";
pub const PASSWD_VAR: &str = "GITBOOK_PASSWD";

/// A GitBook username and password, held only for the lifetime of the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `GITBOOK_USER` / `GITBOOK_PASSWD` and clears both variables.
    ///
    /// Returns `None` when `GITBOOK_USER` is unset or empty, in which case the
    /// environment is left untouched. Otherwise both variables are overwritten
    /// with empty strings before returning, so they cannot be read back through
    /// `/proc/<pid>/environ` or by child processes.
    ///
    /// Call this once at startup, before any other thread is spawned.
    pub fn take_from_env() -> Option<Self> {
        let username = std::env::var(USER_VAR).unwrap_or_default();
        if username.is_empty() {
            return None;
        }
        let password = std::env::var(PASSWD_VAR).unwrap_or_default();
        clear_env();
        Some(Self { username, password })
    }
}

#[allow(unsafe_code)]
fn clear_env() {
    // SAFETY: only called from `take_from_env`, which runs on the main thread
    // during startup, before the HTTP client or any other thread exists.
    unsafe {
        std::env::set_var(USER_VAR, "");
        std::env::set_var(PASSWD_VAR, "");
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_password() {
        let c = Credentials::new("jdoe", "hunter2");
        let shown = format!("{:?}", c);
        assert!(shown.contains("jdoe"));
        assert!(!shown.contains("hunter2"));
    }
}
