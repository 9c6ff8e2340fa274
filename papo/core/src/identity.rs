//! Local identity (display name)

use std::fmt;

/// Name used until the user picks one
pub const DEFAULT_USERNAME: &str = "Guest";

/// The display name this client announces to the relay.
///
/// Owned by the session; the relay only learns about changes through the
/// next `JoinChat` that gets sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    /// Create an identity with the given name
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Current display name
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Replace the display name.
    ///
    /// Returns `false` (and keeps the old name) when `new_name` is absent or
    /// empty, e.g. the user dismissed the rename prompt.
    pub fn rename(&mut self, new_name: Option<&str>) -> bool {
        match new_name {
            Some(name) if !name.is_empty() => {
                self.username = name.to_string();
                true
            }
            _ => false,
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}
