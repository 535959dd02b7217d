// src/navigation.rs
// Where the user is sent after session changes

use std::sync::Mutex;

use tracing::info;

/// Login entry point; target of every forced logout
pub const LOGIN_PATH: &str = "/login";

/// Landing location after a successful login
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Receives client-driven navigation.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Keeps every location it was sent to, newest last.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(path: &str) -> Self {
        Self {
            entries: Mutex::new(vec![path.to_string()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }

    pub fn redirects(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of times `path` was visited
    pub fn count(&self, path: &str) -> usize {
        self.entries
            .lock()
            .map(|e| e.iter().filter(|p| p.as_str() == path).count())
            .unwrap_or(0)
    }
}

impl Navigator for History {
    fn redirect(&self, path: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(path.to_string());
        }
    }
}

/// Terminal stand-in for a browser location: tells the user what to run next.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        info!(path, "redirect");
        match path {
            LOGIN_PATH => eprintln!("Session ended. Sign in again with: timesheet login"),
            DASHBOARD_PATH => eprintln!("Signed in. Try: timesheet list"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_tracks_current() {
        let history = History::starting_at("/timesheet");
        assert_eq!(history.current().as_deref(), Some("/timesheet"));

        history.redirect(LOGIN_PATH);
        assert_eq!(history.current().as_deref(), Some(LOGIN_PATH));
        assert_eq!(history.count(LOGIN_PATH), 1);
        assert_eq!(history.redirects(), vec!["/timesheet", LOGIN_PATH]);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.current().is_none());
        assert_eq!(history.count(LOGIN_PATH), 0);
    }
}
