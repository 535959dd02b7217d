// src/api/mod.rs
// Typed calls for each REST endpoint the client uses

pub mod auth;
pub mod timesheet;

/// Endpoint paths, relative to the configured base URL
pub mod paths {
    pub const LOGIN: &str = "User/login";
    pub const SECURE: &str = "User/secure";
    pub const REGISTER: &str = "User/register";
    pub const LOGOUT: &str = "Auth/logout";
    pub const TIMESHEET: &str = "timesheet";
}

pub use auth::{AuthApi, LoginOutcome};
pub use timesheet::TimesheetApi;
