// src/lib.rs
// Timesheet REST client: bearer-token session handling plus typed endpoints

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod session;

pub use client::AuthClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result, StoreError};
pub use navigation::{ConsoleNavigator, History, Navigator};
pub use session::{CredentialStore, FileStore, MemoryStore, Session};
