// taskhub client
// Session-aware client for the task API plus the local filter/sort engine

pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod output;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{AuthError, ClientError, Result};
pub use filter::{apply_filters, filter_groups, FilterCriteria};
pub use services::{AuthApi, SessionClient, TaskApi};
pub use session::Session;
