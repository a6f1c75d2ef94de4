#![forbid(unsafe_code)]

mod api;
mod config;
mod error;
mod notification;
mod persistence;
mod policy;

pub use api::Api;
pub use config::Config;
pub use error::Error;
pub use notification::Notification;
pub use persistence::Persistence;
pub use policy::BackupPolicy;
