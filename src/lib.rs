pub mod config;
pub mod error;
pub mod notifier;
pub mod observability;
pub mod poller;
pub mod registry;
pub mod scheduler;
pub mod snapshot;
pub mod types;
