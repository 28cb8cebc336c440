//! Plain-text Item Registry
//!
//! Lost-and-found items are recorded in a single text file and kept in
//! insertion order.

pub mod domain;
pub use domain::{Config, ConfigError, Field, FieldError, Item};

/// Text persistence for items.
pub mod storage;
pub use storage::{Listing, LoadError, SaveError, Store};
