#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

/// Native filesystem client boundary
pub mod client;
pub mod config;
mod entry;
pub mod errno;
mod error;
mod executor;
/// Proxied open-file handles
pub mod fs;
pub mod mime;
pub mod provider;
pub mod thumbs;

pub use entry::{DocumentEntry, EntryDecorator, EntryFlags, IconHint};
pub use error::{Error, Result};
pub use executor::Executor;
pub use provider::Provider;
