//! The scrape coordinator: one actor owning the store, whose mailbox is the
//! exclusive section serializing every scrape cycle and read query.

mod actor;
mod timer;

pub use actor::{CoordinatorArgs, CoordinatorHandle, RefreshStats, spawn};
pub use timer::spawn_scrape_timer;
