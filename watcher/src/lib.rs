//! # Directory Watcher
//!
//! Keeps the set of local directories subscribed for change notifications
//! and turns backend events into raw changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ExclusionFilter ──► WatchRegistry ──► WatchSource (notify)     │
//! │                                             │                   │
//! │                                             ▼                   │
//! │                      notify::Event ──► RawChange + ChangeKinds  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod event;
pub mod exclude;
pub mod registry;
pub mod source;

pub use error::{Result, WatcherError};
pub use event::{ChangeKinds, RawChange};
pub use exclude::ExclusionFilter;
pub use registry::{SeedReport, WatchRegistry};
pub use source::{SourceEvent, WatchSource, channel_watcher};
