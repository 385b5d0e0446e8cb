//! # davsync core
//!
//! One-way mirror of a local directory tree onto a WebDAV store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             Mirror                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ RawChange ──► EventClassifier ──► MappedOperation ──► Dispatcher │
//! │                      │                                    │      │
//! │                      ▼                                    ▼      │
//! │                RootPair::map                RemoteStore + Sink   │
//! │                                                                  │
//! │  WatchRegistry ◄── directory create / remove                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mirror;
pub mod notification;
pub mod paths;

pub use classify::{EventClassifier, IgnoreReason, MappedOperation, OperationKind};
pub use config::{DEFAULT_CONFIG_FILE, MirrorConfig};
pub use dispatch::{DispatchFailure, Dispatcher, Outcome};
pub use error::{ConfigError, MirrorError, Result};
pub use mirror::Mirror;
pub use notification::{DesktopNotifier, LogNotifier, NotificationSink};
pub use paths::RootPair;
