//! # WebDAV Client
//!
//! The remote side of the mirror: a [`RemoteStore`] trait covering the
//! three operations the mirror needs, and a `reqwest` based
//! [`WebDavClient`] implementing it.

pub mod client;
pub mod error;
pub mod store;

pub use client::WebDavClient;
pub use error::{DavError, Result};
pub use store::{Content, RemoteStore};
