//! # pages-publish
//!
//! Authoring-time pipeline and view-time resolver over pluggable backends.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Publisher (upload & persist)      PageResolver (slug → page) │
//! │         │            │                      │                 │
//! │   ObjectStore   RecordStore ◄───────────────┘                 │
//! │   (Strategy)    (Strategy)      SessionProvider  Notifier     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backends are traits: the in-memory implementations here serve development
//! and tests, `pages-runtime` provides the hosted one.

pub mod backend;
pub mod clock;
pub mod error;
pub mod notify;
pub mod publish;
pub mod resolver;
pub mod upload;

pub use backend::{
    MemoryObjectStore, MemoryRecordStore, ObjectStore, RecordStore, SessionProvider, StaticSessions,
    WriteOptions,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use notify::{ContactNotifier, SimulatedNotifier};
pub use publish::{PublishedPage, Publisher};
pub use resolver::PageResolver;
pub use upload::{LocalFile, UploadSource};
