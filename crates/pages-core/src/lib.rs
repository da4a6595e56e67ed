//! # pages-core
//!
//! Landing page authoring and rendering domain, free of I/O so it runs both
//! in the browser (WASM) and on the server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        FormState                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │   Gallery    │  │ VideoChoice  │  │  PreviewRegistry   │  │
//! │  │  (ordering)  │──│              │──│  (handle lifetime) │  │
//! │  └──────────────┘  └──────────────┘  └────────────────────┘  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ draft()
//!                                ▼
//!                     PageDraft ──► upload pipeline ──► LandingPageRecord
//!                                                             │
//!                                       PublicPage::from_record ◄┘
//! ```
//!
//! Files and preview handles are generic (`SelectedFile`, `PreviewAllocator`)
//! so the same form logic drives browser object URLs and server-side buffers.

pub mod asset;
pub mod contact;
pub mod error;
pub mod form;
pub mod gallery;
pub mod model;
pub mod palette;
pub mod render;
pub mod session;
pub mod slug;
pub mod text;
pub mod video;

pub use asset::{
    AssetId, AssetKind, AssetReference, AssetRejection, DetachedPreviews, PreviewAllocator,
    PreviewHandle, PreviewRegistry, RejectReason, SelectedFile,
};
pub use contact::{ContactForm, ContactMessage};
pub use error::{PageError, Result, ValidationError};
pub use form::{BenefitItem, DraftImage, DraftVideo, FormState, PageDraft};
pub use gallery::Gallery;
pub use model::{
    BenefitFeature, LandingPageRecord, NewLandingPage, PageSummary, UploadedAssetMetadata,
};
pub use palette::{ColorChannel, ColorPalette, PaletteMode};
pub use render::{AssetUrlBase, PublicPage};
pub use session::{AuthState, UserId, UserIdentity};
pub use video::{VideoChoice, VideoMode};
