//! # patrak-lipi: Transliteration Engine for Patrak
//!
//! Turns Latin-script names into Marathi (Devanagari) and prepares the
//! finished display strings an invoice page prints.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Transliteration Architecture                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  InvoiceDisplay (display strings)                │  │
//! │  │  names ──► Transliterator       amounts ──► patrak-core          │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │  ┌────────────────────────────▼─────────────────────────────────────┐  │
//! │  │                   Transliterator (per word)                      │  │
//! │  └──────┬──────────────────────┬───────────────────────┬────────────┘  │
//! │         ▼                      ▼                       ▼               │
//! │  ┌──────────────┐   ┌─────────────────────┐   ┌────────────────┐      │
//! │  │  Dictionary  │   │   BackendService    │   │   Phonetic     │      │
//! │  │              │   │                     │   │                │      │
//! │  │ Known names  │   │ Optional external   │   │ Local rules,   │      │
//! │  │ exact/folded │   │ service, loaded     │   │ always there   │      │
//! │  │              │   │ once, bounded wait  │   │                │      │
//! │  └──────────────┘   └──────────┬──────────┘   └────────────────┘      │
//! │                                ▼                                        │
//! │                     ┌─────────────────────┐                            │
//! │                     │ HttpBackend (reqwest)│                           │
//! │                     └─────────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - Error types for config and backend failures
//! - [`dictionary`] - Proper-noun table
//! - [`phonetic`] - Local Latin → Devanagari rules
//! - [`backend`] - Backend capability traits and the shared load state
//! - [`http`] - HTTP implementation of the backend
//! - [`engine`] - Whole-text orchestration
//! - [`display`] - Invoice display preparation
//!
//! ## Usage
//!
//! ```rust
//! use patrak_lipi::{LipiConfig, Transliterator};
//!
//! let config = LipiConfig::default();
//! let engine = Transliterator::from_config(&config);
//!
//! let result = engine.transliterate_text_local("Pune 411002");
//! assert_eq!(result.text, "पुणे ४११००२");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod dictionary;
pub mod display;
pub mod engine;
pub mod error;
pub mod http;
pub mod phonetic;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{
    BackendLoader, BackendService, BackendStatus, TransliterateOptions, TransliterationBackend,
};
pub use config::{BackendSettings, DictionarySettings, LipiConfig};
pub use dictionary::Dictionary;
pub use display::InvoiceDisplay;
pub use engine::{Confidence, TransliterationResult, Transliterator};
pub use error::{LipiError, LipiResult};
pub use http::{HttpBackend, HttpBackendLoader};
