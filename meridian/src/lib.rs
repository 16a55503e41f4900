#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

//! `meridian` is the foundational settings core which powers the Meridian
//! file manager.
//!
//! It owns the two hard problems of the app's persisted state: walking a
//! user's settings forward through every schema revision exactly once
//! (safe to re-run after a crash), and keeping the home-banner media catalog
//! addressable by stable identifiers while legacy index-based references are
//! reconciled along the way.
//!
//! The physical settings file, the UI, and every other OS surface live in the
//! host application, which plugs in over the foreign callback traits
//! ([`store::SettingsStore`], [`logger::Logger`]).

/// The media catalog: builtin and user-added entries, stable position keys,
/// and the addressing rules shared with the migration steps.
pub mod catalog;

/// Logging bridge that forwards the `log` facade to the host application.
pub mod logger;

/// The schema-version tracker, the migration steps, and the driver that
/// walks a store to the latest schema version.
pub mod migration;

/// Reserved storage keys, the default settings shape, and the key-path
/// allow-list validator.
pub mod schema;

/// The persisted key-value store abstraction implemented by the host.
pub mod store;

uniffi::setup_scaffolding!("meridian");
