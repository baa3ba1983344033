//! Local audio collection indexer.
//!
//! [`library::scan`] turns a set of root directories into a [`library::Catalog`]:
//! albums grouped by case-insensitive title, compilations detected, tracks and
//! albums in a deterministic order. [`rescan`] watches for the volumes holding
//! those roots to come and go.

pub mod config;
pub mod library;
pub mod rescan;
