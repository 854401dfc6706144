//! # Gisthook Core Library
//!
//! This crate contains the core logic of the `gisthook` tool – a build-time fetcher that lets C/C++
//! sources include remotely hosted GitHub gists as if they were local headers.
//!
//! Sources reference a gist with `#include <gist/github/NAME>`. A sync run scans the project,
//! looks every referenced name up in the owner's gist listing, and downloads into
//! `gist/github/` only the gists whose `updated_at` differs from the one recorded in
//! `gist/github/desc.json`.
//!
//! ## Modules Overview
//! - [`extract`] – Finding gist include directives in source text
//! - [`scan`] – Walking the source tree and building the required list
//! - [`catalog`] – Fetching the gist listing and resolving names to URLs and versions
//! - [`manifest`] – The persisted record of synced versions (`desc.json`)
//! - [`sync`] – Deciding what is stale and downloading it
//! - [`fetch`] – The HTTP transport
//! - [`config`] – `gisthook.toml` and the project path layout
//! - [`error`] – Error types


pub mod extract;
pub mod scan;
pub mod catalog;
pub mod manifest;
pub mod sync;
pub mod fetch;
pub mod config;
pub mod error;

pub use extract::*;
pub use scan::*;
pub use catalog::*;
pub use manifest::*;
pub use sync::*;
pub use fetch::*;
pub use config::*;
pub use error::*;
