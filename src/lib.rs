//! Mood-based album recommendations from a personal music library.
//!
//! Core modules:
//! - [`model`] - Album, familiarity and query value types
//! - [`algorithm`] - Relevance scoring, album and genre ranking
//! - [`category`] - Grouping albums by the query parameters they match
//!
//! ### Supporting Modules
//!
//! - [`db`] - SQLite library store
//! - [`config`] - Data directory and runtime settings
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use libzy::{algorithm, config, db};
//! use libzy::model::{Familiarity, Query};
//!
//! let config = config::RuntimeConfig::load()?;
//! let conn = db::connect(&config.db_path)?;
//! let albums = db::retrieve_albums(&conn)?;
//!
//! let query = Query {
//!     familiarity: Some(Familiarity::UnderappreciatedGem),
//!     acousticness: Some(0.9),
//!     energy: Some(0.2),
//!     ..Default::default()
//! };
//!
//! for album in algorithm::recommend_albums(&albums, &query, &config.relevance_context()) {
//!     println!("{album}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Algorithm Details
//!
//! - Genre and familiarity preferences are hard filters: an album failing
//!   either scores 0.
//! - Instrumental, acousticness, valence, energy and danceability targets
//!   are scored per album and averaged.
//! - Albums scoring below the relevance threshold (0.5 by default) are
//!   dropped; the rest are ranked by score, ties in library order.
//!
//! ## Error Handling
//!
//! Scoring never fails. Store and configuration functions return
//! `anyhow::Result` with context describing what went wrong.

pub mod algorithm;
pub mod category;
pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod model;
