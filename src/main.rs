//! # Libzy
//!
//! Recommends albums from your library that fit a mood query.
//!
//! ## Usage
//!
//! ```bash
//! # Load a library export
//! libzy import library.json
//!
//! # Upbeat rock you already love
//! libzy recommend --valence 0.9 --energy 0.8 --genre rock --familiarity reliable-classic
//!
//! # Which genres fit a quiet evening
//! libzy genres --energy 0.2 --acousticness 0.8
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use libzy::model::{AlbumResult, LibraryAlbum, Query};
use libzy::{algorithm, category, cli, completion, config, db};
use log::{debug, info};

/// Albums from the configured library database.
fn load_library(config: &config::RuntimeConfig) -> Result<Vec<LibraryAlbum>> {
    let conn = db::connect(&config.db_path)?;
    let albums = db::retrieve_albums(&conn)?;
    if albums.is_empty() {
        eprintln!("The library is empty. Import albums first: libzy import <file.json>");
    }
    Ok(albums)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the Libzy application.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug libzy recommend ...` - Enable debug logging
/// - `RUST_LOG=libzy::algorithm=trace libzy recommend ...` - Per-album scores
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let mut config = config::RuntimeConfig::load()?;
    if let Some(db_path) = &args.db {
        config = config.with_db_path(db_path)?;
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    debug!("Using library database {}", config.db_path.display());
    let context = config.relevance_context();

    match args.command {
        cli::Command::Import { path, replace } => {
            let path = config::absolute_path(&path)?;
            info!("Importing albums from: {}", path.display());
            let albums = db::read_library_json(&path)?;

            let mut conn = db::connect(&config.db_path)?;
            if replace {
                db::clear_library(&conn)?;
            }
            let stored = db::insert_albums(&mut conn, &albums)?;
            println!(
                "Imported {stored} albums ({} in library).",
                db::count_albums(&conn)?
            );
        }
        cli::Command::List => {
            for album in load_library(&config)? {
                println!(
                    "{:>2}  {} - {}  [{}]",
                    album.familiarity.familiarity_score(),
                    album.artists.join(", "),
                    album.title,
                    album.genres.iter().cloned().collect::<Vec<_>>().join(", ")
                );
            }
        }
        cli::Command::Recommend { query, limit, json } => {
            let query = Query::from(query);
            let albums = load_library(&config)?;
            info!("Recommending albums for {} query parameters", query.parameter_count());

            let limit = limit.unwrap_or(usize::MAX);
            if json {
                let results: Vec<AlbumResult> = algorithm::recommend_albums(&albums, &query, &context)
                    .into_iter()
                    .take(limit)
                    .collect();
                print_json(&results)?;
            } else {
                for (album, relevance) in algorithm::rank_relevant_albums(&albums, &query, &context)
                    .into_iter()
                    .take(limit)
                {
                    println!("{relevance:.3}  {}", AlbumResult::from(album));
                }
            }
        }
        cli::Command::Genres { query, limit } => {
            let query = Query::from(query);
            let albums = load_library(&config)?;

            let genres = algorithm::recommend_genres(&albums, &query, &context);
            for genre in genres.into_iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{genre}");
            }
        }
        cli::Command::Categories { query, json } => {
            let query = Query::from(query);
            let albums = load_library(&config)?;

            let categories = category::recommend_categories(&albums, &query, &context);
            if json {
                print_json(&categories)?;
            } else {
                for category in &categories {
                    println!("== {} ==", category.relevance);
                    for album in &category.albums {
                        println!("   {album}");
                    }
                }
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
