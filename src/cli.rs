//! # Command-Line Interface Module
//!
//! Clap definitions for the `libzy` binary.
//!
//! ## Commands
//!
//! - `import`: Load a JSON album export into the library
//! - `list`: Display all albums with their familiarity score
//! - `recommend`: Rank albums for a mood query
//! - `genres`: Rank genres for a mood query
//! - `categories`: Group albums by which query parameters they match
//!
//! ## Examples
//!
//! ```bash
//! libzy import ~/spotify-library.json
//! libzy recommend --valence 0.8 --energy 0.7 --genre rock
//! libzy categories --familiarity reliable-classic --acousticness 0.9
//! ```

use crate::model::{Familiarity, Query};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Familiarity choices on the command line.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum FamiliarityArg {
    /// Recently played or short-term favorites
    CurrentFavorite,
    /// Medium- or long-term favorites
    ReliableClassic,
    /// Albums with no listening history
    UnderappreciatedGem,
}

impl From<FamiliarityArg> for Familiarity {
    fn from(arg: FamiliarityArg) -> Self {
        match arg {
            FamiliarityArg::CurrentFavorite => Self::CurrentFavorite,
            FamiliarityArg::ReliableClassic => Self::ReliableClassic,
            FamiliarityArg::UnderappreciatedGem => Self::UnderappreciatedGem,
        }
    }
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "libzy")]
#[command(about = "Libzy: mood-based album recommendations from your own music library")]
#[command(version)]
pub struct Args {
    /// Library database to use instead of the one in the data directory
    #[arg(long, global = true, env = "LIBZY_DB", value_hint = clap::ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Minimum relevance (0.0 to 1.0) for an album to be recommended
    #[arg(long, global = true, value_parser = parse_unit_interval)]
    pub threshold: Option<f64>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import albums from a JSON file
    ///
    /// The file must contain an array of albums with their audio features,
    /// familiarity flags and genres. Existing albums with the same id are
    /// updated.
    Import {
        /// Path to the JSON album export
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,

        /// Remove all albums from the library before importing
        #[arg(long)]
        replace: bool,
    },

    /// List all albums in the library
    List,

    /// Recommend albums for a mood query
    Recommend {
        #[command(flatten)]
        query: QueryArgs,

        /// Show at most this many albums
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend genres for a mood query
    ///
    /// Genres are ranked by the summed relevance of the matching albums
    /// that carry them.
    Genres {
        #[command(flatten)]
        query: QueryArgs,

        /// Show at most this many genres
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Group albums by the query parameters they satisfy
    Categories {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the categories as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: libzy completion bash > ~/.local/share/bash-completion/completions/libzy
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Mood query flags shared by the recommendation commands.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct QueryArgs {
    /// How well known the albums should be
    #[arg(long, value_enum)]
    pub familiarity: Option<FamiliarityArg>,

    /// Prefer instrumental (true) or vocal (false) albums
    #[arg(long)]
    pub instrumental: Option<bool>,

    /// Target acousticness, 0.0 to 1.0
    #[arg(long, value_parser = parse_unit_interval)]
    pub acousticness: Option<f64>,

    /// Target valence (musical positiveness), 0.0 to 1.0
    #[arg(long, value_parser = parse_unit_interval)]
    pub valence: Option<f64>,

    /// Target energy, 0.0 to 1.0
    #[arg(long, value_parser = parse_unit_interval)]
    pub energy: Option<f64>,

    /// Target danceability, 0.0 to 1.0
    #[arg(long, value_parser = parse_unit_interval)]
    pub danceability: Option<f64>,

    /// Only albums with this genre (repeatable)
    #[arg(long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,
}

impl From<QueryArgs> for Query {
    fn from(args: QueryArgs) -> Self {
        let genres: BTreeSet<String> = args.genres.into_iter().collect();
        Self {
            familiarity: args.familiarity.map(Familiarity::from),
            instrumental: args.instrumental,
            acousticness: args.acousticness,
            valence: args.valence,
            energy: args.energy,
            danceability: args.danceability,
            genres: (!genres.is_empty()).then_some(genres),
        }
    }
}

/// Parse a float and reject values outside `[0.0, 1.0]`.
pub fn parse_unit_interval(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("`{value}' is not a number"))?;
    match (0.0..=1.0).contains(&parsed) {
        true => Ok(parsed),
        false => Err(format!("{parsed} is outside 0.0..=1.0")),
    }
}
