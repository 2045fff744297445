//! Album and query value types consumed by the relevance engine.
//!
//! Everything here is a plain immutable value: albums are read from the
//! library store (or a JSON export), queries are built by the caller, and
//! neither is ever mutated in place.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// How well the user should already know the recommended albums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Familiarity {
    /// Played recently or a short-term favorite.
    CurrentFavorite,
    /// A medium- or long-term favorite.
    ReliableClassic,
    /// Nothing in the listening history points at it.
    UnderappreciatedGem,
}

impl std::fmt::Display for Familiarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CurrentFavorite => "current favorite",
            Self::ReliableClassic => "reliable classic",
            Self::UnderappreciatedGem => "underappreciated gem",
        };
        f.write_str(name)
    }
}

/// A user's mood preferences.
///
/// Every field is optional. `None` means "no preference", so
/// `Query::default()` matches every album with full relevance.
///
/// # Examples
///
/// ```
/// use libzy::model::{Familiarity, Query};
///
/// let query = Query {
///     familiarity: Some(Familiarity::ReliableClassic),
///     valence: Some(0.8),
///     ..Default::default()
/// };
/// assert!(!query.is_empty());
/// assert!(Query::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub familiarity: Option<Familiarity>,
    pub instrumental: Option<bool>,
    pub acousticness: Option<f64>,
    pub valence: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub genres: Option<BTreeSet<String>>,
}

impl Query {
    /// Genres to filter on, if any. An empty set is treated as no filter.
    #[must_use]
    pub fn genre_filter(&self) -> Option<&BTreeSet<String>> {
        self.genres.as_ref().filter(|genres| !genres.is_empty())
    }

    /// True when no parameter at all was specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.familiarity.is_none()
            && self.instrumental.is_none()
            && self.acousticness.is_none()
            && self.valence.is_none()
            && self.energy.is_none()
            && self.danceability.is_none()
            && self.genre_filter().is_none()
    }

    /// Number of parameters the query specifies.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        [
            self.familiarity.is_some(),
            self.instrumental.is_some(),
            self.acousticness.is_some(),
            self.valence.is_some(),
            self.energy.is_some(),
            self.danceability.is_some(),
            self.genre_filter().is_some(),
        ]
        .into_iter()
        .filter(|&present| present)
        .count()
    }
}

/// Continuous audio characteristics of an album, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub energy: f64,
    pub danceability: f64,
}

/// Listening-history signals for an album. The flags are independent.
///
/// Tuples are ordered by [`FamiliarityTuple::familiarity_score`], so sorting
/// puts albums the user knows best last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamiliarityTuple {
    pub recently_played: bool,
    pub short_term_favorite: bool,
    pub medium_term_favorite: bool,
    pub long_term_favorite: bool,
}

impl FamiliarityTuple {
    #[must_use]
    pub const fn new(
        recently_played: bool,
        short_term_favorite: bool,
        medium_term_favorite: bool,
        long_term_favorite: bool,
    ) -> Self {
        Self {
            recently_played,
            short_term_favorite,
            medium_term_favorite,
            long_term_favorite,
        }
    }

    /// No listening signal at all.
    #[must_use]
    pub const fn is_low_familiarity(&self) -> bool {
        !(self.recently_played
            || self.short_term_favorite
            || self.medium_term_favorite
            || self.long_term_favorite)
    }

    /// Weighted sum in `0..=15`: recently played 1, short term 2,
    /// medium term 4, long term 8.
    ///
    /// ```
    /// use libzy::model::FamiliarityTuple;
    ///
    /// assert_eq!(FamiliarityTuple::new(true, false, false, true).familiarity_score(), 9);
    /// ```
    #[must_use]
    pub const fn familiarity_score(&self) -> u8 {
        self.recently_played as u8
            | (self.short_term_favorite as u8) << 1
            | (self.medium_term_favorite as u8) << 2
            | (self.long_term_favorite as u8) << 3
    }

    /// Whether this tuple satisfies the requested familiarity.
    #[must_use]
    pub const fn satisfies(&self, familiarity: Familiarity) -> bool {
        match familiarity {
            Familiarity::CurrentFavorite => self.recently_played || self.short_term_favorite,
            Familiarity::ReliableClassic => self.medium_term_favorite || self.long_term_favorite,
            Familiarity::UnderappreciatedGem => self.is_low_familiarity(),
        }
    }
}

impl Ord for FamiliarityTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.familiarity_score().cmp(&other.familiarity_score())
    }
}

impl PartialOrd for FamiliarityTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A candidate album from the user's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAlbum {
    pub id: String,
    pub spotify_uri: String,
    pub title: String,
    pub artists: Vec<String>,
    #[serde(default)]
    pub art_url: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    pub audio_features: AudioFeatures,
    #[serde(default)]
    pub familiarity: FamiliarityTuple,
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl LibraryAlbum {
    /// True if the album carries at least one of `genres`.
    #[must_use]
    pub fn has_any_genre(&self, genres: &BTreeSet<String>) -> bool {
        !self.genres.is_disjoint(genres)
    }
}

/// What the caller needs to show and play a recommended album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumResult {
    pub title: String,
    pub artists: Vec<String>,
    pub spotify_uri: String,
    pub art_url: Option<String>,
}

impl From<&LibraryAlbum> for AlbumResult {
    fn from(album: &LibraryAlbum) -> Self {
        Self {
            title: album.title.clone(),
            artists: album.artists.clone(),
            spotify_uri: album.spotify_uri.clone(),
            art_url: album.art_url.clone(),
        }
    }
}

impl std::fmt::Display for AlbumResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artists.join(", "), self.title)
    }
}
