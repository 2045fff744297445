//! Album relevance scoring for mood queries.
//!
//! Scores how well each library album fits a [`Query`], filters out albums
//! below the relevance threshold and ranks the rest.
//!
//! ## Scoring
//!
//! ```text
//! relevance(album) = 0                        if a genre or familiarity filter fails
//!                  = mean(criterion scores)   if any continuous criterion is queried
//!                  = 1                        otherwise
//! ```
//!
//! Genre and familiarity are hard filters. Instrumentalness, acousticness,
//! valence, energy and danceability are soft criteria that get averaged.

use crate::model::{AlbumResult, LibraryAlbum, Query};
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::HashMap;

/// Default minimum relevance an album needs to be recommended.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.5;

/// Parameters of a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceContext {
    /// Inclusive lower bound for an album to count as relevant.
    pub threshold: f64,
}

impl Default for RelevanceContext {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

impl RelevanceContext {
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn is_relevant(&self, relevance: f64) -> bool {
        relevance >= self.threshold
    }
}

/// A continuous audio criterion a query can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCriterion {
    Instrumental,
    Acousticness,
    Valence,
    Energy,
    Danceability,
}

/// Genre hard filter. Passes when the query has no genre filter.
#[must_use]
pub fn matches_genre(album: &LibraryAlbum, query: &Query) -> bool {
    query
        .genre_filter()
        .map_or(true, |genres| album.has_any_genre(genres))
}

/// Familiarity hard filter. Passes when the query has no familiarity preference.
#[must_use]
pub fn matches_familiarity(album: &LibraryAlbum, query: &Query) -> bool {
    query
        .familiarity
        .map_or(true, |familiarity| album.familiarity.satisfies(familiarity))
}

/// Per-criterion scores for every continuous criterion present in `query`,
/// in a fixed criterion order.
#[must_use]
pub fn criterion_scores(album: &LibraryAlbum, query: &Query) -> Vec<(AudioCriterion, f64)> {
    let features = &album.audio_features;

    let instrumental = query.instrumental.map(|wanted| {
        let score = match wanted {
            true => features.instrumentalness,
            false => 1.0 - features.instrumentalness,
        };
        (AudioCriterion::Instrumental, score)
    });

    let targeted = [
        (AudioCriterion::Acousticness, query.acousticness, features.acousticness),
        (AudioCriterion::Valence, query.valence, features.valence),
        (AudioCriterion::Energy, query.energy, features.energy),
        (AudioCriterion::Danceability, query.danceability, features.danceability),
    ]
    .into_iter()
    .filter_map(|(criterion, target, value)| {
        target.map(|target| (criterion, distance_similarity(target, value)))
    });

    instrumental
        .into_iter()
        .chain(targeted)
        .map(|(criterion, score)| (criterion, score.clamp(0.0, 1.0)))
        .collect()
}

/// Linear similarity between a target and an actual value, both in `[0, 1]`.
#[inline]
fn distance_similarity(target: f64, value: f64) -> f64 {
    1.0 - (target - value).abs()
}

/// Mean of the given scores, or full relevance when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_score(scores: &[(AudioCriterion, f64)]) -> f64 {
    match scores.len() {
        0 => 1.0,
        len => scores.iter().map(|(_, score)| score).sum::<f64>() / len as f64,
    }
}

/// Relevance of `album` for `query`, in `[0.0, 1.0]`.
///
/// Failing the genre or familiarity filter yields exactly `0.0` without
/// looking at the audio features.
///
/// # Examples
///
/// ```
/// use libzy::algorithm::calculate_album_relevance;
/// use libzy::model::{AudioFeatures, FamiliarityTuple, LibraryAlbum, Query};
///
/// let album = LibraryAlbum {
///     id: "a".into(),
///     spotify_uri: "spotify:album:a".into(),
///     title: "A".into(),
///     artists: vec!["Someone".into()],
///     art_url: None,
///     year: None,
///     popularity: None,
///     audio_features: AudioFeatures { valence: 1.0, ..Default::default() },
///     familiarity: FamiliarityTuple::default(),
///     genres: Default::default(),
/// };
/// let query = Query { valence: Some(0.5), ..Default::default() };
///
/// assert_eq!(calculate_album_relevance(&album, &query), 0.5);
/// ```
#[must_use]
pub fn calculate_album_relevance(album: &LibraryAlbum, query: &Query) -> f64 {
    if !matches_genre(album, query) || !matches_familiarity(album, query) {
        trace!("Album `{}' filtered out by genre or familiarity.", album.title);
        return 0.0;
    }

    let relevance = mean_score(&criterion_scores(album, query));
    trace!("Calculated `{relevance:.3}' relevance for `{}' album.", album.title);
    relevance
}

/// Relevance of every album, paired with the album, in input order.
///
/// Scoring runs in parallel; the output order is always the input order.
#[must_use]
pub fn score_albums<'a>(albums: &'a [LibraryAlbum], query: &Query) -> Vec<(&'a LibraryAlbum, f64)> {
    albums
        .par_iter()
        .map(|album| (album, calculate_album_relevance(album, query)))
        .collect()
}

/// Albums at or above the threshold, most relevant first.
///
/// Equal scores keep their input order.
#[must_use]
pub fn rank_relevant_albums<'a>(
    albums: &'a [LibraryAlbum],
    query: &Query,
    context: &RelevanceContext,
) -> Vec<(&'a LibraryAlbum, f64)> {
    let mut ranked: Vec<_> = score_albums(albums, query)
        .into_iter()
        .filter(|&(_, relevance)| context.is_relevant(relevance))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    debug!(
        "{} of {} albums relevant at threshold {}.",
        ranked.len(),
        albums.len(),
        context.threshold
    );
    ranked
}

/// Recommended albums for `query`, most relevant first.
///
/// # Examples
///
/// ```
/// use libzy::algorithm::{recommend_albums, RelevanceContext};
/// use libzy::model::Query;
///
/// let recommendations = recommend_albums(&[], &Query::default(), &RelevanceContext::default());
/// assert!(recommendations.is_empty());
/// ```
#[must_use]
pub fn recommend_albums(
    albums: &[LibraryAlbum],
    query: &Query,
    context: &RelevanceContext,
) -> Vec<AlbumResult> {
    rank_relevant_albums(albums, query, context)
        .into_iter()
        .map(|(album, _)| AlbumResult::from(album))
        .collect()
}

/// Genres of the relevant albums, ordered by summed album relevance.
///
/// Each relevant album adds its relevance to every genre it carries, so a
/// genre ranks high when it is common among *strongly* relevant albums, not
/// just common. Ties keep the order in which genres were first seen while
/// walking the ranked albums.
#[must_use]
pub fn recommend_genres(
    albums: &[LibraryAlbum],
    query: &Query,
    context: &RelevanceContext,
) -> Vec<String> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (album, relevance) in rank_relevant_albums(albums, query, context) {
        for genre in &album.genres {
            let position = *positions.entry(genre.as_str()).or_insert_with(|| {
                totals.push((genre.as_str(), 0.0));
                totals.len() - 1
            });
            totals[position].1 += relevance;
        }
    }

    totals.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    totals.into_iter().map(|(genre, _)| genre.to_string()).collect()
}
