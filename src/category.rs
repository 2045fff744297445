//! Grouping of albums by which query parameters they satisfy.
//!
//! The flat ranking from [`crate::algorithm`] says *how* relevant an album is;
//! categories say *why*. Every relevant album is labelled with the parameters it
//! matches, albums with the same label are grouped, and groups matching more
//! of the query come first.

use crate::algorithm::{self, AudioCriterion, RelevanceContext};
use crate::model::{AlbumResult, Familiarity, LibraryAlbum, Query};
use log::debug;
use serde::{Deserialize, Serialize};

/// Describes what a matched continuous criterion sounds like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjective {
    Instrumental,
    Vocal,
    Acoustic,
    Electronic,
    Happy,
    Sad,
    Energetic,
    Calm,
    Danceable,
    Steady,
}

impl Adjective {
    /// Adjective for `criterion` given what the query asked for.
    /// `None` when the query does not specify that criterion.
    #[must_use]
    pub fn for_criterion(criterion: AudioCriterion, query: &Query) -> Option<Self> {
        let pick = |target: Option<f64>, high: Self, low: Self| {
            target.map(|target| if target >= 0.5 { high } else { low })
        };

        match criterion {
            AudioCriterion::Instrumental => query.instrumental.map(|wanted| match wanted {
                true => Self::Instrumental,
                false => Self::Vocal,
            }),
            AudioCriterion::Acousticness => pick(query.acousticness, Self::Acoustic, Self::Electronic),
            AudioCriterion::Valence => pick(query.valence, Self::Happy, Self::Sad),
            AudioCriterion::Energy => pick(query.energy, Self::Energetic, Self::Calm),
            AudioCriterion::Danceability => pick(query.danceability, Self::Danceable, Self::Steady),
        }
    }
}

impl std::fmt::Display for Adjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = match self {
            Self::Instrumental => "instrumental",
            Self::Vocal => "vocal",
            Self::Acoustic => "acoustic",
            Self::Electronic => "electronic",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Energetic => "energetic",
            Self::Calm => "calm",
            Self::Danceable => "danceable",
            Self::Steady => "steady",
        };
        f.write_str(word)
    }
}

/// The query parameters a partially matching album satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMatch {
    pub adjectives: Vec<Adjective>,
    pub genre: Option<String>,
    pub familiarity: Option<Familiarity>,
}

impl PartialMatch {
    #[must_use]
    pub fn num_relevant_parameters(&self) -> usize {
        self.adjectives.len() + usize::from(self.genre.is_some()) + usize::from(self.familiarity.is_some())
    }
}

/// How much of the query a category satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relevance {
    Full,
    Partial(PartialMatch),
}

impl Relevance {
    /// Sort key: full matches first, then partial ones by parameter count.
    fn rank(&self) -> (bool, usize) {
        match self {
            Self::Full => (true, 0),
            Self::Partial(partial) => (false, partial.num_relevant_parameters()),
        }
    }
}

impl std::fmt::Display for Relevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => f.write_str("everything you asked for"),
            Self::Partial(partial) => {
                let mut words: Vec<String> = partial.adjectives.iter().map(ToString::to_string).collect();
                words.extend(partial.genre.clone());
                if let Some(familiarity) = partial.familiarity {
                    words.push(format!("({familiarity})"));
                }
                f.write_str(&words.join(" "))
            }
        }
    }
}

/// Albums sharing the same [`Relevance`] label, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCategory {
    pub relevance: Relevance,
    pub albums: Vec<AlbumResult>,
}

/// Label for a relevant album: which of the query's parameters it satisfies.
///
/// The album already passed the genre and familiarity filters, so those are
/// always matched when requested. A continuous criterion matches when its own
/// score reaches the threshold.
fn label_album(album: &LibraryAlbum, query: &Query, context: &RelevanceContext) -> Relevance {
    let adjectives: Vec<Adjective> = algorithm::criterion_scores(album, query)
        .into_iter()
        .filter(|&(_, score)| context.is_relevant(score))
        .filter_map(|(criterion, _)| Adjective::for_criterion(criterion, query))
        .collect();
    let genre = query
        .genre_filter()
        .and_then(|genres| genres.iter().find(|genre| album.genres.contains(*genre)))
        .cloned();
    let familiarity = query
        .familiarity
        .filter(|&familiarity| album.familiarity.satisfies(familiarity));

    let partial = PartialMatch {
        adjectives,
        genre,
        familiarity,
    };
    match partial.num_relevant_parameters() == query.parameter_count() {
        true => Relevance::Full,
        false => Relevance::Partial(partial),
    }
}

/// Group the relevant albums into categories by the query parameters they
/// satisfy.
///
/// Exactly the albums [`algorithm::recommend_albums`] returns are grouped;
/// within a category they keep that ranking. A query without parameters
/// yields a single [`Relevance::Full`] category holding every album in
/// input order.
///
/// # Examples
///
/// ```
/// use libzy::algorithm::RelevanceContext;
/// use libzy::category::recommend_categories;
/// use libzy::model::Query;
///
/// let categories = recommend_categories(&[], &Query::default(), &RelevanceContext::default());
/// assert!(categories.is_empty());
/// ```
#[must_use]
pub fn recommend_categories(
    albums: &[LibraryAlbum],
    query: &Query,
    context: &RelevanceContext,
) -> Vec<RecommendationCategory> {
    let ranked = algorithm::rank_relevant_albums(albums, query, context);
    let mut groups: Vec<(Relevance, Vec<AlbumResult>)> = Vec::new();

    for (album, _) in &ranked {
        let relevance = label_album(album, query, context);
        let result = AlbumResult::from(*album);
        match groups.iter_mut().find(|(label, _)| *label == relevance) {
            Some((_, members)) => members.push(result),
            None => groups.push((relevance, vec![result])),
        }
    }

    groups.sort_by(|(a, _), (b, _)| b.rank().cmp(&a.rank()));
    debug!("Grouped {} relevant albums into {} categories.", ranked.len(), groups.len());

    groups
        .into_iter()
        .map(|(relevance, albums)| RecommendationCategory { relevance, albums })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AudioFeatures, FamiliarityTuple};
    use std::collections::BTreeSet;

    fn album(id: &str, features: AudioFeatures, familiarity: FamiliarityTuple, genres: &[&str]) -> LibraryAlbum {
        LibraryAlbum {
            id: id.to_string(),
            spotify_uri: format!("spotify:album:{id}"),
            title: format!("Album {id}"),
            artists: vec!["Artist".to_string()],
            art_url: None,
            year: Some(2001),
            popularity: Some(50),
            audio_features: features,
            familiarity,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn uris(category: &RecommendationCategory) -> Vec<&str> {
        category.albums.iter().map(|a| a.spotify_uri.as_str()).collect()
    }

    #[test]
    fn test_empty_query_single_full_category() {
        let albums = vec![
            album("a", AudioFeatures::default(), FamiliarityTuple::default(), &["rock"]),
            album("b", AudioFeatures::default(), FamiliarityTuple::default(), &[]),
        ];
        let categories = recommend_categories(&albums, &Query::default(), &RelevanceContext::default());

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].relevance, Relevance::Full);
        assert_eq!(uris(&categories[0]), vec!["spotify:album:a", "spotify:album:b"]);
    }

    #[test]
    fn test_full_before_partial_and_partial_by_parameter_count() {
        let query = Query {
            familiarity: Some(Familiarity::ReliableClassic),
            valence: Some(0.9),
            energy: Some(0.9),
            danceability: Some(0.9),
            genres: Some(BTreeSet::from(["rock".to_string()])),
            ..Default::default()
        };
        let features = |valence, energy, danceability| AudioFeatures {
            valence,
            energy,
            danceability,
            ..Default::default()
        };
        let classic = FamiliarityTuple::new(false, false, true, true);

        let albums = vec![
            album("one", features(0.9, 0.35, 0.35), classic, &["rock"]),
            album("two", features(0.9, 0.9, 0.1), classic, &["rock"]),
            album("full", features(0.9, 0.9, 0.9), classic, &["rock", "indie"]),
            album("unknown", features(0.9, 0.9, 0.9), FamiliarityTuple::default(), &["rock"]),
            album("jazz", features(0.9, 0.9, 0.9), classic, &["jazz"]),
            album("below", features(0.1, 0.1, 0.1), classic, &["rock"]),
        ];
        let categories = recommend_categories(&albums, &query, &RelevanceContext::default());

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].relevance, Relevance::Full);
        assert_eq!(uris(&categories[0]), vec!["spotify:album:full"]);

        assert_eq!(
            categories[1].relevance,
            Relevance::Partial(PartialMatch {
                adjectives: vec![Adjective::Happy, Adjective::Energetic],
                genre: Some("rock".to_string()),
                familiarity: Some(Familiarity::ReliableClassic),
            })
        );
        assert_eq!(uris(&categories[1]), vec!["spotify:album:two"]);

        assert_eq!(
            categories[2].relevance,
            Relevance::Partial(PartialMatch {
                adjectives: vec![Adjective::Happy],
                genre: Some("rock".to_string()),
                familiarity: Some(Familiarity::ReliableClassic),
            })
        );
        assert_eq!(uris(&categories[2]), vec!["spotify:album:one"]);
    }

    #[test]
    fn test_filtered_out_album_gets_no_category() {
        let query = Query {
            familiarity: Some(Familiarity::ReliableClassic),
            valence: Some(1.0),
            genres: Some(BTreeSet::from(["rock".to_string()])),
            ..Default::default()
        };
        let happy_jazz = album(
            "happy-jazz",
            AudioFeatures {
                valence: 1.0,
                ..Default::default()
            },
            FamiliarityTuple::default(),
            &["jazz"],
        );

        assert!(recommend_categories(&[happy_jazz], &query, &RelevanceContext::default()).is_empty());
    }

    #[test]
    fn test_categories_hold_exactly_the_recommended_albums() {
        let query = Query {
            familiarity: Some(Familiarity::CurrentFavorite),
            acousticness: Some(0.8),
            energy: Some(0.3),
            ..Default::default()
        };
        let features = |acousticness, energy| AudioFeatures {
            acousticness,
            energy,
            ..Default::default()
        };
        let recent = FamiliarityTuple::new(true, false, false, false);
        let albums = vec![
            album("a", features(0.8, 0.3), recent, &["folk"]),
            album("b", features(0.8, 0.9), recent, &["folk"]),
            album("c", features(0.1, 0.9), recent, &["pop"]),
            album("d", features(0.8, 0.3), FamiliarityTuple::default(), &["folk"]),
            album("e", features(0.5, 0.3), recent, &["rock"]),
        ];
        let context = RelevanceContext::default();

        let mut grouped: Vec<String> = recommend_categories(&albums, &query, &context)
            .into_iter()
            .flat_map(|category| category.albums)
            .map(|result| result.spotify_uri)
            .collect();
        let mut recommended: Vec<String> = algorithm::recommend_albums(&albums, &query, &context)
            .into_iter()
            .map(|result| result.spotify_uri)
            .collect();
        grouped.sort();
        recommended.sort();

        assert_eq!(grouped, recommended);
        assert!(!grouped.contains(&"spotify:album:c".to_string()), "below threshold");
        assert!(!grouped.contains(&"spotify:album:d".to_string()), "fails familiarity");
    }

    #[test]
    fn test_albums_within_category_ordered_by_match() {
        let query = Query {
            valence: Some(1.0),
            ..Default::default()
        };
        let features = |valence| AudioFeatures {
            valence,
            ..Default::default()
        };
        let albums = vec![
            album("ok", features(0.6), FamiliarityTuple::default(), &[]),
            album("best", features(1.0), FamiliarityTuple::default(), &[]),
            album("miss", features(0.1), FamiliarityTuple::default(), &[]),
        ];
        let categories = recommend_categories(&albums, &query, &RelevanceContext::default());

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].relevance, Relevance::Full);
        assert_eq!(uris(&categories[0]), vec!["spotify:album:best", "spotify:album:ok"]);
    }

    #[test]
    fn test_adjectives_follow_query_targets() {
        let query = Query {
            instrumental: Some(false),
            acousticness: Some(0.9),
            valence: Some(0.1),
            energy: Some(0.2),
            danceability: Some(0.7),
            ..Default::default()
        };
        let adjectives: Vec<_> = [
            AudioCriterion::Instrumental,
            AudioCriterion::Acousticness,
            AudioCriterion::Valence,
            AudioCriterion::Energy,
            AudioCriterion::Danceability,
        ]
        .into_iter()
        .filter_map(|criterion| Adjective::for_criterion(criterion, &query))
        .collect();

        assert_eq!(
            adjectives,
            vec![Adjective::Vocal, Adjective::Acoustic, Adjective::Sad, Adjective::Calm, Adjective::Danceable]
        );
        assert_eq!(Adjective::for_criterion(AudioCriterion::Valence, &Query::default()), None);
    }

    #[test]
    fn test_partial_parameter_count() {
        let partial = PartialMatch {
            adjectives: vec![Adjective::Calm, Adjective::Acoustic],
            genre: Some("folk".to_string()),
            familiarity: None,
        };
        assert_eq!(partial.num_relevant_parameters(), 3);
    }

    #[test]
    fn test_relevance_display() {
        let partial = Relevance::Partial(PartialMatch {
            adjectives: vec![Adjective::Happy, Adjective::Energetic],
            genre: Some("rock".to_string()),
            familiarity: Some(Familiarity::CurrentFavorite),
        });
        assert_eq!(partial.to_string(), "happy energetic rock (current favorite)");
        assert_eq!(Relevance::Full.to_string(), "everything you asked for");
    }
}
