//! # Libzy Performance Benchmarks
//!
//! Measures the relevance engine over synthetic libraries of realistic size.
//!
//! ```bash
//! cargo bench
//! cargo bench relevance
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use libzy::algorithm::{self, RelevanceContext};
use libzy::category;
use libzy::model::{AudioFeatures, Familiarity, FamiliarityTuple, LibraryAlbum, Query};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::hint::black_box;

const GENRES: [&str; 8] = ["rock", "pop", "jazz", "metal", "folk", "ambient", "hip hop", "techno"];

/// Deterministic synthetic library.
fn create_library(count: usize) -> Vec<LibraryAlbum> {
    let mut rng = StdRng::seed_from_u64(0x11b2);
    (0..count)
        .map(|i| {
            let genres: BTreeSet<String> = (0..rng.gen_range(1..=3))
                .map(|_| GENRES[rng.gen_range(0..GENRES.len())].to_string())
                .collect();
            LibraryAlbum {
                id: format!("{i:06}"),
                spotify_uri: format!("spotify:album:{i:06}"),
                title: format!("Album {i}"),
                artists: vec![format!("Artist {}", i % 97)],
                art_url: None,
                year: Some(1960 + (i % 60) as u32),
                popularity: Some((i % 100) as u32),
                audio_features: AudioFeatures {
                    valence: rng.gen(),
                    acousticness: rng.gen(),
                    instrumentalness: rng.gen(),
                    energy: rng.gen(),
                    danceability: rng.gen(),
                },
                familiarity: FamiliarityTuple::new(rng.gen(), rng.gen(), rng.gen(), rng.gen()),
                genres,
            }
        })
        .collect()
}

fn mood_query() -> Query {
    Query {
        familiarity: Some(Familiarity::ReliableClassic),
        instrumental: Some(false),
        valence: Some(0.7),
        energy: Some(0.8),
        danceability: Some(0.6),
        genres: Some(BTreeSet::from(["rock".to_string(), "pop".to_string()])),
        ..Default::default()
    }
}

fn bench_relevance(c: &mut Criterion) {
    let mut group = c.benchmark_group("relevance");
    let query = mood_query();
    let context = RelevanceContext::default();

    for size in [100, 1_000, 10_000] {
        let library = create_library(size);
        group.bench_with_input(BenchmarkId::new("recommend_albums", size), &library, |b, library| {
            b.iter(|| algorithm::recommend_albums(black_box(library), black_box(&query), &context));
        });
        group.bench_with_input(BenchmarkId::new("recommend_genres", size), &library, |b, library| {
            b.iter(|| algorithm::recommend_genres(black_box(library), black_box(&query), &context));
        });
        group.bench_with_input(BenchmarkId::new("recommend_categories", size), &library, |b, library| {
            b.iter(|| category::recommend_categories(black_box(library), black_box(&query), &context));
        });
    }
    group.finish();
}

fn bench_single_album(c: &mut Criterion) {
    let library = create_library(1);
    let query = mood_query();
    c.bench_function("calculate_album_relevance", |b| {
        b.iter(|| algorithm::calculate_album_relevance(black_box(&library[0]), black_box(&query)));
    });
}

criterion_group!(benches, bench_relevance, bench_single_album);
criterion_main!(benches);
