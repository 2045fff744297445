//! SQLite library store.
//!
//! Holds the synced library albums together with their audio features,
//! familiarity flags and genres. This is the collaborator that feeds the
//! relevance engine; it owns no scoring logic.

use crate::model::{AudioFeatures, FamiliarityTuple, LibraryAlbum};
use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{params, Connection};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Open the library database at `db_path`, creating the schema if needed.
pub fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open library database at {}", db_path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Enable foreign keys and create the `library_album` and `album_genre`
/// tables if they do not exist. Genres are deleted along with their album.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS library_album (
            id                   TEXT    PRIMARY KEY,
            spotify_uri          TEXT    NOT NULL,
            title                TEXT    NOT NULL,
            artists              TEXT    NOT NULL,
            art_url              TEXT,
            year                 INTEGER,
            popularity           INTEGER,
            valence              REAL    NOT NULL,
            acousticness         REAL    NOT NULL,
            instrumentalness     REAL    NOT NULL,
            energy               REAL    NOT NULL,
            danceability         REAL    NOT NULL,
            recently_played      INTEGER NOT NULL DEFAULT 0,
            short_term_favorite  INTEGER NOT NULL DEFAULT 0,
            medium_term_favorite INTEGER NOT NULL DEFAULT 0,
            long_term_favorite   INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS album_genre (
            album_id TEXT NOT NULL REFERENCES library_album(id) ON DELETE CASCADE,
            genre    TEXT NOT NULL,
            PRIMARY KEY (album_id, genre)
        );
        CREATE INDEX IF NOT EXISTS idx_album_genre_genre ON album_genre(genre);",
    )
    .context("Failed to create library schema")?;
    Ok(())
}

/// Insert or update `albums` in one transaction. An album's genres are
/// replaced by the ones given. Returns the number of albums written.
pub fn insert_albums(conn: &mut Connection, albums: &[LibraryAlbum]) -> Result<usize> {
    let tx = conn.transaction()?;

    {
        let mut upsert = tx.prepare(
            "INSERT INTO library_album (
                id, spotify_uri, title, artists, art_url, year, popularity,
                valence, acousticness, instrumentalness, energy, danceability,
                recently_played, short_term_favorite, medium_term_favorite, long_term_favorite
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            ON CONFLICT(id) DO UPDATE SET
                spotify_uri = excluded.spotify_uri,
                title = excluded.title,
                artists = excluded.artists,
                art_url = excluded.art_url,
                year = excluded.year,
                popularity = excluded.popularity,
                valence = excluded.valence,
                acousticness = excluded.acousticness,
                instrumentalness = excluded.instrumentalness,
                energy = excluded.energy,
                danceability = excluded.danceability,
                recently_played = excluded.recently_played,
                short_term_favorite = excluded.short_term_favorite,
                medium_term_favorite = excluded.medium_term_favorite,
                long_term_favorite = excluded.long_term_favorite",
        )?;
        let mut clear_genres = tx.prepare("DELETE FROM album_genre WHERE album_id = ?1")?;
        let mut insert_genre = tx.prepare("INSERT OR IGNORE INTO album_genre (album_id, genre) VALUES (?1, ?2)")?;

        for album in albums {
            let artists = serde_json::to_string(&album.artists)?;
            let features = &album.audio_features;
            let familiarity = &album.familiarity;

            upsert
                .execute(params![
                    album.id,
                    album.spotify_uri,
                    album.title,
                    artists,
                    album.art_url,
                    album.year,
                    album.popularity,
                    features.valence,
                    features.acousticness,
                    features.instrumentalness,
                    features.energy,
                    features.danceability,
                    familiarity.recently_played,
                    familiarity.short_term_favorite,
                    familiarity.medium_term_favorite,
                    familiarity.long_term_favorite,
                ])
                .with_context(|| format!("Failed to store album `{}'", album.title))?;

            clear_genres.execute([&album.id])?;
            for genre in &album.genres {
                insert_genre.execute([&album.id, genre])?;
            }
        }
    }

    tx.commit().context("Committing library transaction failed")?;
    debug!("Stored {} albums.", albums.len());
    Ok(albums.len())
}

/// Remove every album and genre from the library.
pub fn clear_library(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM library_album", [])
        .context("Failed to clear library")?;
    info!("Cleared library.");
    Ok(())
}

/// Number of albums in the library.
pub fn count_albums(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM library_album", [], |row| row.get(0))
        .context("Could not count library albums")?;
    Ok(usize::try_from(count)?)
}

fn retrieve_genres(conn: &Connection) -> Result<HashMap<String, BTreeSet<String>>> {
    let mut stmt = conn.prepare("SELECT album_id, genre FROM album_genre")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut genres: HashMap<String, BTreeSet<String>> = HashMap::new();
    for row in rows {
        let (album_id, genre) = row.context("Queried genre row unwrap failed")?;
        genres.entry(album_id).or_default().insert(genre);
    }
    Ok(genres)
}

/// All albums in the order they were first stored, with their genres.
pub fn retrieve_albums(conn: &Connection) -> Result<Vec<LibraryAlbum>> {
    let mut genres = retrieve_genres(conn)?;

    let mut stmt = conn.prepare(
        "SELECT id, spotify_uri, title, artists, art_url, year, popularity,
                valence, acousticness, instrumentalness, energy, danceability,
                recently_played, short_term_favorite, medium_term_favorite, long_term_favorite
         FROM library_album ORDER BY rowid",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(3)?,
                LibraryAlbum {
                    id: row.get(0)?,
                    spotify_uri: row.get(1)?,
                    title: row.get(2)?,
                    artists: Vec::new(),
                    art_url: row.get(4)?,
                    year: row.get(5)?,
                    popularity: row.get(6)?,
                    audio_features: AudioFeatures {
                        valence: row.get(7)?,
                        acousticness: row.get(8)?,
                        instrumentalness: row.get(9)?,
                        energy: row.get(10)?,
                        danceability: row.get(11)?,
                    },
                    familiarity: FamiliarityTuple {
                        recently_played: row.get(12)?,
                        short_term_favorite: row.get(13)?,
                        medium_term_favorite: row.get(14)?,
                        long_term_favorite: row.get(15)?,
                    },
                    genres: BTreeSet::new(),
                },
            ))
        })
        .context("Cannot query library albums")?;

    let mut albums = Vec::new();
    for row in rows {
        let (artists, mut album) = row.context("Queried album unwrap failed")?;
        album.artists = serde_json::from_str(&artists)
            .with_context(|| format!("Malformed artist list for album `{}'", album.title))?;
        album.genres = genres.remove(&album.id).unwrap_or_default();
        albums.push(album);
    }

    debug!("Retrieved {} albums from library.", albums.len());
    Ok(albums)
}

/// Parse a JSON array of library albums, as exported by the sync layer.
pub fn read_library_json(path: &Path) -> Result<Vec<LibraryAlbum>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Library file {} is not a valid album list", path.display()))
}
