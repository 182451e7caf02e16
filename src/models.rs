use serde::Deserialize;

#[derive(Default, Debug, Clone)]
pub struct Config {
    pub address: String,
    pub api_key: String,
}

/// How a library earned its place in the movie set: named like a movie
/// library, or a generic library whose probe returned a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Movie,
    Mixed,
}

impl LibraryKind {
    pub fn label(&self) -> &'static str {
        match self {
            LibraryKind::Movie => "Movie",
            LibraryKind::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    pub id: String,
    pub name: String,
    pub kind: LibraryKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// Streaming-URL construction mode. Simple URLs carry no credential; the
/// with-key variant embeds the API key as a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMode {
    Simple,
    WithKey,
}

impl UrlMode {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            UrlMode::Simple => "_simple",
            UrlMode::WithKey => "_with_api_key",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrlMode::Simple => "simple",
            UrlMode::WithKey => "with_key",
        }
    }
}
