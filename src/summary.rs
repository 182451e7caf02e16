use crate::models::{Config, Movie, UrlMode};
use std::fs;
use std::io;

pub const SUMMARY_FILENAME: &str = "PLAYLISTS_SUMMARY.txt";

/// The key never appears whole in the summary, only its first characters.
pub fn redact_key(key: &str) -> String {
    format!("{}...", key.chars().take(10).collect::<String>())
}

pub fn render_summary(
    saved_files: &[String],
    library_movies: &[(String, Vec<Movie>)],
    modes: &[UrlMode],
    cfg: &Config,
) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mode_labels: Vec<&str> = modes.iter().map(|m| m.label()).collect();

    let mut out = String::from("# Jellyfin Playlists Summary\n\n");
    out.push_str(&format!("## Generated from: {}\n", cfg.address));
    out.push_str(&format!("## Date: {}\n", now));
    out.push_str(&format!("## URL Types: {}\n\n", mode_labels.join(", ")));

    out.push_str("## Playlists Created:\n");
    for file in saved_files {
        out.push_str(&format!("- {}\n", file));
    }

    out.push_str("\n## Library Breakdown:\n");
    for (name, movies) in library_movies {
        out.push_str(&format!("- **{}**: {} movies\n", name, movies.len()));
    }

    let total: usize = library_movies.iter().map(|(_, m)| m.len()).sum();
    out.push_str(&format!("\n## Total Movies: {}\n", total));

    out.push_str("\n## URL Formats Used:\n\n");
    out.push_str("### Simple URLs (jellyfin_*_simple.m3u):\n");
    out.push_str(&format!(
        "{}/Videos/ITEM_ID/stream.mp4?static=true\n\n",
        cfg.address
    ));
    out.push_str("### URLs with API Key (jellyfin_*_with_api_key.m3u):\n");
    out.push_str(&format!(
        "{}/Videos/ITEM_ID/stream.mp4?api_key={}&static=true\n",
        cfg.address,
        redact_key(&cfg.api_key)
    ));

    out.push_str("\n## Why Simple URLs May Work:\n\n");
    out.push_str("1. The static=true parameter may bypass some authentication checks\n");
    out.push_str("2. Jellyfin may have \"Allow playback without authentication\" enabled\n");
    out.push_str("3. Your network may be trusted (local IP range)\n");

    out.push_str("\n## Testing:\n\n");
    out.push_str("1. Get a movie ID from the Jellyfin web interface\n");
    out.push_str(&format!(
        "2. Try in VLC: {}/Videos/MOVIE_ID/stream.mp4?static=true\n",
        cfg.address
    ));
    out.push_str("3. If it plays, use the \"simple\" playlists\n");
    out.push_str("4. If not, try the playlists with API key\n");

    out.push_str("\n## Troubleshooting:\n\n");
    out.push_str("- If URLs do not play, check the Jellyfin authentication settings\n");
    out.push_str("- Ensure \"Allow audio playback that requires no authentication\" is enabled\n");
    out.push_str("- Ensure \"Allow video playback that requires no authentication\" is enabled\n");
    out.push_str("- These settings are in Jellyfin Dashboard > Playback\n");

    out.push_str("\n## Security Note:\n\n");
    out.push_str("- URLs with API key expose your API key\n");
    out.push_str("- Anyone with the playlist can access your Jellyfin server\n");
    out.push_str("- Use simple URLs if they work\n");
    out.push_str("- Regenerate the API key if a playlist is shared accidentally\n");

    out
}

/// Fixed-name summary in the working directory, overwritten on every run.
pub fn write_summary(
    saved_files: &[String],
    library_movies: &[(String, Vec<Movie>)],
    modes: &[UrlMode],
    cfg: &Config,
) -> Result<(), io::Error> {
    fs::write(
        SUMMARY_FILENAME,
        render_summary(saved_files, library_movies, modes, cfg),
    )
}
