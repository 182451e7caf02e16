mod api;
mod config;
mod logger;
mod models;
mod playlist;
mod summary;

use config::prompt;
use models::{Config, Library, Movie, UrlMode};
use reqwest::blocking::Client;
use std::fs;

fn main() {
    println!("{}", "=".repeat(60));
    println!("JELLYFIN SIMPLE PLAYLIST GENERATOR");
    println!("{}", "=".repeat(60));
    println!("\nCreates M3U playlists from your Jellyfin movie libraries using");
    println!("the direct stream URL format: http://server:port/Videos/ID/stream.mp4?static=true");

    let cfg = config::load_config();
    let client = match api::build_client(&cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            logger::log_error("client build", &e);
            std::process::exit(1);
        }
    };
    if !run(&cfg, &client) {
        std::process::exit(1);
    }
}

fn run(cfg: &Config, client: &Client) -> bool {
    println!("\nConnecting to {}...", cfg.address);
    match api::ping(client, cfg) {
        Ok(server_name) => println!("✓ Connected to: {}", server_name),
        Err(e) => {
            println!("✗ Cannot connect: {}", e);
            logger::log_line(&format!("ERROR: connect {}: {}", cfg.address, e));
            return false;
        }
    }

    println!("\nDiscovering media libraries...");
    let libraries = api::fetch_libraries(client, cfg);
    if libraries.is_empty() {
        println!("No movie libraries found!");
        return false;
    }

    println!("\nFound {} movie library(ies):", libraries.len());
    for (i, lib) in libraries.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, lib.name, lib.kind.label());
    }

    let library_movies = select_and_fetch(cfg, client, &libraries);
    if library_movies.is_empty() {
        println!("\n✗ No movies found in selected libraries!");
        return false;
    }

    let modes = prompt_url_modes();

    println!("\n{}", "=".repeat(50));
    println!("Generating Playlists");
    println!("{}", "=".repeat(50));
    let saved_files = generate_playlists(cfg, &library_movies, &modes);

    match summary::write_summary(&saved_files, &library_movies, &modes, cfg) {
        Ok(()) => println!("\n✓ Summary saved to: {}", summary::SUMMARY_FILENAME),
        Err(e) => {
            println!("✗ Error saving summary: {}", e);
            logger::log_error("write summary", &e);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("GENERATION COMPLETE!");
    println!("{}", "=".repeat(60));
    println!("\nCreated {} playlist file(s):", saved_files.len());
    for file in &saved_files {
        println!("  • {}", file);
    }
    let total: usize = library_movies.iter().map(|(_, m)| m.len()).sum();
    println!("\nTotal movies: {}", total);

    print_usage_notes(cfg, &modes);
    true
}

/// Library-scope selection. Groups come back in selection order; invalid or
/// empty input falls back to one "All Movies" group spanning every library.
fn select_and_fetch(
    cfg: &Config,
    client: &Client,
    libraries: &[Library],
) -> Vec<(String, Vec<Movie>)> {
    println!("\n{}", "=".repeat(50));
    println!("Library Selection");
    println!("{}", "=".repeat(50));
    println!("Select libraries to include:");
    println!("1. All libraries (combined)");
    println!("2. Individual libraries (choose specific ones)");

    let choice = prompt("\nEnter choice (1 or 2): ");
    let mut groups: Vec<(String, Vec<Movie>)> = Vec::new();

    if choice == "2" {
        println!("\nSelect libraries (enter numbers separated by commas):");
        for (i, lib) in libraries.iter().enumerate() {
            println!("  {}. {}", i + 1, lib.name);
        }
        let selections = prompt("\nEnter library numbers (e.g., 1,2,3): ");
        for part in selections.split(',') {
            let Ok(n) = part.trim().parse::<usize>() else {
                continue;
            };
            if n < 1 || n > libraries.len() {
                continue;
            }
            let lib = &libraries[n - 1];
            if groups.iter().any(|(name, _)| name == &lib.name) {
                continue;
            }
            println!("\nFetching movies from library: {}...", lib.name);
            let movies = api::fetch_movies(client, cfg, Some(&lib.id));
            if !movies.is_empty() {
                println!("✓ Added '{}' with {} movies", lib.name, movies.len());
                groups.push((lib.name.clone(), movies));
            }
        }
        if !groups.is_empty() {
            return groups;
        }
        println!("No libraries selected. Using all libraries.");
    } else if choice == "1" {
        println!("\n✓ Will include ALL libraries");
    } else {
        println!("Invalid choice. Using all libraries.");
    }

    println!("\nFetching movies from all libraries...");
    let all_movies = api::fetch_movies(client, cfg, None);
    if !all_movies.is_empty() {
        println!("\nFound {} total movies", all_movies.len());
        groups.push(("All Movies".to_string(), all_movies));
    }
    groups
}

fn prompt_url_modes() -> Vec<UrlMode> {
    println!("\n{}", "=".repeat(50));
    println!("URL Type Selection");
    println!("{}", "=".repeat(50));
    println!("Choose URL type (based on what works in VLC):");
    println!("1. Simple URLs (without API key) - RECOMMENDED");
    println!("2. URLs with API key");
    println!("3. Both types");

    match prompt("\nEnter choice (1-3): ").as_str() {
        "2" => {
            println!("\n✓ Using URLs with API key");
            println!("  Note: API key will be visible in URLs");
            vec![UrlMode::WithKey]
        }
        "3" => {
            println!("\n✓ Creating both URL types");
            vec![UrlMode::Simple, UrlMode::WithKey]
        }
        "1" => {
            println!("\n✓ Using simple URLs (without API key)");
            vec![UrlMode::Simple]
        }
        _ => {
            println!("\n✓ Defaulting to simple URLs");
            vec![UrlMode::Simple]
        }
    }
}

/// Write per-library playlists for every requested mode, plus a combined one
/// when more than one library group was selected. A failed write is reported
/// and skipped; the rest still get written.
fn generate_playlists(
    cfg: &Config,
    library_movies: &[(String, Vec<Movie>)],
    modes: &[UrlMode],
) -> Vec<String> {
    let mut saved_files = Vec::new();

    for &mode in modes {
        println!("\nGenerating {} URL playlists...", mode.label());

        for (lib_name, movies) in library_movies {
            let Some(content) =
                playlist::render_playlist(movies, lib_name, &cfg.address, mode, &cfg.api_key)
            else {
                continue;
            };
            let filename = playlist::playlist_filename(lib_name, mode);
            write_playlist_file(&filename, &content, movies.len(), &mut saved_files);
        }

        if let Some(combined) = playlist::combined_movies(library_movies) {
            if let Some(content) =
                playlist::render_playlist(&combined, "All Movies", &cfg.address, mode, &cfg.api_key)
            {
                let filename = playlist::combined_filename(mode);
                write_playlist_file(&filename, &content, combined.len(), &mut saved_files);
            }
        }
    }
    saved_files
}

fn write_playlist_file(filename: &str, content: &str, count: usize, saved_files: &mut Vec<String>) {
    match fs::write(filename, content) {
        Ok(()) => {
            println!("✓ Created: {} ({} movies)", filename, count);
            saved_files.push(filename.to_string());
        }
        Err(e) => {
            println!("✗ Error saving {}: {}", filename, e);
            logger::log_error(&format!("write {}", filename), &e);
        }
    }
}

fn print_usage_notes(cfg: &Config, modes: &[UrlMode]) {
    println!("\n{}", "=".repeat(60));
    println!("USAGE INSTRUCTIONS:");
    println!("{}", "=".repeat(60));

    if modes.contains(&UrlMode::Simple) {
        println!("\nSIMPLE URLs (jellyfin_*_simple.m3u):");
        println!("  • URL Format: {}/Videos/ID/stream.mp4?static=true", cfg.address);
        println!("  • May work without authentication in VLC - try this first");
    }
    if modes.contains(&UrlMode::WithKey) {
        println!("\nURLs WITH API KEY (jellyfin_*_with_api_key.m3u):");
        println!(
            "  • URL Format: {}/Videos/ID/stream.mp4?api_key=XXX&static=true",
            cfg.address
        );
        println!("  • Use if simple URLs don't work; the API key is visible in URLs");
    }

    println!("\nHOW TO TEST:");
    println!("1. Open VLC Media Player");
    println!("2. Go to Media > Open Network Stream");
    println!("3. Paste a stream URL from one of the playlists");
    println!("4. If it plays, use that playlist type");

    println!("\nTROUBLESHOOTING:");
    println!("• If URLs don't play, check Jellyfin authentication settings");
    println!("• Ensure 'Allow audio playback that requires no authentication' is enabled");
    println!("• Ensure 'Allow video playback that requires no authentication' is enabled");
    println!("• These settings are in Jellyfin Dashboard > Playback");
    println!("{}", "=".repeat(60));
}
