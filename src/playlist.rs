use crate::models::{Movie, UrlMode};

pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Jellyfin reports runtimes in 100ns ticks. Missing or zero ticks render
/// as -1, the M3U convention for unknown duration.
pub fn ticks_to_seconds(ticks: Option<i64>) -> i64 {
    match ticks {
        Some(t) if t != 0 => t / TICKS_PER_SECOND,
        _ => -1,
    }
}

pub fn stream_url(server: &str, item_id: &str, mode: UrlMode, api_key: &str) -> String {
    match mode {
        UrlMode::Simple => format!("{}/Videos/{}/stream.mp4?static=true", server, item_id),
        UrlMode::WithKey => format!(
            "{}/Videos/{}/stream.mp4?api_key={}&static=true",
            server, item_id, api_key
        ),
    }
}

/// Render one playlist document. Used for per-library and combined output
/// alike; items without an id are skipped, order is kept as fetched.
/// Returns None for an empty movie list, so no empty files get written.
pub fn render_playlist(
    movies: &[Movie],
    library_name: &str,
    server: &str,
    mode: UrlMode,
    api_key: &str,
) -> Option<String> {
    if movies.is_empty() {
        return None;
    }
    let mut out = String::from("#EXTM3U\n");
    out.push_str(&format!("# Jellyfin Playlist - {}\n", library_name));
    out.push_str(&format!("# Generated from: {}\n", server));
    out.push_str(&format!("# Total movies: {}\n", movies.len()));
    match mode {
        UrlMode::Simple => {
            out.push_str(&format!(
                "# URL Format: {}/Videos/ID/stream.mp4?static=true\n",
                server
            ));
            out.push_str("# Note: May work without authentication in VLC\n");
        }
        UrlMode::WithKey => {
            out.push_str(&format!(
                "# URL Format: {}/Videos/ID/stream.mp4?api_key=XXX&static=true\n",
                server
            ));
            out.push_str("# Note: Contains API key in URL\n");
        }
    }
    out.push('\n');

    for movie in movies {
        if movie.id.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "#EXTINF:{},{}\n",
            ticks_to_seconds(movie.run_time_ticks),
            movie.name
        ));
        out.push_str(&stream_url(server, &movie.id, mode, api_key));
        out.push('\n');
    }
    Some(out)
}

fn sanitize_library_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            _ => c,
        })
        .collect()
}

pub fn playlist_filename(library_name: &str, mode: UrlMode) -> String {
    format!(
        "jellyfin_{}{}.m3u",
        sanitize_library_name(library_name),
        mode.file_suffix()
    )
}

pub fn combined_filename(mode: UrlMode) -> String {
    format!("jellyfin_ALL_MOVIES{}.m3u", mode.file_suffix())
}

/// The combined document only exists when more than one library group was
/// selected; its order follows the selection order of the groups.
pub fn combined_movies(groups: &[(String, Vec<Movie>)]) -> Option<Vec<Movie>> {
    if groups.len() <= 1 {
        return None;
    }
    Some(groups.iter().flat_map(|(_, m)| m.iter().cloned()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, name: &str, ticks: Option<i64>) -> Movie {
        Movie {
            id: id.to_string(),
            name: name.to_string(),
            run_time_ticks: ticks,
        }
    }

    #[test]
    fn test_ticks_to_seconds() {
        assert_eq!(ticks_to_seconds(None), -1);
        assert_eq!(ticks_to_seconds(Some(0)), -1);
        assert_eq!(ticks_to_seconds(Some(36_000_000_000)), 3600);
        assert_eq!(ticks_to_seconds(Some(36_000_000_001)), 3600);
    }

    #[test]
    fn test_stream_urls() {
        assert_eq!(
            stream_url("http://host:8096", "abc123", UrlMode::Simple, "tok"),
            "http://host:8096/Videos/abc123/stream.mp4?static=true"
        );
        assert_eq!(
            stream_url("http://host:8096", "abc123", UrlMode::WithKey, "tok"),
            "http://host:8096/Videos/abc123/stream.mp4?api_key=tok&static=true"
        );
    }

    #[test]
    fn test_playlist_filename() {
        assert_eq!(
            playlist_filename("Kids Movies/New", UrlMode::Simple),
            "jellyfin_Kids_Movies_New_simple.m3u"
        );
        assert_eq!(
            playlist_filename("Movies", UrlMode::WithKey),
            "jellyfin_Movies_with_api_key.m3u"
        );
        assert_eq!(
            combined_filename(UrlMode::Simple),
            "jellyfin_ALL_MOVIES_simple.m3u"
        );
    }

    #[test]
    fn test_render_playlist_shape() {
        let movies = vec![
            movie("a1", "Alien", Some(36_000_000_000)),
            movie("", "Broken Record", Some(1)),
            movie("b2", "Blade Runner", None),
        ];
        let text =
            render_playlist(&movies, "Movies", "http://host:8096", UrlMode::Simple, "tok").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#EXTM3U");
        assert_eq!(lines[1], "# Jellyfin Playlist - Movies");
        assert_eq!(lines[2], "# Generated from: http://host:8096");
        assert_eq!(lines[3], "# Total movies: 3");
        assert_eq!(lines[5], "# Note: May work without authentication in VLC");
        assert_eq!(lines[6], "");
        // the id-less entry is skipped
        assert_eq!(lines[7], "#EXTINF:3600,Alien");
        assert_eq!(lines[8], "http://host:8096/Videos/a1/stream.mp4?static=true");
        assert_eq!(lines[9], "#EXTINF:-1,Blade Runner");
        assert_eq!(lines[10], "http://host:8096/Videos/b2/stream.mp4?static=true");
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_render_playlist_with_key_header() {
        let movies = vec![movie("a1", "Alien", None)];
        let text =
            render_playlist(&movies, "Movies", "http://h", UrlMode::WithKey, "secret").unwrap();
        assert!(text.contains("# URL Format: http://h/Videos/ID/stream.mp4?api_key=XXX&static=true"));
        assert!(text.contains("# Note: Contains API key in URL"));
        assert!(text.contains("http://h/Videos/a1/stream.mp4?api_key=secret&static=true"));
    }

    #[test]
    fn test_render_playlist_empty_is_none() {
        assert!(render_playlist(&[], "Movies", "http://h", UrlMode::Simple, "t").is_none());
    }

    #[test]
    fn test_render_playlist_deterministic() {
        let movies = vec![movie("a1", "Alien", Some(5)), movie("b2", "Brazil", None)];
        let a = render_playlist(&movies, "M", "http://h", UrlMode::Simple, "t");
        let b = render_playlist(&movies, "M", "http://h", UrlMode::Simple, "t");
        assert_eq!(a, b);
    }

    #[test]
    fn test_combined_movies_requires_multiple_groups() {
        let one = vec![("Movies".to_string(), vec![movie("a", "A", None)])];
        assert!(combined_movies(&one).is_none());

        let two = vec![
            ("Movies".to_string(), vec![movie("a", "A", None)]),
            ("Kids".to_string(), vec![movie("b", "B", None), movie("c", "C", None)]),
        ];
        let combined = combined_movies(&two).unwrap();
        let ids: Vec<&str> = combined.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_combined_document_uses_full_header() {
        // The combined document goes through the same renderer as the
        // per-library ones and therefore carries the mode note line too.
        let groups = vec![
            ("Movies".to_string(), vec![movie("a", "Alien", None)]),
            ("Kids".to_string(), vec![movie("b", "Bambi", None)]),
        ];
        let combined = combined_movies(&groups).unwrap();
        let text = render_playlist(&combined, "All Movies", "http://h", UrlMode::Simple, "t")
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "# Jellyfin Playlist - All Movies");
        assert_eq!(lines[3], "# Total movies: 2");
        assert_eq!(lines[5], "# Note: May work without authentication in VLC");
        assert_eq!(lines[7], "#EXTINF:-1,Alien");
        assert_eq!(lines[9], "#EXTINF:-1,Bambi");
    }

    #[test]
    fn test_playlist_file_roundtrip() {
        let movies = vec![movie("a1", "Alien", Some(36_000_000_000))];
        let content =
            render_playlist(&movies, "Movies", "http://h", UrlMode::Simple, "t").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(playlist_filename("Movies", UrlMode::Simple));
        std::fs::write(&path, &content).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }
}
