use crate::logger::log_line;
use crate::models::{Config, Library, LibraryKind, Movie};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

pub const PAGE_SIZE: usize = 1000;
// Bulk item queries get more headroom than metadata lookups.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);
pub const ITEMS_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the blocking HTTP client. Self-signed certificates are accepted on
/// purpose (home servers rarely have real ones); the token rides along as a
/// default header on every request.
pub fn build_client(cfg: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(v) = HeaderValue::from_str(&cfg.api_key) {
        headers.insert("X-Emby-Token", v);
    }
    Client::builder()
        .danger_accept_invalid_certs(true)
        .default_headers(headers)
        .build()
}

/// Connectivity check against /System/Info. Returns the server name.
pub fn ping(client: &Client, cfg: &Config) -> Result<String, String> {
    let url = format!("{}/System/Info", cfg.address);
    let res = client
        .get(&url)
        .timeout(METADATA_TIMEOUT)
        .send()
        .map_err(|e| e.to_string())?;
    if !res.status().is_success() {
        return Err(format!("HTTP {}", res.status()));
    }
    let v: Value = res.json().map_err(|e| e.to_string())?;
    Ok(v.get("ServerName")
        .and_then(Value::as_str)
        .unwrap_or("Jellyfin Server")
        .to_string())
}

/// Classification policy for a media folder: a name containing "movie"
/// counts as a movie library outright; otherwise the probe decides. The
/// probe only runs when the name heuristic fails.
pub fn classify_library<F>(name: &str, probe: F) -> Option<LibraryKind>
where
    F: FnOnce() -> Option<String>,
{
    if name.is_empty() {
        return None;
    }
    if name.to_lowercase().contains("movie") {
        return Some(LibraryKind::Movie);
    }
    match probe().as_deref() {
        Some("Movie") => Some(LibraryKind::Mixed),
        _ => None,
    }
}

/// List the server's media folders and keep the movie-bearing ones.
/// Failures are reported and yield an empty list, never an error.
pub fn fetch_libraries(client: &Client, cfg: &Config) -> Vec<Library> {
    let url = format!("{}/Library/MediaFolders", cfg.address);
    let res = match client.get(&url).timeout(METADATA_TIMEOUT).send() {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            println!("Error fetching libraries: HTTP {}", r.status());
            log_line(&format!("ERROR: media folders: HTTP {}", r.status()));
            return Vec::new();
        }
        Err(e) => {
            println!("Error fetching libraries: {}", e);
            log_line(&format!("ERROR: media folders: {}", e));
            return Vec::new();
        }
    };
    let json: Value = match res.json() {
        Ok(v) => v,
        Err(e) => {
            println!("Error fetching libraries: {}", e);
            log_line(&format!("ERROR: media folders body: {}", e));
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for item in json
        .get("Items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
    {
        let id = item
            .get("Id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let name = item
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if id.is_empty() {
            continue;
        }
        if let Some(kind) = classify_library(&name, || probe_item_type(client, cfg, &id)) {
            out.push(Library { id, name, kind });
        }
    }
    out
}

/// Type of the first item directly under a library, if any.
fn probe_item_type(client: &Client, cfg: &Config, library_id: &str) -> Option<String> {
    let url = format!("{}/Items", cfg.address);
    let res = client
        .get(&url)
        .query(&[
            ("ParentId", library_id),
            ("Recursive", "false"),
            ("Limit", "1"),
        ])
        .timeout(METADATA_TIMEOUT)
        .send()
        .ok()?;
    if !res.status().is_success() {
        return None;
    }
    let v: Value = res.json().ok()?;
    v.get("Items")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(|i| i.get("Type"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// One page of an /Items response: the records plus the server-reported
/// total for the whole query.
pub struct Page {
    pub items: Vec<Movie>,
    pub total: usize,
}

/// Offset pagination driver. The offset advances by the count actually
/// received, so short pages neither skip records nor stall the loop. A
/// failed page ends the loop with whatever was collected so far; there are
/// no retries. An empty page with the total unreached also ends the loop so
/// a misbehaving server cannot spin it forever.
pub fn collect_paged<F>(mut fetch_page: F) -> Vec<Movie>
where
    F: FnMut(usize) -> Result<Page, String>,
{
    let mut all: Vec<Movie> = Vec::new();
    loop {
        match fetch_page(all.len()) {
            Ok(page) => {
                let got = page.items.len();
                all.extend(page.items);
                if got == 0 || all.len() >= page.total {
                    break;
                }
                println!("  Fetched {}/{} items...", all.len(), page.total);
            }
            Err(e) => {
                println!("Error fetching items: {}", e);
                log_line(&format!("ERROR: items page at offset {}: {}", all.len(), e));
                break;
            }
        }
    }
    all
}

/// Pull movie records and the reported total out of an /Items response.
/// Missing fields default through serde; an item too malformed to decode
/// degrades to an id-less record, which rendering drops later.
pub fn parse_items_page(v: &Value) -> Page {
    let total = v
        .get("TotalRecordCount")
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize;
    let items = v
        .get("Items")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|o| {
                    serde_json::from_value::<Movie>(o.clone()).unwrap_or_else(|_| Movie {
                        id: String::new(),
                        name: "Unknown".to_string(),
                        run_time_ticks: None,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Page { items, total }
}

/// Every movie in the given library, or across all libraries when no parent
/// is given. Sorted by name server-side; order is kept as received.
pub fn fetch_movies(client: &Client, cfg: &Config, parent_id: Option<&str>) -> Vec<Movie> {
    let url = format!("{}/Items", cfg.address);
    collect_paged(|offset| {
        let mut query: Vec<(&str, String)> = vec![
            ("Recursive", "true".to_string()),
            ("IncludeItemTypes", "Movie".to_string()),
            ("Fields", "MediaSources,Path,RunTimeTicks,Genres".to_string()),
            ("SortBy", "SortName".to_string()),
            ("Limit", PAGE_SIZE.to_string()),
            ("StartIndex", offset.to_string()),
        ];
        if let Some(id) = parent_id {
            query.push(("ParentId", id.to_string()));
        }
        let res = client
            .get(&url)
            .query(&query)
            .timeout(ITEMS_TIMEOUT)
            .send()
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            return Err(format!("HTTP {}", res.status()));
        }
        let v: Value = res.json().map_err(|e| e.to_string())?;
        Ok(parse_items_page(&v))
    })
}
