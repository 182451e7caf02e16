use crate::models::Config;
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use url::Url;

pub const ENV_SERVER: &str = "JELLYFIN_SERVER";
pub const ENV_API_KEY: &str = "JELLYFIN_API_KEY";

fn config_file_path() -> PathBuf {
    let dir = ProjectDirs::from("", "", "Jellylist")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join("jellylist_config.txt")
}

/// Ensure the address carries a scheme and no trailing slash. Bare
/// `host:port` parses as a URL with scheme `host`, so anything that is not
/// already http(s) gets an `http://` prefix.
pub fn normalize_address(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => trimmed.to_string(),
        _ => format!("http://{}", trimmed),
    }
}

fn read_config_from(path: &Path) -> Config {
    let mut cfg = Config::default();
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return cfg,
    };
    for line in content.lines() {
        if let Some((k, v)) = line.split_once('=') {
            match k.trim() {
                "address" => cfg.address = v.trim().to_string(),
                "api_key" => cfg.api_key = v.trim().to_string(),
                _ => {}
            }
        }
    }
    cfg
}

fn save_config_to(path: &Path, cfg: &Config) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "address={}", cfg.address)?;
    writeln!(f, "api_key={}", cfg.api_key)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<(), io::Error> {
    save_config_to(&config_file_path(), cfg)
}

pub fn prompt(msg: &str) -> String {
    print!("{}", msg);
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
    line.trim().to_string()
}

/// Environment wins, then the config file, then an interactive prompt.
/// Credentials obtained from the prompt are persisted for the next run.
pub fn load_config() -> Config {
    let file_cfg = read_config_from(&config_file_path());
    let mut cfg = Config {
        address: std::env::var(ENV_SERVER).unwrap_or(file_cfg.address),
        api_key: std::env::var(ENV_API_KEY).unwrap_or(file_cfg.api_key),
    };

    let mut prompted = false;
    if cfg.address.trim().is_empty() || cfg.api_key.trim().is_empty() {
        println!("\n{}", "=".repeat(50));
        println!("Jellyfin Configuration");
        println!("{}", "=".repeat(50));
    }
    if cfg.address.trim().is_empty() {
        cfg.address = prompt("Enter Jellyfin Server URL: ");
        prompted = true;
    }
    if cfg.api_key.trim().is_empty() {
        cfg.api_key = prompt("Enter Jellyfin API Key: ");
        prompted = true;
    }

    cfg.address = normalize_address(&cfg.address);
    if prompted {
        if let Err(e) = save_config(&cfg) {
            crate::logger::log_error("save config", &e);
        }
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_adds_scheme() {
        assert_eq!(normalize_address("192.168.0.109:8096"), "http://192.168.0.109:8096");
        assert_eq!(normalize_address("myserver"), "http://myserver");
    }

    #[test]
    fn test_normalize_address_keeps_scheme() {
        assert_eq!(normalize_address("http://host:8096"), "http://host:8096");
        assert_eq!(normalize_address("https://host"), "https://host");
    }

    #[test]
    fn test_normalize_address_strips_trailing_slash() {
        assert_eq!(normalize_address("http://host:8096/ "), "http://host:8096");
        assert_eq!(normalize_address("host/"), "http://host");
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jellylist_config.txt");
        let cfg = Config {
            address: "http://host:8096".to_string(),
            api_key: "abcdef0123456789".to_string(),
        };
        save_config_to(&path, &cfg).unwrap();
        let loaded = read_config_from(&path);
        assert_eq!(loaded.address, cfg.address);
        assert_eq!(loaded.api_key, cfg.api_key);
    }

    #[test]
    fn test_read_config_tolerates_junk_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jellylist_config.txt");
        fs::write(
            &path,
            "# comment without separator\naddress = http://host:8096\nunknown_key=ignored\n\napi_key=tok\n",
        )
        .unwrap();
        let cfg = read_config_from(&path);
        assert_eq!(cfg.address, "http://host:8096");
        assert_eq!(cfg.api_key, "tok");
    }

    #[test]
    fn test_read_config_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config_from(&dir.path().join("no_such_file.txt"));
        assert!(cfg.address.is_empty());
        assert!(cfg.api_key.is_empty());
    }
}
