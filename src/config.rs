//! Runtime configuration read from the environment.
//!
//! - `HOST` (default `0.0.0.0`) and `PORT` (default `8080`): listen address.
//! - `RESULTS_DATA_DIR`: directory holding one `<tournamentId>.json` per tournament. Unset
//!   keeps results in memory only.
//! - `REGISTRY_CSV`: registrations to load at startup.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub registry_csv: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: None,
            registry_csv: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; an unparseable port falls
    /// back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: get("RESULTS_DATA_DIR").map(PathBuf::from),
            registry_csv: get("REGISTRY_CSV").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_all_values() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("RESULTS_DATA_DIR", "/var/lib/results"),
            ("REGISTRY_CSV", "players.csv"),
        ]));
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/var/lib/results")));
        assert_eq!(cfg.registry_csv, Some(PathBuf::from("players.csv")));
    }

    #[test]
    fn bad_port_and_blank_dir_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[("PORT", "eighty"), ("RESULTS_DATA_DIR", "  ")]));
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.data_dir, None);
    }
}
