use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::difficulty::Precedence;

pub const DEFAULT_FPL_API_BASE: &str = "https://fantasy.premierleague.com/api";
pub const DEFAULT_BACKEND_BASE: &str = "http://localhost:8000";

const DEFAULT_FETCH_PARALLELISM: usize = 6;
const DEFAULT_LOG_FILE: &str = "fpl_terminal.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fpl_base: String,
    pub backend_base: String,
    pub debug: bool,
    pub preset_team_id: Option<String>,
    pub utc_offset_hours: i32,
    pub http_timeout: Option<Duration>,
    pub difficulty_precedence: Precedence,
    pub fetch_parallelism: usize,
    pub session_file: Option<PathBuf>,
    /// Debug trace destination; only opened when `debug` is on.
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fpl_base: DEFAULT_FPL_API_BASE.to_string(),
            backend_base: DEFAULT_BACKEND_BASE.to_string(),
            debug: false,
            preset_team_id: None,
            utc_offset_hours: 0,
            http_timeout: None,
            difficulty_precedence: Precedence::Upstream,
            fetch_parallelism: DEFAULT_FETCH_PARALLELISM,
            session_file: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let fpl_base = opt_env("FPL_API_BASE")
            .map(|v| trim_base(&v))
            .unwrap_or_else(|| DEFAULT_FPL_API_BASE.to_string());
        let backend_base = opt_env("FPL_BACKEND_BASE")
            .map(|v| trim_base(&v))
            .unwrap_or_else(|| DEFAULT_BACKEND_BASE.to_string());
        let debug = env_bool("FPL_DEBUG", false);
        let preset_team_id = opt_env("FPL_TEAM_ID");
        let utc_offset_hours = env::var("FPL_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0)
            .clamp(-12, 14);
        // 0 keeps requests unbounded, matching the browser client.
        let http_timeout = env::var("FPL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let difficulty_precedence = opt_env("FPL_DIFFICULTY_PRECEDENCE")
            .and_then(|v| Precedence::parse(&v))
            .unwrap_or(Precedence::Upstream);
        let fetch_parallelism = env::var("FPL_FETCH_PARALLELISM")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_PARALLELISM)
            .clamp(1, 16);
        let session_file = opt_env("FPL_SESSION_FILE").map(PathBuf::from);
        let log_file = opt_env("FPL_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            fpl_base,
            backend_base,
            debug,
            preset_team_id,
            utc_offset_hours,
            http_timeout,
            difficulty_precedence,
            fetch_parallelism,
            session_file,
            log_file,
        }
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
