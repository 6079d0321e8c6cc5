use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SESSION_DIR: &str = "fpl_terminal";
const SESSION_FILE: &str = "session.json";
const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamIdError {
    #[error("enter your team id")]
    Empty,
    #[error("team id must be a positive number, got {0:?}")]
    Invalid(String),
}

/// Trimmed, non-empty, positive integer.
pub fn parse_team_id(input: &str) -> Result<u64, TeamIdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TeamIdError::Empty);
    }
    match trimmed.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TeamIdError::Invalid(trimmed.to_string())),
    }
}

/// Where the signed-in manager id lives between runs.
pub trait SessionStore {
    fn get(&self) -> Option<u64>;
    fn set(&mut self, team_id: u64) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFileBody {
    version: u32,
    team_id: u64,
}

#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `override_path`, else the XDG config location; `None` when no home
    /// directory can be found.
    pub fn locate(override_path: Option<PathBuf>) -> Option<Self> {
        override_path.or_else(default_session_path).map(Self::new)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStore for FileSession {
    fn get(&self) -> Option<u64> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let body = serde_json::from_str::<SessionFileBody>(&raw).ok()?;
        if body.version != SESSION_VERSION || body.team_id == 0 {
            return None;
        }
        Some(body.team_id)
    }

    fn set(&mut self, team_id: u64) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create session dir {}", dir.display()))?;
        }
        let json = serde_json::to_string(&SessionFileBody {
            version: SESSION_VERSION,
            team_id,
        })
        .context("encode session")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}

/// Process-lifetime store, used when no config directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    team_id: Option<u64>,
}

impl SessionStore for MemorySession {
    fn get(&self) -> Option<u64> {
        self.team_id
    }

    fn set(&mut self, team_id: u64) -> Result<()> {
        self.team_id = Some(team_id);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.team_id = None;
        Ok(())
    }
}

fn default_session_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(SESSION_DIR).join(SESSION_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(SESSION_DIR)
            .join(SESSION_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_parsing() {
        assert_eq!(parse_team_id("  123456 "), Ok(123456));
        assert_eq!(parse_team_id("   "), Err(TeamIdError::Empty));
        assert_eq!(parse_team_id("0"), Err(TeamIdError::Invalid("0".into())));
        assert_eq!(parse_team_id("12ab"), Err(TeamIdError::Invalid("12ab".into())));
        assert_eq!(parse_team_id("-4"), Err(TeamIdError::Invalid("-4".into())));
    }

    #[test]
    fn file_session_round_trip() {
        let dir = std::env::temp_dir().join(format!("fpl_terminal_session_{}", std::process::id()));
        let mut session = FileSession::new(dir.join("nested").join(SESSION_FILE));
        assert_eq!(session.get(), None);
        session.set(42).expect("write session");
        assert_eq!(session.get(), Some(42));
        session.clear().expect("clear session");
        assert_eq!(session.get(), None);
        session.clear().expect("clearing twice is fine");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_session() {
        let mut session = MemorySession::default();
        assert_eq!(session.get(), None);
        session.set(7).expect("set");
        assert_eq!(session.get(), Some(7));
        session.clear().expect("clear");
        assert_eq!(session.get(), None);
    }
}
