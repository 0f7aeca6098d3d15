use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub const DATA_DIR_ENV: &str = "TODOAPP_DIR";
const DEFAULT_DIR_NAME: &str = ".todoapp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Data directory from, in order: `data_dir`, `$TODOAPP_DIR`, `~/.todoapp`.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let from_env = env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_from(data_dir, from_env, dirs::home_dir())
    }

    fn resolve_from(
        flag: Option<PathBuf>,
        from_env: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = match flag.or(from_env) {
            Some(dir) => dir,
            None => home
                .ok_or_else(|| anyhow!("Could not determine home directory"))?
                .join(DEFAULT_DIR_NAME),
        };
        Ok(Config { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
