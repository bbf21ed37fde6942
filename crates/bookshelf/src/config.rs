use crate::errors::Error;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the catalog database, may also be set in a `.env` file
pub const DATABASE_ENV: &str = "BOOKSHELF_DATABASE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
}

impl Config {
    /// Resolves the configuration. The `--database` flag wins over the environment.
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self, Error> {
        Self::resolve_with(flag, env::var_os(DATABASE_ENV).map(PathBuf::from))
    }

    fn resolve_with(flag: Option<PathBuf>, from_env: Option<PathBuf>) -> Result<Self, Error> {
        let database = flag
            .or(from_env)
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(Error::MissingDatabasePath)?;
        log::info!("Using database at {}", database.display());

        Ok(Self { database })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flag_wins_over_environment() {
        let config = Config::resolve_with(
            Some(PathBuf::from("flag.db")),
            Some(PathBuf::from("env.db")),
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("flag.db"));
    }

    #[test]
    fn test_environment_fallback() {
        let config = Config::resolve_with(None, Some(PathBuf::from("env.db"))).unwrap();
        assert_eq!(config.database, PathBuf::from("env.db"));
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            Config::resolve_with(None, None),
            Err(Error::MissingDatabasePath)
        ));
        assert!(matches!(
            Config::resolve_with(None, Some(PathBuf::new())),
            Err(Error::MissingDatabasePath)
        ));
    }
}
