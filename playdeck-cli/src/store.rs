use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no configuration directory on this system")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid credentials file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not write credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// TOML layout of the credentials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    token: Option<String>,
    email: Option<String>,
}

/// Keeps the bearer token between invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/playdeck/credentials.toml`.
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir.join("playdeck").join("credentials.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<CredentialsFile>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(toml::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The saved token, if there is one.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read()?
            .and_then(|file| file.token)
            .filter(|token| !token.is_empty()))
    }

    /// The email the token was obtained for.
    pub fn email(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.and_then(|file| file.email))
    }

    pub fn save(&self, token: &str, email: Option<&str>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&CredentialsFile {
            token: Some(token.to_string()),
            email: email.map(str::to_string),
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Forget the saved token. Returns whether there was one.
    pub fn clear(&self) -> Result<bool, StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("credentials.toml"));
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("credentials.toml"));

        store.save("abc.def", Some("ana@example.com")).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def"));
        assert_eq!(store.email().unwrap().as_deref(), Some("ana@example.com"));

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn empty_token_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "token = \"\"\n").unwrap();
        assert_eq!(TokenStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "token = [").unwrap();
        assert!(matches!(
            TokenStore::new(path).load(),
            Err(StoreError::Parse(_))
        ));
    }
}
