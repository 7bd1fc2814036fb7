//! File-backed user directory behind the availability check.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("could not read the user file: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("user file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct UserRecord {
    username: String,
}

/// Re-reads the user file on every lookup so edits take effect without a
/// restart.
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Exact-match lookup. No case folding, no trimming.
    pub async fn contains(&self, username: &str) -> Result<bool, DirectoryError> {
        let bytes = fs::read(&self.path).await?;
        let users: Vec<UserRecord> = serde_json::from_slice(&bytes)?;

        Ok(users.iter().any(|user| user.username == username))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn user_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn finds_an_exact_username_match() {
        let file =
            user_file(r#"[{"username":"bob","email":"bob@example.com"},{"username":"alice"}]"#);
        let directory = UserDirectory::new(file.path());

        assert!(directory.contains("bob").await.unwrap());
        assert!(!directory.contains("carol").await.unwrap());
    }

    #[tokio::test]
    async fn does_not_case_fold() {
        let file = user_file(r#"[{"username":"Bob"}]"#);
        let directory = UserDirectory::new(file.path());

        assert!(!directory.contains("bob").await.unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let directory = UserDirectory::new("/definitely/not/here/users.json");

        assert!(matches!(
            directory.contains("bob").await,
            Err(DirectoryError::Unreadable(_))
        ));
    }

    #[tokio::test]
    async fn garbage_contents_are_malformed() {
        let file = user_file("{ not json");
        let directory = UserDirectory::new(file.path());

        assert!(matches!(
            directory.contains("bob").await,
            Err(DirectoryError::Malformed(_))
        ));
    }
}
