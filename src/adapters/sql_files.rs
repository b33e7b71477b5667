use crate::core::{SqlBatch, SqlSource};
use crate::utils::error::{InitError, Result};
use std::path::PathBuf;

/// Reads bundled SQL files from a directory.
#[derive(Debug, Clone)]
pub struct SqlFileSource {
    base_path: PathBuf,
}

impl SqlFileSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl SqlSource for SqlFileSource {
    async fn read_batch(&self, name: &str) -> Result<SqlBatch> {
        let full_path = self.base_path.join(name);
        tracing::debug!("Reading SQL file {}", full_path.display());

        let contents = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|source| InitError::SqlFileError {
                path: full_path.display().to_string(),
                source,
            })?;
        Ok(SqlBatch {
            name: name.to_string(),
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_batch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("schema.sql"), "CREATE TABLE t (id INT);").unwrap();

        let source = SqlFileSource::new(dir.path());
        let batch = source.read_batch("schema.sql").await.unwrap();
        assert_eq!(batch.name, "schema.sql");
        assert_eq!(batch.contents, "CREATE TABLE t (id INT);");
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let source = SqlFileSource::new(dir.path());

        let err = source.read_batch("user.sql").await.unwrap_err();
        match &err {
            InitError::SqlFileError { path, .. } => {
                assert_eq!(path, &dir.path().join("user.sql").display().to_string());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("user.sql"));
        assert!(err.user_friendly_message().contains("user.sql"));
    }
}
