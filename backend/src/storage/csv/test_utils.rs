/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::override_repository::OverrideRepository;
use super::planning_repository::PlanningRepository;

/// RAII test environment; the data directory is removed on drop
pub struct TestEnvironment {
    /// Kept alive so the directory survives until the environment is dropped
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Same as `new`, with a recognizable directory prefix for debugging
    pub async fn new_with_prefix(prefix: &str) -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("PLANNER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Both CSV repositories over one temporary data directory
pub struct RepositoryTestHelper {
    pub env: TestEnvironment,
    pub planning_repo: PlanningRepository,
    pub override_repo: OverrideRepository,
}

impl RepositoryTestHelper {
    pub async fn new() -> Result<Self> {
        let env = TestEnvironment::new().await?;
        let planning_repo = PlanningRepository::new(env.connection.clone());
        let override_repo = OverrideRepository::new(env.connection.clone());

        Ok(RepositoryTestHelper {
            env,
            planning_repo,
            override_repo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MonthlyOverride;
    use crate::storage::traits::OverrideStorage;
    use chrono::Utc;

    #[tokio::test]
    async fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new_with_prefix("planner_test_").await?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.exists());

            std::fs::write(base_path.join("test_file.txt"), "test data")?;
            assert!(base_path.join("test_file.txt").exists());
        }

        assert!(!base_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_repository_helper_shares_directory() -> Result<()> {
        let helper = RepositoryTestHelper::new().await?;
        let record = MonthlyOverride::new("planning::a", "2025-03".parse()?, 12.0, Utc::now());
        helper.override_repo.store_override(&record).await?;

        assert!(helper.env.connection.overrides_file_path().exists());
        assert!(helper.env.base_directory().join("monthly_overrides.csv").exists());
        Ok(())
    }
}
