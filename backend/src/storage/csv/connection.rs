use anyhow::Result;
use csv::{Reader, WriterBuilder};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::storage::traits::Connection;
use super::override_repository::OverrideRepository;
use super::planning_repository::PlanningRepository;

pub const PLANNING_FILE_NAME: &str = "planning_definitions.csv";
pub const OVERRIDES_FILE_NAME: &str = "monthly_overrides.csv";

pub const PLANNING_HEADER: &str =
    "id,plan_type,category_name,formula,base_value,end_month,created_at,updated_at\n";
pub const OVERRIDES_HEADER: &str =
    "id,planning_id,month,value,is_paid,paid_date,version,created_at,updated_at\n";

/// CsvConnection manages the data directory and the CSV files inside it
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: Arc<PathBuf>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn planning_file_path(&self) -> PathBuf {
        self.base_directory.join(PLANNING_FILE_NAME)
    }

    pub fn overrides_file_path(&self) -> PathBuf {
        self.base_directory.join(OVERRIDES_FILE_NAME)
    }

    /// Ensure a CSV file exists, writing its header when it does not
    pub fn ensure_file_exists(&self, path: &Path, header: &str) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(self.base_directory.as_ref())?;
        }
        if !path.exists() {
            fs::write(path, header)?;
            debug!("Created CSV file: {:?}", path);
        }
        Ok(())
    }

    /// Read every row of a CSV file, skipping rows that fail to deserialize
    pub fn read_records<T: DeserializeOwned>(&self, path: &Path, header: &str) -> Result<Vec<T>> {
        self.ensure_file_exists(path, header)?;

        let file = File::open(path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize::<T>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping malformed row {} in {:?}: {}", index + 1, path, e);
                }
            }
        }
        Ok(records)
    }

    /// Rewrite a CSV file through a temp file and rename
    pub fn write_records<T: Serialize>(&self, path: &Path, header: &str, records: &[T]) -> Result<()> {
        let temp_file_path = path.with_extension("csv.tmp");

        {
            let mut temp_file = BufWriter::new(File::create(&temp_file_path)?);
            temp_file.write_all(header.as_bytes())?;
            let mut csv_writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(temp_file);
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_file_path, path)?;
        debug!("Wrote {} records to {:?}", records.len(), path);
        Ok(())
    }
}

impl Connection for CsvConnection {
    type PlanningRepository = PlanningRepository;
    type OverrideRepository = OverrideRepository;

    fn create_planning_repository(&self) -> Self::PlanningRepository {
        PlanningRepository::new(self.clone())
    }

    fn create_override_repository(&self) -> Self::OverrideRepository {
        OverrideRepository::new(self.clone())
    }
}
