use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    domain::company::{CompanyRecord, CSV_HEADERS},
    services::merge_engine::dedup_keep_last,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the company store: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read or write company CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// The company table persisted as a single CSV file.
pub struct CompanyStore {
    path: PathBuf,
}

impl CompanyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty table. A malformed one is an error.
    pub fn load(&self) -> Result<Vec<CompanyRecord>, StoreError> {
        if !self.path.exists() {
            log::info!(
                "No company store at {}, starting empty",
                self.path.display()
            );
            return Ok(vec![]);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<CompanyRecord>, csv::Error>>()?;

        log::info!(
            "Loaded {} companies from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Dedups on company name (last wins) and replaces the file. No locking.
    pub fn save(&self, table: &[CompanyRecord]) -> Result<(), StoreError> {
        let rows = dedup_keep_last(table.to_vec());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        let file = File::create(&tmp_path)?;
        write_csv(file, &rows)?;
        fs::rename(&tmp_path, &self.path)?;

        log::info!("Saved {} companies to {}", rows.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

/// Header row first, always, so an empty table still carries the schema.
pub fn write_csv<W: Write>(writer: W, rows: &[CompanyRecord]) -> Result<(), StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn to_csv_bytes(rows: &[CompanyRecord]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = vec![];
    write_csv(&mut buffer, rows)?;
    Ok(buffer)
}

pub fn from_csv_bytes(bytes: &[u8]) -> Result<Vec<CompanyRecord>, StoreError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let records = reader
        .deserialize()
        .collect::<Result<Vec<CompanyRecord>, csv::Error>>()?;
    Ok(records)
}
