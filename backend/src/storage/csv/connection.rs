use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::category_repository::CategoryRepository;
use super::payable_repository::PayableRepository;
use super::permission_repository::PermissionRepository;
use super::provider_repository::ProviderRepository;
use crate::storage::traits::Connection;

pub const PAYABLES_FILE: &str = "cuentas_pagar.csv";
pub const PROVIDERS_FILE: &str = "proveedores.csv";
pub const CATEGORIES_FILE: &str = "categorias.csv";
pub const PERMISSIONS_FILE: &str = "permisos.yaml";

pub const PAYABLES_HEADER: [&str; 12] = shared::csv_export::CSV_HEADER;
pub const PROVIDERS_HEADER: [&str; 4] = ["id", "nombre", "rfc", "contacto"];
pub const CATEGORIES_HEADER: [&str; 2] = ["id", "nombre"];

/// Written on first start so a fresh data directory has one usable account
const DEFAULT_PERMISSIONS: &str = "\
usuarios:
  admin:
    is_admin: true
";

/// CsvConnection owns the data directory and the lock that serializes file rewrites
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a connection, creating the directory and missing files
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory {}", base_path.display());
        }

        let connection = Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        };
        connection.ensure_csv_file(&connection.payables_file_path(), &PAYABLES_HEADER)?;
        connection.ensure_csv_file(&connection.providers_file_path(), &PROVIDERS_HEADER)?;
        connection.ensure_csv_file(&connection.categories_file_path(), &CATEGORIES_HEADER)?;
        connection.ensure_permissions_file()?;

        Ok(connection)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn payables_file_path(&self) -> PathBuf {
        self.base_directory.join(PAYABLES_FILE)
    }

    pub fn providers_file_path(&self) -> PathBuf {
        self.base_directory.join(PROVIDERS_FILE)
    }

    pub fn categories_file_path(&self) -> PathBuf {
        self.base_directory.join(CATEGORIES_FILE)
    }

    pub fn permissions_file_path(&self) -> PathBuf {
        self.base_directory.join(PERMISSIONS_FILE)
    }

    /// Hold the returned guard for the whole read-modify-write
    pub async fn lock_for_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    fn ensure_csv_file(&self, path: &Path, header: &[&str]) -> Result<()> {
        if !path.exists() {
            let mut csv_writer = WriterBuilder::new().from_path(path)?;
            csv_writer.write_record(header)?;
            csv_writer.flush()?;
            debug!("Created {}", path.display());
        }
        Ok(())
    }

    fn ensure_permissions_file(&self) -> Result<()> {
        let path = self.permissions_file_path();
        if !path.exists() {
            fs::write(&path, DEFAULT_PERMISSIONS)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Created default permission table at {}", path.display());
        }
        Ok(())
    }

    /// Read every row of a CSV file with a header line
    pub fn read_records<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: T = result
                .with_context(|| format!("Invalid row {} in {}", index + 2, path.display()))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Rewrite a CSV file through a temporary file renamed into place
    pub fn write_records<T: Serialize>(&self, path: &Path, header: &[&str], records: &[T]) -> Result<()> {
        let temp_path = path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to open {}", temp_path.display()))?;

            let mut csv_writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));
            csv_writer.write_record(header)?;
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type PayableRepository = PayableRepository;
    type ProviderRepository = ProviderRepository;
    type CategoryRepository = CategoryRepository;
    type PermissionRepository = PermissionRepository;

    fn create_payable_repository(&self) -> Self::PayableRepository {
        PayableRepository::new(self.clone())
    }

    fn create_provider_repository(&self) -> Self::ProviderRepository {
        ProviderRepository::new(self.clone())
    }

    fn create_category_repository(&self) -> Self::CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    fn create_permission_repository(&self) -> Self::PermissionRepository {
        PermissionRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_files_with_headers() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");
        let connection = CsvConnection::new(&data_dir).unwrap();

        assert_eq!(connection.base_directory(), data_dir.as_path());
        let payables = fs::read_to_string(connection.payables_file_path()).unwrap();
        assert_eq!(payables.trim_end(), PAYABLES_HEADER.join(","));
        let providers = fs::read_to_string(connection.providers_file_path()).unwrap();
        assert_eq!(providers.trim_end(), "id,nombre,rfc,contacto");
        let permissions = fs::read_to_string(connection.permissions_file_path()).unwrap();
        assert!(permissions.contains("admin"));
    }

    #[test]
    fn test_existing_files_are_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PERMISSIONS_FILE), "usuarios: {}\n").unwrap();
        fs::write(temp_dir.path().join(CATEGORIES_FILE), "id,nombre\ncat-1,Renta\n").unwrap();

        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let permissions = fs::read_to_string(connection.permissions_file_path()).unwrap();
        assert_eq!(permissions, "usuarios: {}\n");
        let categories = fs::read_to_string(connection.categories_file_path()).unwrap();
        assert!(categories.contains("Renta"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.categories_file_path();
        let rows = vec![shared::Category { id: "cat-1".to_string(), name: "Renta".to_string() }];

        connection.write_records(&path, &CATEGORIES_HEADER, &rows).unwrap();

        assert!(!path.with_extension("tmp").exists());
        let read: Vec<shared::Category> = connection.read_records(&path).unwrap();
        assert_eq!(read, rows);
    }
}
