// Precompiled package database: the fallback when a source tree is unusable

use crate::error::DatabaseError;
use automock_types::Package;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Environment variable overriding the export database location
pub const PKGDB_ENV: &str = "AUTOMOCK_PKGDB";

/// Version of the export data layout written by `ExportDatabase::write`
pub const FORMAT_VERSION: u32 = 1;

/// Source of already-built packages, queried by module path
pub trait PackageDatabase {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, DatabaseError>;
}

/// Database that never resolves anything
#[derive(Debug, Default)]
pub struct UnavailableDatabase;

impl PackageDatabase for UnavailableDatabase {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, DatabaseError> {
        Err(DatabaseError::Unavailable {
            path: path.to_string(),
        })
    }
}

/// Packages registered in code
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    packages: HashMap<String, Rc<Package>>,
    lookups: usize,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: Package) -> Rc<Package> {
        let package = Rc::new(package);
        self.packages
            .insert(package.path.clone(), Rc::clone(&package));
        package
    }

    /// Number of `import` calls served so far, hits and misses
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

impl PackageDatabase for MemoryDatabase {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, DatabaseError> {
        self.lookups += 1;
        self.packages
            .get(path)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound {
                path: path.to_string(),
            })
    }
}

#[derive(Serialize, Deserialize)]
struct ExportData {
    version: u32,
    package: Package,
}

/// Directory of JSON export data, one `<module path>.json` file per package
#[derive(Debug)]
pub struct ExportDatabase {
    root: PathBuf,
    loaded: HashMap<String, Rc<Package>>,
}

impl ExportDatabase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: HashMap::new(),
        }
    }

    /// Default location: `$AUTOMOCK_PKGDB`, else `~/.automock/pkg`
    pub fn default_location() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(PKGDB_ENV).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        dirs::home_dir().map(|home| home.join(".automock").join("pkg"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Export data file for a module path; `None` for paths that would
    /// escape the database root
    pub fn file_for(&self, path: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return None;
        }

        let mut file = self.root.clone();
        for segment in &segments {
            file.push(segment);
        }
        let mut name = file.into_os_string();
        name.push(".json");
        Some(PathBuf::from(name))
    }

    /// Write export data for `package`, returning the file written
    pub fn write(&self, package: &Package) -> Result<PathBuf, DatabaseError> {
        let file = self
            .file_for(&package.path)
            .ok_or_else(|| DatabaseError::NotFound {
                path: package.path.clone(),
            })?;

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|source| DatabaseError::Io {
                file: parent.to_path_buf(),
                source,
            })?;
        }

        let data = ExportData {
            version: FORMAT_VERSION,
            package: package.clone(),
        };
        let json = serde_json::to_string_pretty(&data).map_err(|e| DatabaseError::Malformed {
            file: file.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&file, json).map_err(|source| DatabaseError::Io {
            file: file.clone(),
            source,
        })?;

        log::debug!("wrote export data for {} to {}", package.path, file.display());
        Ok(file)
    }

    fn load(&self, path: &str) -> Result<Package, DatabaseError> {
        let file = self.file_for(path).ok_or_else(|| DatabaseError::NotFound {
            path: path.to_string(),
        })?;

        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DatabaseError::NotFound {
                    path: path.to_string(),
                })
            }
            Err(source) => return Err(DatabaseError::Io { file, source }),
        };

        let data: ExportData = serde_json::from_str(&text).map_err(|e| DatabaseError::Malformed {
            file: file.clone(),
            reason: e.to_string(),
        })?;

        if data.version != FORMAT_VERSION {
            return Err(DatabaseError::Malformed {
                file,
                reason: format!(
                    "format version {} (expected {})",
                    data.version, FORMAT_VERSION
                ),
            });
        }
        if data.package.path != path {
            return Err(DatabaseError::Malformed {
                file,
                reason: format!("export data describes {}", data.package.path),
            });
        }

        Ok(data.package)
    }
}

impl PackageDatabase for ExportDatabase {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, DatabaseError> {
        if let Some(package) = self.loaded.get(path) {
            return Ok(Rc::clone(package));
        }

        let package = Rc::new(self.load(path)?);
        log::debug!("loaded export data for {} from {}", path, self.root.display());
        self.loaded.insert(path.to_string(), Rc::clone(&package));
        Ok(package)
    }
}
