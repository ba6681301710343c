// Module resolver: loads packages from the source tree, type-checks them
// and falls back to the package database when that fails

use crate::config::ResolverConfig;
use crate::database::PackageDatabase;
use crate::error::{ResolveError, SourceTreeError};
use automock_ast::SourceFile;
use automock_parser::Parser;
use automock_types::{check, ImportError, Importer, Package};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Outcome of looking a module up in the source tree
enum SourceAttempt {
    /// No search root holds the module (or its directory cannot be listed)
    Missing,
    Loaded(Package),
    Discarded(SourceTreeError),
}

/// Caching, recursive package loader. One resolver serves one run.
pub struct Resolver {
    config: ResolverConfig,
    database: Box<dyn PackageDatabase>,
    /// Packages built from source, by module path
    cache: HashMap<String, Rc<Package>>,
    /// Paths currently being loaded, outermost first
    in_flight: Vec<String>,
}

impl Resolver {
    pub fn new(config: ResolverConfig, database: Box<dyn PackageDatabase>) -> Self {
        Self {
            config,
            database,
            cache: HashMap::new(),
            in_flight: Vec::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.contains_key(path)
    }

    /// Module paths resolved from source so far, sorted
    pub fn cached_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.cache.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Resolve a module path to its package.
    ///
    /// A package built from source is cached and returned as the same `Rc`
    /// on later calls. Packages served by the database are not cached here.
    pub fn resolve(&mut self, path: &str) -> Result<Rc<Package>, ResolveError> {
        if let Some(package) = self.cache.get(path) {
            log::debug!("cache hit for {}", path);
            return Ok(Rc::clone(package));
        }

        if let Some(start) = self.in_flight.iter().position(|p| p == path) {
            let mut cycle = self.in_flight[start..].to_vec();
            cycle.push(path.to_string());
            return Err(ResolveError::ImportCycle { cycle });
        }

        self.in_flight.push(path.to_string());
        let attempt = self.load_from_source(path);
        self.in_flight.pop();

        let discarded = match attempt? {
            SourceAttempt::Loaded(package) => {
                let package = Rc::new(package);
                self.cache.insert(path.to_string(), Rc::clone(&package));
                return Ok(package);
            }
            SourceAttempt::Missing => None,
            SourceAttempt::Discarded(err) => {
                log::warn!(
                    "discarding source tree for {}, falling back to package database: {}",
                    path,
                    err
                );
                Some(Box::new(err))
            }
        };

        match self.database.import(path) {
            Ok(package) => {
                log::debug!("resolved {} from package database", path);
                Ok(package)
            }
            Err(source) => Err(ResolveError::Unresolved {
                path: path.to_string(),
                source,
                discarded,
            }),
        }
    }

    /// First `<root>/<subdir>/<path>` directory that exists
    fn find_module_dir(&self, path: &str) -> Option<PathBuf> {
        let roots = self.config.search_roots();
        let found = roots
            .iter()
            .map(|root| self.config.module_dir(root, path))
            .find(|dir| dir.is_dir());

        match &found {
            Some(dir) => log::debug!("found {} in {}", path, dir.display()),
            None => log::debug!("{} not under any of {} search roots", path, roots.len()),
        }
        found
    }

    /// Source files of a module directory in file-name order. Entries that
    /// are not directories are kept even if they cannot be stat'ed, so a
    /// broken file surfaces as a read error.
    fn list_source_files(&self, dir: &Path) -> Option<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cannot list {}: {}", dir.display(), e);
                return None;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| !p.is_dir() && self.config.is_source_file(p))
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Some(files)
    }

    fn load_from_source(&mut self, path: &str) -> Result<SourceAttempt, ResolveError> {
        let Some(dir) = self.find_module_dir(path) else {
            return Ok(SourceAttempt::Missing);
        };
        let Some(file_paths) = self.list_source_files(&dir) else {
            return Ok(SourceAttempt::Missing);
        };

        let mut files: Vec<SourceFile> = Vec::with_capacity(file_paths.len());
        for file in &file_paths {
            let bytes = fs::read(file).map_err(|source| ResolveError::FileRead {
                path: path.to_string(),
                file: file.clone(),
                source,
            })?;
            let source = match String::from_utf8(bytes) {
                Ok(source) => source,
                Err(err) => {
                    let valid_up_to = err.utf8_error().valid_up_to();
                    return Ok(SourceAttempt::Discarded(SourceTreeError::encoding(
                        file.clone(),
                        err.as_bytes(),
                        valid_up_to,
                    )));
                }
            };

            let parsed = Parser::with_file(&file.display().to_string(), &source)
                .and_then(|mut parser| parser.parse_file());
            match parsed {
                Ok(parsed) => files.push(parsed),
                Err(err) => return Ok(SourceAttempt::Discarded(err.into())),
            }
        }

        match check(path, &files, self) {
            Ok(package) => Ok(SourceAttempt::Loaded(package)),
            Err(err) => Ok(SourceAttempt::Discarded(err.into())),
        }
    }
}

impl Importer for Resolver {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, ImportError> {
        self.resolve(path).map_err(|e| Box::new(e) as ImportError)
    }
}
