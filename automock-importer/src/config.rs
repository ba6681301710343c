// Resolver configuration

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_SEARCH_VAR: &str = "GOPATH";
pub const DEFAULT_SOURCE_SUBDIR: &str = "src";
pub const DEFAULT_SOURCE_EXTENSION: &str = "go";
/// Separator of the environment root list on every platform
pub const ROOT_LIST_SEPARATOR: char = ':';

/// Where the source-tree search roots come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPath {
    /// Colon-separated list in an environment variable, read on every lookup
    Env(String),
    /// Fixed list of roots
    Fixed(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub search_path: SearchPath,
    /// Directory under each root that holds module sources
    pub source_subdir: String,
    /// Extension (without the dot) of source files
    pub source_extension: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_path: SearchPath::Env(DEFAULT_SEARCH_VAR.to_string()),
            source_subdir: DEFAULT_SOURCE_SUBDIR.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_path: SearchPath::Fixed(roots.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_env_var(var: impl Into<String>) -> Self {
        Self {
            search_path: SearchPath::Env(var.into()),
            ..Self::default()
        }
    }

    /// Current search roots, in order. Empty entries are dropped and
    /// relative roots are made absolute against the working directory.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let raw: Vec<PathBuf> = match &self.search_path {
            SearchPath::Env(var) => match env::var_os(var) {
                Some(value) => value
                    .to_string_lossy()
                    .split(ROOT_LIST_SEPARATOR)
                    .map(PathBuf::from)
                    .collect(),
                None => Vec::new(),
            },
            SearchPath::Fixed(roots) => roots.clone(),
        };

        raw.into_iter()
            .filter(|root| !root.as_os_str().is_empty())
            .map(|root| absolutize(&root))
            .collect()
    }

    /// Source directory of `module_path` under one root
    pub fn module_dir(&self, root: &Path, module_path: &str) -> PathBuf {
        let mut dir = root.join(&self.source_subdir);
        for segment in module_path.split('/').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }
        dir
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.source_extension.as_str())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.search_path, SearchPath::Env("GOPATH".to_string()));
        assert_eq!(config.source_subdir, "src");
        assert_eq!(config.source_extension, "go");
    }

    #[test]
    fn test_fixed_roots_skip_empty_and_absolutize() {
        let config = ResolverConfig::with_roots(["", "/opt/go", "relative"]);
        let roots = config.search_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0], PathBuf::from("/opt/go"));
        assert!(roots[1].is_absolute());
        assert!(roots[1].ends_with("relative"));
    }

    #[test]
    fn test_env_roots_are_read_each_time() {
        let var = "AUTOMOCK_TEST_CONFIG_ROOTS";
        let config = ResolverConfig::with_env_var(var);

        env::remove_var(var);
        assert!(config.search_roots().is_empty());

        env::set_var(var, "/a::/b");
        assert_eq!(
            config.search_roots(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );

        env::set_var(var, "/c");
        assert_eq!(config.search_roots(), vec![PathBuf::from("/c")]);
        env::remove_var(var);
    }

    #[test]
    fn test_env_roots_split_on_colon_only() {
        let var = "AUTOMOCK_TEST_CONFIG_COLON";
        let config = ResolverConfig::with_env_var(var);

        env::set_var(var, "/a;b:/c");
        assert_eq!(
            config.search_roots(),
            vec![PathBuf::from("/a;b"), PathBuf::from("/c")]
        );
        env::remove_var(var);
    }

    #[test]
    fn test_module_dir_and_extension() {
        let config = ResolverConfig::default();
        let dir = config.module_dir(Path::new("/go"), "github.com/acme/store");
        assert_eq!(dir, PathBuf::from("/go/src/github.com/acme/store"));
        assert!(config.is_source_file(Path::new("store.go")));
        assert!(!config.is_source_file(Path::new("README.md")));
        assert!(!config.is_source_file(Path::new("go")));
    }
}
