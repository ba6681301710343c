//! Module resolution for automock.
//!
//! A [`Resolver`] turns a module path into a type-checked [`Package`],
//! loading it from the first search root that holds its sources and
//! resolving its own imports through itself. When the source tree is
//! missing or does not parse and check, the resolver asks its
//! [`PackageDatabase`] instead.
//!
//! [`Package`]: automock_types::Package

pub mod config;
pub mod database;
pub mod error;
pub mod resolver;

pub use config::{ResolverConfig, SearchPath};
pub use database::{
    ExportDatabase, MemoryDatabase, PackageDatabase, UnavailableDatabase, FORMAT_VERSION,
    PKGDB_ENV,
};
pub use error::{DatabaseError, ResolveError, SourceTreeError};
pub use resolver::Resolver;
