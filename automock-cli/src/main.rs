use anyhow::{Context, Result};
use automock_importer::{
    ExportDatabase, PackageDatabase, ResolveError, Resolver, ResolverConfig, UnavailableDatabase,
};
use automock_imports::ImportTracker;
use automock_types::Package;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

mod method;
mod report;

use method::{GeneratorQualifier, Method};
use report::{InterfaceReport, MethodReport};

#[derive(Parser)]
#[command(name = "automock")]
#[command(version = "0.2.0")]
#[command(about = "Resolve interfaces and the imports their mocks need", long_about = None)]
struct Cli {
    /// Source search root (repeatable; replaces the environment list)
    #[arg(long = "root", value_name = "DIR", global = true)]
    roots: Vec<PathBuf>,

    /// Environment variable listing search roots
    #[arg(long, value_name = "VAR", default_value = "GOPATH", global = true)]
    search_var: String,

    /// Package export database (default: $AUTOMOCK_PKGDB or ~/.automock/pkg)
    #[arg(long, value_name = "DIR", global = true)]
    pkgdb: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an interface's methods and the imports a mock of it needs
    Inspect {
        /// Module path of the package declaring the interface
        #[arg(value_name = "PACKAGE")]
        package: String,

        /// Interface type name
        #[arg(value_name = "INTERFACE")]
        interface: String,

        /// Package name the mock is generated into (default: the interface's package)
        #[arg(long, value_name = "NAME")]
        current: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve a package and store its export data
    Export {
        /// Module path of the package
        #[arg(value_name = "PACKAGE")]
        package: String,

        /// Database directory to write into (default: the package database)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = if cli.roots.is_empty() {
        ResolverConfig::with_env_var(&cli.search_var)
    } else {
        ResolverConfig::with_roots(cli.roots.iter().cloned())
    };

    let pkgdb = cli.pkgdb.clone().or_else(ExportDatabase::default_location);
    let database: Box<dyn PackageDatabase> = match &pkgdb {
        Some(dir) => {
            log::info!("package database: {}", dir.display());
            Box::new(ExportDatabase::new(dir))
        }
        None => Box::new(UnavailableDatabase),
    };
    let mut resolver = Resolver::new(config, database);

    match cli.command {
        Commands::Inspect {
            package,
            interface,
            current,
            json,
        } => inspect(&mut resolver, &package, &interface, current, json),

        Commands::Export { package, out } => {
            let dir = out
                .or(pkgdb)
                .context("No export database directory: pass --out or --pkgdb")?;
            export(&mut resolver, &package, &dir)
        }
    }
}

fn resolve(resolver: &mut Resolver, path: &str) -> Result<Rc<Package>> {
    resolver.resolve(path).map_err(|err: ResolveError| {
        report::print_diagnostics(&err.diagnostics());
        anyhow::Error::new(err).context(format!("Failed to resolve package {}", path))
    })
}

fn inspect(
    resolver: &mut Resolver,
    path: &str,
    name: &str,
    current: Option<String>,
    json: bool,
) -> Result<()> {
    let package = resolve(resolver, path)?;

    let Some(iface) = package.interface(name) else {
        report::print_diagnostics(&[report::missing_interface(&package, name)]);
        anyhow::bail!("No interface {} in package {}", name, package.path);
    };

    let current = current.unwrap_or_else(|| package.name.clone());
    let qualifier = GeneratorQualifier::new(current.clone());
    let mut tracker = ImportTracker::new(current.clone());

    let methods = iface
        .methods
        .iter()
        .map(|func| {
            tracker.add_signature(&func.signature);
            MethodReport::new(&Method::new(func, &qualifier))
        })
        .collect();

    let report = InterfaceReport {
        package: package.path.clone(),
        interface: name.to_string(),
        current,
        methods,
        imports: tracker.into_imports(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn export(resolver: &mut Resolver, path: &str, dir: &Path) -> Result<()> {
    let package = resolve(resolver, path)?;
    let file = ExportDatabase::new(dir)
        .write(&package)
        .with_context(|| format!("Failed to write export data for {}", path))?;

    println!(
        "{} {} -> {}",
        "Exported".green().bold(),
        package.path,
        file.display()
    );
    Ok(())
}
