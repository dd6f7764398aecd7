use anyhow::Result;
use clap::Parser;
use nmi::install::install;
use nmi::list::list;
use std::path::PathBuf;

/// nmi - install packages from a local package cache
///
/// Packages are read from `<cache>/<name>/<version>/package.tgz` and unpacked
/// into `<prefix>/<name>`, with dependencies nested under `node_modules`.
/// When several versions of a package are cached you are asked to pick one.
///
/// Examples:
///   nmi install left-pad     # Install left-pad and its dependencies
///   nmi install              # Ask for the package name
///   nmi list                 # Print installed packages as manifest lines
#[derive(Parser, Debug)]
#[command(author, version = env!("NMI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package cache directory (defaults to ~/.npm; also via NMI_CACHE)
    #[arg(
        long = "cache",
        short = 'c',
        env = "NMI_CACHE",
        value_name = "PATH",
        global = true
    )]
    pub cache_root: Option<PathBuf>,

    /// Install prefix (defaults to ./node_modules; also via NMI_PREFIX)
    #[arg(
        long = "prefix",
        short = 'p',
        env = "NMI_PREFIX",
        value_name = "PATH",
        global = true
    )]
    pub prefix: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install a package and its dependencies from the cache
    Install(InstallArgs),

    /// List installed packages as `"name": "^version",` lines
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Package name; asked for interactively when omitted
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = nmi::runtime::RealRuntime;

    match cli.command {
        Commands::Install(args) => install(runtime, args.name, cli.cache_root, cli.prefix)?,
        Commands::List(_args) => list(runtime, cli.prefix)?,
    }
    Ok(())
}
