mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use codecfg_core::{Config, ConflictPolicy};
use commands::{PlatformArgs, EXIT_CONFIG_ERROR, EXIT_CONFLICT, EXIT_FAILURE};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "codecfg",
    version,
    about = "Deterministic build option resolution for prebuilt codec dependencies"
)]
struct Cli {
    /// Path to a codecfg config file (default: ~/.config/codecfg/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the option set of a dependency for a platform.
    Resolve {
        /// Built-in variant to resolve (see `codecfg variants`).
        #[arg(long, conflicts_with = "rules")]
        variant: Option<String>,
        /// Path to a rule table TOML file.
        #[arg(long)]
        rules: Option<PathBuf>,
        #[command(flatten)]
        platform: PlatformArgs,
        /// Let later rules silently override earlier ones instead of failing.
        #[arg(long, default_value_t = false)]
        last_write_wins: bool,
        /// Write the resolved configuration to this lock file.
        #[arg(long)]
        lock: Option<PathBuf>,
    },
    /// List the built-in variants.
    Variants,
    /// Print the rule table of a built-in variant.
    Show {
        /// Variant name.
        variant: String,
    },
    /// Parse a rule table and validate it against the option catalog.
    Check {
        /// Path to rule table TOML file.
        file: PathBuf,
    },
    /// Resolve two rule tables for the same platform and list differences.
    Compare {
        /// Variant name or rule table path.
        left: String,
        /// Variant name or rule table path.
        right: String,
        #[command(flatten)]
        platform: PlatformArgs,
    },
    /// Verify a lock file's integrity.
    Verify {
        /// Path to lock file.
        #[arg(default_value = "codecfg.lock")]
        lock: PathBuf,
        /// Also fail if the lock was produced for a different platform.
        #[arg(long, default_value_t = false)]
        current_platform: bool,
        #[command(flatten)]
        platform: PlatformArgs,
    },
    /// Render compiler flags from a package manager build-info JSON file.
    Flags {
        /// Path to build-info JSON.
        info: PathBuf,
        /// Field to collect from every dependency (e.g. include_paths).
        field: String,
        /// Text prepended to each value inside the quotes.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        prefix: String,
        /// Text emitted before each quoted value (e.g. -I).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        option: String,
    },
    /// Show the config file, or update it when any field is given.
    Config {
        /// Variant used by `resolve` without --variant or --rules (empty to clear).
        #[arg(long)]
        default_variant: Option<String>,
        /// Conflict policy: strict or last-write-wins.
        #[arg(long)]
        conflict_policy: Option<ConflictPolicy>,
        /// Pinned compiler (empty to clear).
        #[arg(long)]
        compiler: Option<String>,
        /// Pinned architecture (empty to clear).
        #[arg(long)]
        arch: Option<String>,
        /// Pinned build type (empty to clear).
        #[arg(long)]
        build_type: Option<String>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CODECFG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Resolve {
            variant,
            rules,
            platform,
            last_write_wins,
            lock,
        } => commands::resolve::run(
            &config,
            variant.as_deref(),
            rules.as_deref(),
            &platform,
            last_write_wins,
            lock.as_deref(),
            json_output,
        ),
        Commands::Variants => commands::variants::run(json_output),
        Commands::Show { variant } => commands::show::run(&variant, json_output),
        Commands::Check { file } => commands::check::run(&file, json_output),
        Commands::Compare {
            left,
            right,
            platform,
        } => commands::compare::run(&config, &left, &right, &platform, json_output),
        Commands::Verify {
            lock,
            current_platform,
            platform,
        } => commands::verify::run(&config, &lock, current_platform, &platform, json_output),
        Commands::Flags {
            info,
            field,
            prefix,
            option,
        } => commands::flags::run(&info, &field, &prefix, &option, json_output),
        Commands::Config {
            default_variant,
            conflict_policy,
            compiler,
            arch,
            build_type,
        } => commands::config::run(
            &config,
            cli.config.as_deref(),
            commands::config::ConfigUpdate {
                default_variant,
                conflict_policy,
                compiler,
                arch,
                build_type,
            },
            json_output,
        ),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("configuration error:")
                || msg.starts_with("failed to parse rule table")
                || msg.starts_with("failed to read rule table")
            {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("conflict:") {
                EXIT_CONFLICT
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(p) => Config::load_or_default(p),
        None => Config::load_default(),
    }
    .map_err(|e| e.to_string())
}
