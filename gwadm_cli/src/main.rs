use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod error;
mod orchestrators;
mod output;
mod terminal;

use crate::config::{AppConfig, ConfigManager, get_config};
use crate::error::{CliError, CliResult};
use crate::orchestrators::{MemberSource, OrgOrchestrator};
use crate::output::{OutputFormat, format_move_report, format_unit_info};
use gwadm_client_core::{OrgUnitChanges, RestProvisioningClient};

#[derive(Parser)]
#[command(name = "gwadm")]
#[command(author, version, about = "Groupware domain administration from the command line", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Override the configured default domain
    #[arg(long, global = true, value_name = "DOMAIN")]
    domain: Option<String>,

    /// Output format (defaults to text on a terminal, json otherwise)
    #[arg(short, long, global = true, value_name = "FORMAT")]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage organizational units
    Org {
        #[command(subcommand)]
        command: OrgCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum OrgCommand {
    /// Create a new org unit
    Create {
        /// Name of the new unit
        name: String,

        /// Description of the unit
        #[arg(long)]
        description: Option<String>,

        /// Parent org-unit path
        #[arg(long, default_value = "/")]
        parent: String,

        /// Block policy inheritance from the parent
        #[arg(long)]
        block_inheritance: bool,
    },

    /// Update an org unit: move members in and change metadata
    #[command(group(
        ArgGroup::new("members")
            .args(["add", "file", "group", "not_in_group"])
            .multiple(false)
    ))]
    Update {
        /// Org-unit path to update
        unit: String,

        /// Member identifiers to move into the unit
        #[arg(long, value_name = "MEMBER", num_args = 1..)]
        add: Option<Vec<String>>,

        /// CSV file of members; the identifier is the last column
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Move all members of this group into the unit
        #[arg(long, value_name = "GROUP")]
        group: Option<String>,

        /// Move all domain users not in this group into the unit
        #[arg(long, value_name = "GROUP")]
        not_in_group: Option<String>,

        /// Rename the unit
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Change the unit description
        #[arg(long)]
        description: Option<String>,

        /// Move the unit under a new parent path
        #[arg(long, value_name = "PATH")]
        parent: Option<String>,

        /// Set whether the unit blocks policy inheritance
        #[arg(long, value_name = "BOOL")]
        block_inheritance: Option<bool>,
    },

    /// Show org-unit metadata
    Info {
        /// Org-unit path
        unit: String,
    },

    /// List current members of an org unit
    Members {
        /// Org-unit path
        unit: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., client.batch_ceiling)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., client.batch_ceiling)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    // Initialize logging based on debug flag
    if debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("gwadm_client_core", log::LevelFilter::Debug)
            .filter_module("gwadm_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(err) = run(cli).await {
        eprint!("{}", err.format_for_user(debug));
        std::process::exit(err.exit_code() as i32);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = get_config()?;

    if let Some(domain) = cli.domain {
        config.client.domain = domain;
    }

    if !config.output.color_enabled || !terminal::supports_ansi() {
        colored::control::set_override(false);
    }

    let format = match cli.format.as_deref() {
        Some(s) => OutputFormat::from_string(s).map_err(|e| CliError::misuse(&e.to_string()))?,
        None if terminal::is_interactive() => OutputFormat::Text,
        None => OutputFormat::Json,
    };

    match cli.command {
        Commands::Org { command } => org_command(command, config, format).await,
        Commands::Config { command } => config_command(command),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "gwadm", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn org_command(command: OrgCommand, config: AppConfig, format: OutputFormat) -> CliResult<()> {
    let orchestrator = build_orchestrator(&config)?;

    match command {
        OrgCommand::Create {
            name,
            description,
            parent,
            block_inheritance,
        } => {
            orchestrator
                .create(&name, description.as_deref(), &parent, block_inheritance)
                .await?;
            println!("{} {}", "Created org unit".green().bold(), name.bold());
            Ok(())
        }
        OrgCommand::Update {
            unit,
            add,
            file,
            group,
            not_in_group,
            name,
            description,
            parent,
            block_inheritance,
        } => {
            let source = member_source(add, file, group, not_in_group);
            let changes = OrgUnitChanges {
                new_name: name,
                description,
                parent_path: parent,
                block_inheritance,
            };

            if source.is_none() && changes.is_empty() {
                return Err(CliError::misuse(
                    "Nothing to do: no members and no metadata changes given",
                ));
            }

            let report = orchestrator.update(&unit, source.as_ref(), &changes).await?;
            print!("{}", format_move_report(&report, &unit, format)?);
            Ok(())
        }
        OrgCommand::Info { unit } => {
            let info = orchestrator.info(&unit).await?;
            print!("{}", format_unit_info(&info, format)?);
            Ok(())
        }
        OrgCommand::Members { unit } => {
            let members = orchestrator.members(&unit).await?;
            for member in &members {
                println!("{member}");
            }
            Ok(())
        }
    }
}

fn member_source(
    add: Option<Vec<String>>,
    file: Option<PathBuf>,
    group: Option<String>,
    not_in_group: Option<String>,
) -> Option<MemberSource> {
    if let Some(ids) = add {
        Some(MemberSource::Literal(ids))
    } else if let Some(path) = file {
        Some(MemberSource::File(path))
    } else if let Some(name) = group {
        Some(MemberSource::Group(name))
    } else {
        not_in_group.map(MemberSource::NotInGroup)
    }
}

fn build_orchestrator(config: &AppConfig) -> CliResult<OrgOrchestrator> {
    if config.client.domain.is_empty() {
        return Err(CliError::misuse("No default domain configured")
            .with_suggestion("Run 'gwadm config set client.domain example.com'")
            .with_suggestion("Or pass --domain on the command line"));
    }

    let token = config.token.clone().ok_or_else(|| {
        CliError::misuse("No API token configured")
            .with_suggestion("Set the GWADM_TOKEN environment variable")
            .with_suggestion("Or run 'gwadm config set token <value>'")
    })?;

    let rest = Arc::new(RestProvisioningClient::new(&config.client, &token)?);
    Ok(OrgOrchestrator::new(
        rest.clone(),
        rest,
        config.client.clone(),
    ))
}

fn config_command(command: ConfigCommand) -> CliResult<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            let value = manager
                .get(&key)
                .map_err(|e| CliError::misuse(&e.to_string()))?;
            // Never echo the token back in cleartext
            if key == "token" {
                println!("********");
            } else {
                println!("{value}");
            }
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            manager
                .set(&key, &value)
                .map_err(|e| CliError::misuse(&e.to_string()))?;
            let shown = if key == "token" { "********" } else { &value };
            println!("{} {} = {}", "Set".green(), key.bold(), shown);
            Ok(())
        }
        ConfigCommand::List => {
            let items = manager.list().map_err(CliError::from)?;
            for (key, value) in items {
                // Never echo the token back in cleartext
                if key == "token" {
                    println!("{} = {}", key.bold(), "********");
                } else {
                    println!("{} = {}", key.bold(), value);
                }
            }
            Ok(())
        }
    }
}
