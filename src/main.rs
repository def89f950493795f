use std::collections::HashMap;
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use arango_client::arangodb::client_admin::{LogLevelsGetOptions, LogLevelsSetOptions};
use arango_client::{Client, ClientConfig, Database, ServerMode};

/// arangoctl - inspect and administer an ArangoDB deployment over HTTP
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file; ARANGO_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server endpoint, e.g. http://127.0.0.1:8529
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Database to operate on
    #[arg(short, long)]
    database: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Server administration
    Server(ServerCommand),
    /// Database commands
    Database(DatabaseCommand),
    /// View commands
    View(ViewCommand),
    /// Analyzer commands
    Analyzer(AnalyzerCommand),
    /// Collection commands
    Collection(CollectionCommand),
}

#[derive(Args)]
struct ServerCommand {
    #[command(subcommand)]
    action: ServerAction,
}

#[derive(Subcommand)]
enum ServerAction {
    /// Show server version
    Version,
    /// Show cluster health
    Health,
    /// Show or change the server mode
    Mode {
        /// New mode; omit to show the current one
        #[arg(long, value_enum)]
        set: Option<ModeArg>,
    },
    /// Show license information
    License,
    /// Show or change log levels
    LogLevels {
        /// Target a specific cluster server
        #[arg(long)]
        server_id: Option<String>,
        /// Topic assignments like general=DEBUG
        #[arg(long = "set", value_parser = parse_level)]
        set: Vec<(String, String)>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Default,
    Readonly,
}

impl From<ModeArg> for ServerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Default => ServerMode::Default,
            ModeArg::Readonly => ServerMode::Readonly,
        }
    }
}

#[derive(Args)]
struct DatabaseCommand {
    #[command(subcommand)]
    action: DatabaseAction,
}

#[derive(Subcommand)]
enum DatabaseAction {
    /// List databases
    List {
        /// Only databases the current user can access
        #[arg(long)]
        accessible: bool,
    },
    /// Show information about the selected database
    Info,
}

#[derive(Args)]
struct ViewCommand {
    #[command(subcommand)]
    action: ViewAction,
}

#[derive(Subcommand)]
enum ViewAction {
    /// List views
    List,
    /// Show view properties
    Properties {
        /// View name
        name: String,
    },
}

#[derive(Args)]
struct AnalyzerCommand {
    #[command(subcommand)]
    action: AnalyzerAction,
}

#[derive(Subcommand)]
enum AnalyzerAction {
    /// List analyzers
    List,
    /// Show an analyzer definition
    Get {
        /// Analyzer name
        name: String,
    },
}

#[derive(Args)]
struct CollectionCommand {
    #[command(subcommand)]
    action: CollectionAction,
}

#[derive(Subcommand)]
enum CollectionAction {
    /// List collections
    List,
}

fn parse_level(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((topic, level)) if !topic.is_empty() && !level.is_empty() => {
            Ok((topic.to_string(), level.to_uppercase()))
        }
        _ => Err(format!("expected TOPIC=LEVEL, got '{}'", value)),
    }
}

struct ClientContext {
    client: Client,
    database: String,
    verbose: bool,
}

impl ClientContext {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
        if let Some(endpoint) = &cli.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(database) = &cli.database {
            config.database = database.clone();
        }

        let client = Client::from_config(&config).context("failed to create client")?;
        Ok(ClientContext {
            client,
            database: config.database,
            verbose: cli.verbose,
        })
    }

    fn log(&self, message: &str) {
        if self.verbose {
            eprintln!("[INFO] {}", message);
        }
    }

    async fn database(&self) -> Result<Database> {
        self.log(&format!("Opening database '{}'", self.database));
        let database = self
            .client
            .database(&self.database)
            .await
            .with_context(|| format!("cannot open database '{}'", self.database))?;
        Ok(database)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let ctx = ClientContext::new(&cli)?;

    match cli.command {
        Commands::Server(cmd) => handle_server_command(ctx, cmd).await,
        Commands::Database(cmd) => handle_database_command(ctx, cmd).await,
        Commands::View(cmd) => handle_view_command(ctx, cmd).await,
        Commands::Analyzer(cmd) => handle_analyzer_command(ctx, cmd).await,
        Commands::Collection(cmd) => handle_collection_command(ctx, cmd).await,
    }
}

async fn handle_server_command(ctx: ClientContext, cmd: ServerCommand) -> Result<()> {
    match cmd.action {
        ServerAction::Version => print_json(&ctx.client.version().await?),
        ServerAction::Health => print_json(&ctx.client.health().await?),
        ServerAction::Mode { set: Some(mode) } => {
            let mode = ServerMode::from(mode);
            ctx.client.set_server_mode(mode).await?;
            println!("Server mode set to {}", mode);
            Ok(())
        }
        ServerAction::Mode { set: None } => {
            println!("{}", ctx.client.server_mode().await?);
            Ok(())
        }
        ServerAction::License => print_json(&ctx.client.get_license().await?),
        ServerAction::LogLevels { server_id, set } => {
            if set.is_empty() {
                let options = LogLevelsGetOptions { server_id };
                return print_json(&ctx.client.get_log_levels(Some(&options)).await?);
            }
            let levels: HashMap<String, String> = set.into_iter().collect();
            let options = LogLevelsSetOptions { server_id };
            ctx.client.set_log_levels(&levels, Some(&options)).await?;
            ctx.log(&format!("Updated {} log topic(s)", levels.len()));
            Ok(())
        }
    }
}

async fn handle_database_command(ctx: ClientContext, cmd: DatabaseCommand) -> Result<()> {
    match cmd.action {
        DatabaseAction::List { accessible } => {
            let databases = if accessible {
                ctx.client.accessible_databases().await?
            } else {
                ctx.client.databases().await?
            };
            for database in databases {
                println!("{}", database.name());
            }
            Ok(())
        }
        DatabaseAction::Info => print_json(&ctx.database().await?.info().await?),
    }
}

async fn handle_view_command(ctx: ClientContext, cmd: ViewCommand) -> Result<()> {
    let database = ctx.database().await?;
    match cmd.action {
        ViewAction::List => {
            let mut views = database.views().await?;
            loop {
                match views.read() {
                    Ok(view) => println!("{}\t{}", view.name(), view.view_type()),
                    Err(e) if e.is_no_more_documents() => break,
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(())
        }
        ViewAction::Properties { name } => {
            let view = database.view(&name).await?;
            match view.view_type() {
                arango_client::ViewType::SearchAlias => print_json(&view.arangosearch_alias()?.properties().await?),
                _ => print_json(&view.arangosearch()?.properties().await?),
            }
        }
    }
}

async fn handle_analyzer_command(ctx: ClientContext, cmd: AnalyzerCommand) -> Result<()> {
    let database = ctx.database().await?;
    match cmd.action {
        AnalyzerAction::List => {
            for analyzer in database.analyzers().await? {
                println!("{}\t{}", analyzer.name(), analyzer.definition().properties.type_name());
            }
            Ok(())
        }
        AnalyzerAction::Get { name } => {
            let analyzer = database.analyzer(&name).await?;
            let definition = analyzer.definition();
            if definition.properties.is_unknown() {
                ctx.log(&format!("'{}' has a type this client does not model", definition.name));
                println!("{} ({})", definition.name, definition.properties.type_name());
                return Ok(());
            }
            print_json(definition)
        }
    }
}

async fn handle_collection_command(ctx: ClientContext, cmd: CollectionCommand) -> Result<()> {
    let database = ctx.database().await?;
    match cmd.action {
        CollectionAction::List => {
            for collection in database.collections().await? {
                println!("{}", collection.name());
            }
            Ok(())
        }
    }
}
