use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mathml_parser::config::Config;
use mathml_parser::db::{Database, SeedOutcome};
use mathml_parser::api;

#[derive(Parser)]
#[command(name = "mathml-parser")]
#[command(about = "Store for engineering projects, MathML equations and calculation templates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve(ServeArgs),
    /// Apply pending schema migrations and exit
    Migrate(DatabaseArgs),
    /// Insert demonstration data into an empty store and exit
    Seed(DatabaseArgs),
}

#[derive(Args, Default)]
struct DatabaseArgs {
    /// SQLite database file [env: MATHML_PARSER_DATABASE]
    #[arg(long)]
    database: Option<PathBuf>,
}

#[derive(Args, Default)]
struct ServeArgs {
    #[command(flatten)]
    db: DatabaseArgs,

    /// Address to bind [env: MATHML_PARSER_HOST, default: 127.0.0.1]
    #[arg(long)]
    host: Option<std::net::IpAddr>,

    /// Port for the HTTP API [env: MATHML_PARSER_PORT, default: 5000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Skip seeding demonstration data on startup
    #[arg(long)]
    no_seed: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "mathml_parser=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_store(config: &Config) -> anyhow::Result<Database> {
    let path = config.database_path()?;
    tracing::info!("Opening database at {}", path.display());

    let db = Database::open(path)?;
    db.migrate()?;
    Ok(db)
}

fn apply_database_args(config: &mut Config, args: DatabaseArgs) {
    if let Some(path) = args.database {
        config.database = Some(path);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;

    match cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            apply_database_args(&mut config, args.db);
            if let Some(host) = args.host {
                config.host = host;
            }
            if let Some(port) = args.port {
                config.port = port;
            }
            if args.no_seed {
                config.seed = false;
            }

            let db = open_store(&config)?;
            if config.seed {
                db.seed()?;
            }
            if config.security.api_key.is_some() {
                tracing::info!("API key authentication enabled");
            }

            let app = api::create_router_with_config(db, config.security.clone());

            let addr = std::net::SocketAddr::new(config.host, config.port);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("MathML parser API listening on http://{}", addr);

            axum::serve(listener, app).await?;
        }
        Commands::Migrate(args) => {
            apply_database_args(&mut config, args);
            open_store(&config)?;
            println!("Database is up to date");
        }
        Commands::Seed(args) => {
            apply_database_args(&mut config, args);
            let db = open_store(&config)?;
            match db.seed()? {
                SeedOutcome::AlreadySeeded => println!("Database already contains data, nothing seeded"),
                SeedOutcome::Seeded {
                    library_equations,
                    project_templates,
                    task_templates,
                    variables,
                } => println!(
                    "Seeded {library_equations} library equations, {project_templates} project templates, \
                     {task_templates} task templates and {variables} variables"
                ),
            }
        }
    }

    Ok(())
}
