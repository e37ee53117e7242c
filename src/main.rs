use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use farmsync::common::write_string_to_file;
use farmsync::config::ServerConfig;
use farmsync::database::{establish_connection, get_database_url, setup_database};
use farmsync::server;
use farmsync::services::{AuthService, ExportService, ImportService, RegisterInput};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Replace the dataset with a snapshot file
    Import {
        file: String,
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Write the dataset as a snapshot (stdout when no output is given)
    Export {
        #[clap(short, long)]
        output: Option<String>,
        #[clap(short, long)]
        database: Option<String>,
    },
    User {
        #[clap(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create an account and print its token
    Create {
        #[clap(short, long)]
        username: String,
        #[clap(short, long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(short, long, default_value = "")]
        name: String,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let config = ServerConfig::from_env();

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            let config = config
                .with_port(port)
                .with_database(database)
                .with_cors_origin(cors_origin);
            info!("Starting server on {}", config.listen_address());
            server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                let database = database.unwrap_or(config.database);
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(config.database);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::Import { file, database } => {
            let db = open_database(&database.unwrap_or(config.database)).await?;
            let bytes = std::fs::read(&file).with_context(|| format!("Failed to read {}", file))?;
            let summary = ImportService::new(db).import_bytes(&bytes).await?;
            info!("Imported {} rows from {}", summary.total(), file);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Export { output, database } => {
            let db = open_database(&database.unwrap_or(config.database)).await?;
            let json = ExportService::new(db).export_json().await?;
            match output {
                Some(path) => {
                    write_string_to_file(&path, &json)
                        .with_context(|| format!("Failed to write {}", path))?;
                    info!("Snapshot written to {}", path);
                }
                None => println!("{}", json),
            }
        }
        Commands::User { command } => match command {
            UserCommands::Create {
                username,
                email,
                password,
                name,
                database,
            } => {
                let db = open_database(&database.unwrap_or(config.database)).await?;
                let issued = AuthService::new(db)
                    .register(RegisterInput {
                        username,
                        email,
                        password,
                        name,
                    })
                    .await?;
                info!("Created user {}", issued.user.username);
                println!("{}", issued.key);
            }
        },
    }

    Ok(())
}

async fn open_database(database: &str) -> Result<DatabaseConnection> {
    let db = establish_connection(&get_database_url(Some(database))).await?;
    setup_database(&db).await?;
    Ok(db)
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `export` can stream the snapshot on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
