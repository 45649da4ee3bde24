mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use stratopipe_core::tracing_setup::init_tracing_with_service;
use stratopipe_core::{ApiClient, ApiError, SessionCredentials, Url};
use tracing::warn;

use crate::commands::{UploadArgs, UrlArgs};

const PASSWORD_ENV: &str = "STRATOPIPE_PASSWORD";

#[derive(Parser)]
#[command(name = "stratopipe")]
#[command(about = "Command-line client for the StratoPipe asset pipeline")]
struct Cli {
    /// Path to JSON config file (baseUrl, authScheme, loginPage, primeCsrf)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// API base URL, overrides the config file and STRATOPIPE_API_URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in; session cookies are saved to the session file, a token to the OS keyring
    Login {
        username: String,
        /// Falls back to STRATOPIPE_PASSWORD
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Forget the saved session and token
    Logout,

    /// Create a user account
    Register {
        username: String,
        #[arg(long, short = 'e')]
        email: Option<String>,
        /// Falls back to STRATOPIPE_PASSWORD
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Project operations
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Asset operations
    #[command(subcommand)]
    Assets(AssetCommands),

    /// List the version statuses the server accepts
    Statuses,

    /// Project image lookups
    #[command(subcommand)]
    Images(ImageCommands),
}

#[derive(Subcommand)]
enum ProjectCommands {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(long, short = 'n')]
        name: String,
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
    /// Permanently delete a project
    Delete {
        id: String,
    },
    /// Mark a project inactive without deleting it
    Deactivate {
        id: String,
    },
}

#[derive(Subcommand)]
enum AssetCommands {
    List {
        /// Only assets of this project
        #[arg(long)]
        project: Option<String>,
    },
    Show {
        id: String,
    },
    Versions {
        id: String,
        /// Print only the highest-numbered version
        #[arg(long)]
        latest: bool,
    },
    Upload {
        file: PathBuf,
        #[arg(long)]
        project: String,
        #[arg(long, short = 'n')]
        name: String,
        #[arg(long = "type")]
        asset_type: Option<String>,
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
    /// Upload a new version of an existing asset
    VersionUp {
        id: String,
        file: PathBuf,
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum ImageCommands {
    List {
        project: String,
    },
    Find {
        project: String,
        #[arg(long)]
        name: Option<String>,
        /// Semantic type: Character, Environment, Prop, Vehicle, Scene
        #[arg(long = "type")]
        image_type: Option<String>,
    },
    /// Resolve an image URL, printing the fallback when nothing matches
    Url {
        project: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        image_type: Option<String>,
        #[arg(long, default_value = "")]
        fallback: String,
        #[arg(long)]
        thumbnail: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing_with_service("stratopipe-cli");

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if is_unauthorized(&e) {
                eprintln!("Your session is missing or expired. Run `stratopipe login <username>`.");
            }
            std::process::exit(1);
        }
    }
}

fn is_unauthorized(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_unauthorized)
}

fn password_or_env(password: Option<String>) -> Result<String> {
    password
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .with_context(|| format!("Pass --password or set {}", PASSWORD_ENV))
}

fn build_client(cli: &Cli) -> Result<ApiClient> {
    let config = config::load_config(cli.config.as_deref(), cli.base_url.clone())?;
    let base_url = config.resolve_base_url()?;
    let credentials = match config::default_session_path() {
        Some(path) => SessionCredentials::persistent(base_url, path)?,
        None => SessionCredentials::new(base_url),
    };
    let credentials = Arc::new(credentials);

    let client = ApiClient::builder(config)
        .credentials(credentials)
        .on_unauthorized(|login_url: &Url| {
            warn!(login_url = %login_url, "server rejected the session");
        })
        .build()?;
    Ok(client)
}

async fn run(cli: Cli) -> Result<Value> {
    let client = build_client(&cli)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::login(&client, username, password_or_env(password)?).await
        }
        Commands::Logout => commands::logout(&client),
        Commands::Register {
            username,
            email,
            password,
        } => commands::register(&client, username, email, password_or_env(password)?).await,
        Commands::Projects(command) => match command {
            ProjectCommands::List => commands::list_projects(&client).await,
            ProjectCommands::Show { id } => commands::show_project(&client, &id).await,
            ProjectCommands::Create { name, description } => {
                commands::create_project(&client, name, description).await
            }
            ProjectCommands::Delete { id } => commands::delete_project(&client, &id).await,
            ProjectCommands::Deactivate { id } => commands::deactivate_project(&client, &id).await,
        },
        Commands::Assets(command) => match command {
            AssetCommands::List { project } => {
                commands::list_assets(&client, project.as_deref()).await
            }
            AssetCommands::Show { id } => commands::show_asset(&client, &id).await,
            AssetCommands::Versions { id, latest } => {
                commands::asset_versions(&client, &id, latest).await
            }
            AssetCommands::Upload {
                file,
                project,
                name,
                asset_type,
                description,
            } => {
                let args = UploadArgs {
                    project,
                    name,
                    asset_type,
                    description,
                    file: &file,
                };
                commands::upload_asset(&client, args).await
            }
            AssetCommands::VersionUp {
                id,
                file,
                description,
            } => commands::version_up(&client, &id, &file, description).await,
        },
        Commands::Statuses => commands::version_statuses(&client).await,
        Commands::Images(command) => match command {
            ImageCommands::List { project } => commands::list_images(&client, &project).await,
            ImageCommands::Find {
                project,
                name,
                image_type,
            } => {
                commands::find_image(&client, &project, name.as_deref(), image_type.as_deref())
                    .await
            }
            ImageCommands::Url {
                project,
                name,
                image_type,
                fallback,
                thumbnail,
            } => {
                let args = UrlArgs {
                    project: &project,
                    name: name.as_deref(),
                    image_type: image_type.as_deref(),
                    fallback: &fallback,
                    thumbnail,
                };
                commands::image_url(&client, args).await
            }
        },
    }
}
