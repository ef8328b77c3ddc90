use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use codeoj_user::cli::create_admin;
use codeoj_user::logging::init_tracing;
use codeoj_user::modules::users::store::{MemoryUserStore, PgUserStore, UserStore};
use codeoj_user::router::init_router;
use codeoj_user::state::{build_app_state, init_app_state};

#[derive(Parser)]
#[command(name = "codeoj-user")]
#[command(about = "CodeOJ user service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Keep users in memory instead of Postgres
        #[arg(long)]
        in_memory: bool,
    },
    /// Create a user with admin rights
    CreateAdmin {
        username: String,
        password: String,
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { in_memory: false }) {
        Commands::Serve { in_memory } => serve(in_memory).await,
        Commands::CreateAdmin {
            username,
            password,
            email,
        } => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let users = PgUserStore::new(codeoj_db::init_db_pool(&database_url).await?);

            let admin = create_admin(&users, &username, &password, &email).await?;
            println!("Admin created: {} (id {})", admin.username, admin.id);
            Ok(())
        }
    }
}

async fn serve(in_memory: bool) -> anyhow::Result<()> {
    let _log_guard = init_tracing()?;

    let state = if in_memory {
        info!("Using in-memory user store");
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        build_app_state(users)?
    } else {
        init_app_state().await?
    };
    let app = init_router(state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Server running");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
