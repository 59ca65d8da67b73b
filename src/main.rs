use agora::init_client_state;
use agora_observability::init_tracing;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod cli;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Agora client - sign in to the school-management API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an email or public ID, then the emailed code
    Login {
        /// Email address or public ID (e.g. AG-SCHL-A3B5C7)
        #[arg(short = 'i', long)]
        identifier: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Print login metrics in Prometheus format when done
        #[arg(long)]
        metrics: bool,
    },
    /// Show the school remembered from the last login
    Status,
    /// Forget the remembered school
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let state = init_client_state()?;

    match cli.command {
        Commands::Login {
            identifier,
            password,
            metrics,
        } => cli::login::handle_login(&state, identifier, password, metrics).await,
        Commands::Status => cli::session::handle_status(&state),
        Commands::Logout => cli::session::handle_logout(&state),
    }
}
