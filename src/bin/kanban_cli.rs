//! Administrative command line for boards and cards.
//!
//! Works directly against the database through the service layer, so it
//! can be used with or without the HTTP server running.

use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanban_board::api::dto::{
    AddColumnRequest, CreateBoardRequest, CreateCardRequest, RenameBoardRequest,
    UpdateCardRequest,
};
use kanban_board::config::Config;
use kanban_board::infrastructure::db;
use kanban_board::services::{BoardService, CardService};

#[derive(Parser)]
#[command(name = "kanban-cli")]
#[command(version)]
#[command(about = "Manage Kanban boards from the command line", long_about = None)]
struct Cli {
    /// Database URL (defaults to DATABASE_URL or sqlite:board.db)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all boards
    Boards,
    /// Create a board with initial, pending, final and cancel columns
    CreateBoard {
        name: String,
        /// Initial column name
        #[arg(long)]
        initial: Option<String>,
        /// Pending column name (repeatable, in order)
        #[arg(long = "pending", value_name = "NAME")]
        pending: Vec<String>,
        /// Create the board without pending columns
        #[arg(long, conflicts_with = "pending")]
        no_pending: bool,
        /// Final column name
        #[arg(long = "final")]
        final_column: Option<String>,
        /// Cancel column name
        #[arg(long)]
        cancel: Option<String>,
    },
    /// Show a board with its columns
    ShowBoard { id: String },
    /// Rename a board
    RenameBoard { id: String, name: String },
    /// Delete a board and everything on it
    DeleteBoard { id: String },
    /// Add a pending column before the final column
    AddColumn { board_id: String, name: String },
    /// Show a column with its cards
    ShowColumn { id: String },
    /// Create a card in the board's initial column
    CreateCard {
        board_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Show a card
    ShowCard { id: String },
    /// Update a card's title and/or description
    UpdateCard {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Move a card to the next column
    MoveCard { id: String },
    /// Move a card to the cancel column
    CancelCard { id: String },
    /// Block a card
    BlockCard {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Unblock a card
    UnblockCard {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Show a card's block history
    Blocks { id: String },
    /// Delete a card
    DeleteCard { id: String },
    /// Print the database tables and journal mode
    VerifyDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let database_url = cli.database_url.unwrap_or(config.database_url);
    let pool = db::init_db(&database_url, 1).await?;

    run(&pool, cli.command, config.max_cards_per_column).await?;

    pool.close().await;
    Ok(())
}

async fn run(pool: &SqlitePool, command: Commands, max_cards: usize) -> anyhow::Result<()> {
    match command {
        Commands::Boards => print_json(&BoardService::list_boards(pool).await?),
        Commands::CreateBoard {
            name,
            initial,
            pending,
            no_pending,
            final_column,
            cancel,
        } => {
            let req = CreateBoardRequest {
                name,
                initial_column: initial,
                pending_columns: pending_columns(pending, no_pending),
                final_column,
                cancel_column: cancel,
            };
            print_json(&BoardService::create_board(pool, req).await?)
        }
        Commands::ShowBoard { id } => print_json(&BoardService::get_board(pool, &id).await?),
        Commands::RenameBoard { id, name } => print_json(
            &BoardService::rename_board(pool, &id, RenameBoardRequest { name }).await?,
        ),
        Commands::DeleteBoard { id } => {
            BoardService::delete_board(pool, &id).await?;
            println!("Board {} deleted", id);
            Ok(())
        }
        Commands::AddColumn { board_id, name } => print_json(
            &BoardService::add_column(pool, &board_id, AddColumnRequest { name }).await?,
        ),
        Commands::ShowColumn { id } => print_json(&BoardService::get_column(pool, &id).await?),
        Commands::CreateCard {
            board_id,
            title,
            description,
        } => {
            let req = CreateCardRequest { title, description };
            print_json(&CardService::create_card(pool, &board_id, req, max_cards).await?)
        }
        Commands::ShowCard { id } => print_json(&CardService::get_card(pool, &id).await?),
        Commands::UpdateCard {
            id,
            title,
            description,
        } => {
            let req = UpdateCardRequest { title, description };
            print_json(&CardService::update_card(pool, &id, req).await?)
        }
        Commands::MoveCard { id } => {
            print_json(&CardService::move_card(pool, &id, max_cards).await?.card)
        }
        Commands::CancelCard { id } => {
            print_json(&CardService::cancel_card(pool, &id).await?.card)
        }
        Commands::BlockCard { id, reason } => {
            print_json(&CardService::block_card(pool, &id, &reason).await?)
        }
        Commands::UnblockCard { id, reason } => {
            print_json(&CardService::unblock_card(pool, &id, &reason).await?)
        }
        Commands::Blocks { id } => print_json(&CardService::list_blocks(pool, &id).await?),
        Commands::DeleteCard { id } => {
            CardService::delete_card(pool, &id).await?;
            println!("Card {} deleted", id);
            Ok(())
        }
        Commands::VerifyDb => {
            let tables = db::list_tables(pool).await?;
            println!("Tables: {}", tables.join(", "));
            println!("Journal mode: {}", db::journal_mode(pool).await?);
            Ok(())
        }
    }
}

/// No `--pending` flags keeps the default pending column; `--no-pending`
/// creates none.
fn pending_columns(pending: Vec<String>, no_pending: bool) -> Option<Vec<String>> {
    if no_pending {
        Some(Vec::new())
    } else if pending.is_empty() {
        None
    } else {
        Some(pending)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
