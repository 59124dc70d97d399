//! DeckMill command line: search cards and manage collections and decks.

use clap::{Parser, Subcommand};
use deckmill::{mana, CardDefinition, Container, Deckmill};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Card collection manager backed by a Scryfall card cache
#[derive(Parser, Debug)]
#[command(name = "deckmill")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the DuckDB database file
    #[arg(short, long, default_value_os_t = deckmill::config::default_database_path())]
    database: PathBuf,

    /// Scryfall request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a card by name
    Search {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Manage collections
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Manage decks
    Deck {
        #[command(subcommand)]
        action: DeckAction,
    },
    /// Add copies of a card (by name) to a collection or deck
    Add {
        container: i64,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove copies of a card (by Scryfall id) from a collection or deck
    Remove {
        container: i64,
        external_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show the contents of a collection or deck
    Show { container: i64 },
    /// List an owner's collections and decks
    List {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Subcommand, Debug)]
enum CollectionAction {
    New {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DeckAction {
    New {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when the command ran but did not succeed (e.g. unknown card).
fn run(args: Args) -> deckmill::Result<bool> {
    let dm = Deckmill::builder()
        .database(&args.database)
        .timeout(Duration::from_secs(args.timeout))
        .build()?;
    log::debug!("{}", dm);

    match args.command {
        Command::Search { name } => match dm.resolve(&name.join(" "))? {
            Some(card) => {
                print_card(&card);
                Ok(true)
            }
            None => {
                println!("No card found for '{}'", name.join(" "));
                Ok(false)
            }
        },
        Command::Collection {
            action: CollectionAction::New { owner, name, description },
        } => {
            let c = dm
                .containers()
                .create_collection(&owner, &name, description.as_deref())?;
            print_container(&c);
            Ok(true)
        }
        Command::Deck {
            action: DeckAction::New { owner, name, description, format },
        } => {
            let c = dm.containers().create_deck(
                &owner,
                &name,
                description.as_deref(),
                format.as_deref(),
            )?;
            print_container(&c);
            Ok(true)
        }
        Command::Add { container, name, quantity } => {
            let containers = dm.containers();
            let mut c = containers.require(container)?;
            let name = name.join(" ");
            match containers.add(&mut c, &name, quantity)? {
                Some(card) => {
                    println!(
                        "{} x {} [{}] in {} '{}'",
                        c.quantity(&card.external_id),
                        card.name,
                        card.external_id,
                        c.kind,
                        c.name
                    );
                    Ok(true)
                }
                None => {
                    println!("No card found for '{}'; nothing added", name);
                    Ok(false)
                }
            }
        }
        Command::Remove { container, external_id, quantity } => {
            let containers = dm.containers();
            let mut c = containers.require(container)?;
            if containers.remove(&mut c, &external_id, quantity)? {
                println!("{} left of {}", c.quantity(&external_id), external_id);
                Ok(true)
            } else {
                println!("{} '{}' holds no {}", c.kind, c.name, external_id);
                Ok(false)
            }
        }
        Command::Show { container } => {
            let containers = dm.containers();
            let c = containers.require(container)?;
            print_container(&c);
            for entry in containers.contents(&c)? {
                println!(
                    "  {:>3} x {:<40} {:<16} {}",
                    entry.quantity,
                    entry.card.name,
                    entry.card.mana_cost.as_deref().unwrap_or(""),
                    entry
                        .card
                        .price
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_default()
                );
            }
            Ok(true)
        }
        Command::List { owner } => {
            for c in dm.containers().list_for_owner(&owner)? {
                print_container(&c);
            }
            Ok(true)
        }
    }
}

fn print_card(card: &CardDefinition) {
    let faced = if card.is_multi_faced() { " (multi-faced)" } else { "" };
    println!("{} [{}]{}", card.name, card.external_id, faced);
    if let Some(cost) = &card.mana_cost {
        println!("  Mana:  {} (value {})", cost, mana::mana_value(cost));
        let icons: Vec<String> = card
            .mana_symbols()
            .iter()
            .map(|s| mana::symbol_icon_url(s))
            .collect();
        if !icons.is_empty() {
            println!("  Icons: {}", icons.join(" "));
        }
    }
    if let Some(type_line) = &card.type_line {
        println!("  Type:  {}", type_line);
    }
    if let Some(price) = card.price {
        println!("  Price: {:.2}", price);
    }
    if let Some(url) = &card.image_front {
        println!("  Image: {}", url);
    }
    if let Some(url) = &card.image_back {
        println!("  Back:  {}", url);
    }
    println!("  Updated: {}", card.last_updated.to_rfc3339());
}

fn print_container(c: &Container) {
    let format = c
        .format
        .as_deref()
        .map(|f| format!(" ({})", f))
        .unwrap_or_default();
    println!(
        "#{} {} '{}'{} owned by {}: {} cards",
        c.id,
        c.kind,
        c.name,
        format,
        c.owner,
        c.total_cards()
    );
}
