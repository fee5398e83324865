//! Storefront CLI Application
//!
//! Command-line front end for the cart-ledger library. It plays the part the
//! page scripts played on the sites:
//! - Cart buttons (add, clear, total, summary)
//! - The order box and its chat link
//! - The contact form
//! - The animated stats strip

use anyhow::{Context, Result};
use cart_ledger::order::OrderMessage;
use cart_ledger::{
    dispatch_order, notification_for, submit_contact, CartSession, CartStore, Clock, ContactForm,
    CounterBoard, DispatchOutcome, FileStore, SubmitOutcome,
};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod messenger;

use config::AppConfig;
use messenger::{ChatLinkMessenger, OutboxMessenger};

/// Storefront - cart, order and contact tools for small static sites
#[derive(Parser, Debug)]
#[command(name = "cart-cli")]
#[command(about = "Manage a persisted shopping cart and site forms", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (storefront.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the persisted cart (overrides the config file)
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an item to the cart
    Add {
        /// Item name
        name: String,
        /// Item price, e.g. 5.50
        price: Decimal,
    },
    /// Remove every item from the cart
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the cart total
    Total,
    /// Print the cart summary
    Summary,
    /// Compose the order message and print its chat link
    Order {
        /// Print the order text without handing it off
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate and send a contact message
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    /// Animate counters up to their targets, e.g. `stats Projects=150 Clients=40`
    Stats {
        /// LABEL=TARGET pairs
        #[arg(value_parser = parse_stat, required = true)]
        counters: Vec<(String, u64)>,
        /// Milliseconds between ticks (overrides the config file)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

/// Explicit application context handed to every command handler
struct App {
    config: AppConfig,
    session: CartSession<FileStore>,
}

impl App {
    fn open(config: AppConfig) -> Self {
        log::debug!("Using store directory {:?}", config.storage.dir);
        let store = FileStore::new(&config.storage.dir);
        let session = CartSession::open(store, config.store.clone());
        Self { config, session }
    }

    /// Warn the user when the last write did not reach the store
    fn report_unsaved(&self) {
        if self.session.needs_save() {
            eprintln!(
                "⚠️  Cart could not be saved to {:?}; changes will be lost when this command exits",
                self.config.storage.dir
            );
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Storefront CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using cart-ledger library v{}", cart_ledger::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    if let Some(dir) = &args.store_dir {
        config.storage.dir = dir.clone();
    }

    let mut app = App::open(config);

    match args.command {
        Command::Add { name, price } => add_item(&mut app, name, price),
        Command::Clear { yes } => clear_cart(&mut app, yes),
        Command::Total => {
            println!("{}", app.session.total_text());
            Ok(())
        }
        Command::Summary => {
            println!("{}", summary_report(&app.session));
            Ok(())
        }
        Command::Order { dry_run } => send_order(&app, dry_run),
        Command::Contact {
            name,
            email,
            message,
        } => send_contact(&app, name, email, message),
        Command::Stats { counters, tick_ms } => run_stats(&app, counters, tick_ms),
    }
}

fn add_item(app: &mut App, name: String, price: Decimal) -> Result<()> {
    let item = app
        .session
        .add_item(name, price)
        .context("Could not add item to cart")?;

    println!("{}", notification_for(&item));
    println!(
        "Cart: {} items, total {}",
        app.session.item_count(),
        app.session.total_text()
    );
    app.report_unsaved();
    Ok(())
}

fn clear_cart(app: &mut App, yes: bool) -> Result<()> {
    if !yes && !confirm("Clear all items from cart?")? {
        println!("Cart left unchanged");
        return Ok(());
    }

    app.session.clear();
    println!("{}", app.session.summary_text());
    app.report_unsaved();
    Ok(())
}

/// Cart summary with an item-count header; an empty cart shows only its message
fn summary_report<S: CartStore, C: Clock>(session: &CartSession<S, C>) -> String {
    if session.item_count() == 0 {
        return session.summary_text();
    }
    format!(
        "🛒 Your Cart ({} items)\n\n{}",
        session.item_count(),
        session.summary_text()
    )
}

fn send_order(app: &App, dry_run: bool) -> Result<()> {
    if dry_run {
        match OrderMessage::compose(app.session.ledger(), app.session.config()) {
            Some(order) => println!("{}", order.text),
            None => println!("Your cart is empty! Add some items first."),
        }
        return Ok(());
    }

    let mut messenger = ChatLinkMessenger::new(&app.config.store.chat_number);
    match dispatch_order(&app.session, &mut messenger) {
        DispatchOutcome::Sent => Ok(()),
        DispatchOutcome::EmptyCart => {
            println!("Your cart is empty! Add some items first.");
            Ok(())
        }
        DispatchOutcome::Failed(reason) => anyhow::bail!("Could not send order: {}", reason),
    }
}

fn send_contact(app: &App, name: String, email: String, message: String) -> Result<()> {
    let mut form = ContactForm::standard(name, email, message);
    let mut relay = OutboxMessenger::new(app.config.outbox_path());

    match submit_contact(&mut form, &mut relay, &app.config.contact.fallback_email) {
        SubmitOutcome::Sent(notice) => {
            println!("{}", notice);
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            for error in &errors {
                eprintln!("  ✗ {}", error.message);
            }
            anyhow::bail!("Contact form has {} invalid fields", errors.len())
        }
        SubmitOutcome::Failed { fallback } => {
            eprintln!("{}", fallback);
            Ok(())
        }
    }
}

fn run_stats(app: &App, counters: Vec<(String, u64)>, tick_ms: Option<u64>) -> Result<()> {
    let interval = Duration::from_millis(tick_ms.unwrap_or(app.config.stats.tick_ms));

    let mut board = CounterBoard::new();
    for (label, target) in counters {
        board.add(label, target, app.config.stats.steps);
    }

    board.start();
    let mut stdout = io::stdout();
    loop {
        let running = board.tick();
        let line = board
            .values()
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("   ");
        write!(stdout, "\r{}", line)?;
        stdout.flush()?;

        if !running {
            break;
        }
        std::thread::sleep(interval);
    }
    writeln!(stdout)?;

    log::debug!("Stats finished after {} ticks", board.ticks());
    Ok(())
}

/// Parse a `LABEL=TARGET` counter argument
fn parse_stat(arg: &str) -> std::result::Result<(String, u64), String> {
    let (label, target) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=TARGET, got {:?}", arg))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("missing label in {:?}", arg));
    }
    let target = target
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid target in {:?}: {}", arg, e))?;
    Ok((label.to_string(), target))
}

/// Ask a yes/no question on stdin; anything but y/yes means no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat() {
        assert_eq!(parse_stat("Projects=150"), Ok(("Projects".to_string(), 150)));
        assert_eq!(parse_stat(" Happy Clients = 40 "), Ok(("Happy Clients".to_string(), 40)));
        assert!(parse_stat("Projects").is_err());
        assert!(parse_stat("=5").is_err());
        assert!(parse_stat("Years=-1").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["cart-cli", "-vv", "add", "Burger", "5.50"]).unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Add { name, price } => {
                assert_eq!(name, "Burger");
                assert_eq!(price, "5.50".parse::<Decimal>().unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from(["cart-cli", "add", "Burger", "cheap"]).is_err());
        assert!(Args::try_parse_from(["cart-cli", "stats"]).is_err());
    }

    #[test]
    fn test_summary_report_header_only_for_items() {
        use cart_ledger::{LedgerConfig, MemoryStore, EMPTY_CART_MESSAGE};

        let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        assert_eq!(summary_report(&session), EMPTY_CART_MESSAGE);

        session.add_item("Burger", "5.50".parse().unwrap()).unwrap();
        assert_eq!(
            summary_report(&session),
            "🛒 Your Cart (1 items)\n\nBurger ($5.50)\n\nTotal: $5.50"
        );

        session.clear();
        assert_eq!(summary_report(&session), EMPTY_CART_MESSAGE);
    }

    #[test]
    fn test_app_round_trip_through_store_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.dir = tmp.path().to_path_buf();

        let mut app = App::open(config.clone());
        add_item(&mut app, "Burger".to_string(), "5.50".parse().unwrap()).unwrap();
        add_item(&mut app, "Soda".to_string(), "1.25".parse().unwrap()).unwrap();

        let reopened = App::open(config);
        assert_eq!(reopened.session.total_text(), "$6.75");
    }
}
