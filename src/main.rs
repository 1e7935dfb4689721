use anyhow::Result;
use clap::{Parser, Subcommand};

use buyer_leads::auth::{AuthContext, JwtService};
use buyer_leads::cli::{handle_buyer_command, handle_user_command, resolve_token};
use buyer_leads::config::{LeadsPaths, Settings};
use buyer_leads::error::LeadsError;
use buyer_leads::storage::Storage;
use buyer_leads::telemetry;

#[derive(Parser)]
#[command(
    name = "leads",
    version,
    about = "Track real-estate buyer leads with an audited change history",
    long_about = "leads keeps buyer leads in local JSON files. Every create and \
                  edit is validated, checked against the lead's owner and \
                  recorded as a field-level diff in the buyer's history."
)]
struct Cli {
    /// Session token (defaults to the one saved by 'leads user login')
    #[arg(long, global = true, env = "LEADS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level filter (overrides the configured level; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and signing secret
    Init,

    /// Show current configuration and paths
    Config,

    /// User account commands
    #[command(subcommand)]
    User(buyer_leads::cli::UserCommands),

    /// Buyer lead commands
    #[command(subcommand)]
    Buyer(buyer_leads::cli::BuyerCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LeadsPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    telemetry::init(level, settings.log_json);

    if let Err(err) = run(cli, paths, settings) {
        report(&err);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli, paths: LeadsPaths, mut settings: Settings) -> Result<(), LeadsError> {
    let Some(command) = cli.command else {
        println!("leads - buyer lead tracking");
        println!();
        println!("Run 'leads init' to set up, then 'leads user signup'.");
        println!("Run 'leads --help' for usage information.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing buyer-leads at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            let generated = settings.ensure_secret();
            settings.save(&paths)?;
            println!("Initialization complete!");
            if generated {
                println!("A token signing secret was generated.");
            }
            println!();
            println!("Run 'leads user signup <username> --email <email> --name <name>' next.");
        }
        Commands::Config => {
            println!("buyer-leads Configuration");
            println!("=========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("History log:     {}", paths.history_file().display());
            println!();
            println!("Settings:");
            println!("  Initialized:      {}", paths.is_initialized());
            println!("  Page size:        {}", settings.page_size);
            println!("  Token lifetime:   {}h", settings.token_ttl_hours);
            println!("  Log level:        {}", settings.log_level);
            println!("  JSON logs:        {}", settings.log_json);
        }
        Commands::User(cmd) => {
            let storage = open_storage(paths)?;
            let jwt = JwtService::from_settings(&settings)?;
            let credential = resolve_token(storage.paths(), cli.token.as_deref());
            handle_user_command(&storage, &jwt, credential.as_deref(), cmd)?;
        }
        Commands::Buyer(cmd) => {
            let storage = open_storage(paths)?;
            let auth = AuthContext::new(JwtService::from_settings(&settings)?);
            let credential = resolve_token(storage.paths(), cli.token.as_deref());
            handle_buyer_command(&storage, &auth, settings.page_size, credential.as_deref(), cmd)?;
        }
    }

    Ok(())
}

fn open_storage(paths: LeadsPaths) -> Result<Storage, LeadsError> {
    let storage = Storage::new(paths)?;
    storage.load_all()?;
    Ok(storage)
}

/// Print an error with its status, plus per-field detail for rejected input
fn report(err: &LeadsError) {
    eprintln!("Error ({}): {}", err.status_code(), err.public_message());
    if let Some(fields) = err.field_errors() {
        for (field, messages) in fields.iter() {
            for message in messages {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
}
