//! `anonex` command-line client.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args ──▶ config (TOML + env) ──▶ AnonexClient
//!                                           │
//!        ┌──────────────────┬───────────────┼─────────────────┐
//!        ▼                  ▼               ▼                 ▼
//!   WalletSession    ContentPipeline  Orchestrator     ProgramQueries
//!   (bridge/demo)    (IPFS/memory)    (lifecycle)      (ledger REST)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use anonex_client::config::{load_config, AppConfig};
use anonex_client::content::{
    crypto, ContentStore, EncryptionMaterial, IpfsClient, MemoryStore, PreparedContent, Visibility,
};
use anonex_client::observability::logging::init_logging;
use anonex_client::transaction::{ExecutionReport, FieldElement, Reaction};
use anonex_client::wallet::{generate_pseudonym, WalletSession};
use anonex_client::AnonexClient;

#[derive(Parser)]
#[command(name = "anonex")]
#[command(about = "Pseudonymous publishing on Aleo", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preferred wallet backend
    #[arg(short, long)]
    wallet: Option<String>,

    /// Fail instead of falling back to a simulated wallet
    #[arg(long)]
    no_fallback: bool,

    /// Keep content in memory instead of uploading to IPFS
    #[arg(long)]
    memory_store: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered wallet backends
    Wallets,
    /// Show the pseudonym for an address
    Alias { address: String },
    /// Publish a post
    Publish {
        text: String,
        #[arg(long, default_value = "public")]
        visibility: Visibility,
        /// Derive the encryption key from a passphrase
        #[arg(long, requires = "salt")]
        passphrase: Option<String>,
        #[arg(long)]
        salt: Option<String>,
    },
    /// React to a post (like, love, fire, think)
    React { post_id: FieldElement, reaction: Reaction },
    /// Follow an address
    Follow { address: String },
    /// Create a group
    CreateGroup { name: String },
    /// Create an anonymous identity
    CreateIdentity {
        display_name: String,
        #[arg(long, default_value = "")]
        avatar: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// List wallet records for a program
    Records { program: String },
    /// Query a transaction's status through the wallet
    Status { transaction_id: String },
    /// Read public ledger state
    Query {
        #[command(subcommand)]
        query: Query,
    },
    /// Fetch and open stored content
    Fetch {
        address: String,
        /// Base64 key for encrypted content
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Subcommand)]
enum Query {
    Height,
    Program { id: String },
    Transaction { id: String },
    Post { id: String },
    PostCount,
    Reactions { post_id: String },
    Likes { post_id: String },
    Followers { user_hash: String },
    Following { user_hash: String },
    Group { id: String },
    Members { group_id: String },
    Profile { pseudonym_hash: String },
    Verified { pseudonym_hash: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = AppConfig::default();
            anonex_client::config::loader::apply_env_overrides(&mut config);
            config
        }
    };
    if cli.no_fallback {
        config.wallet.allow_simulated_fallback = false;
    }

    init_logging(&config.observability);
    tracing::debug!(
        network = %config.wallet.network,
        rpc_url = %config.network.rpc_url,
        "Configuration loaded"
    );

    let session = Arc::new(WalletSession::from_config(config.wallet.clone(), &config.programs)?);
    let store: Arc<dyn ContentStore> = if cli.memory_store {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(IpfsClient::new(&config.storage)?)
    };
    let client = AnonexClient::with_parts(config, session, store)?;

    match cli.command {
        Commands::Wallets => {
            print_json(&serde_json::to_value(client.session().available_wallets())?)?;
        }
        Commands::Alias { address } => {
            println!("{}", generate_pseudonym(&address));
        }
        Commands::Publish {
            text,
            visibility,
            passphrase,
            salt,
        } => {
            let material = match (passphrase, salt) {
                (Some(passphrase), Some(salt)) => Some(EncryptionMaterial {
                    key: crypto::derive_key(&passphrase, salt.as_bytes())?,
                    derived_from_passphrase: true,
                }),
                _ => None,
            };
            connect(&client, cli.wallet.as_deref()).await?;
            let outcome = client.publish(&text, visibility, material.as_ref()).await?;
            print_json(&json!({
                "content_address": outcome.content.reference.content_address,
                "digest": outcome.content.reference.digest.to_string(),
                "url": outcome.content.url,
                "key": outcome.content.exported_key,
                "transaction": report_json(&outcome.report),
            }))?;
        }
        Commands::React { post_id, reaction } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let report = client.react(post_id, reaction).await?;
            print_json(&report_json(&report))?;
        }
        Commands::Follow { address } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let report = client.follow(&address).await?;
            print_json(&report_json(&report))?;
        }
        Commands::CreateGroup { name } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let (report, secret) = client.create_group(&name).await?;
            print_json(&json!({
                "group_secret": secret.to_string(),
                "transaction": report_json(&report),
            }))?;
        }
        Commands::CreateIdentity {
            display_name,
            avatar,
            bio,
        } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let outcome = client.create_identity(&display_name, &avatar, &bio).await?;
            let address = |c: &Option<PreparedContent>| c.as_ref().map(|c| c.reference.content_address.clone());
            print_json(&json!({
                "display_name": outcome.display_name.reference.content_address,
                "avatar": address(&outcome.avatar),
                "bio": address(&outcome.bio),
                "transaction": report_json(&outcome.report),
            }))?;
        }
        Commands::Records { program } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let mut query = client.records(program);
            query.fetch().await;
            if let Some(error) = query.error() {
                eprintln!("Error: {}", error);
            }
            print_json(&serde_json::to_value(query.records())?)?;
        }
        Commands::Status { transaction_id } => {
            connect(&client, cli.wallet.as_deref()).await?;
            let status = client.session().transaction_status(&transaction_id).await?;
            println!("{}", status.as_str());
        }
        Commands::Query { query } => {
            run_query(&client, query).await?;
        }
        Commands::Fetch { address, key } => {
            let key = key.as_deref().map(crypto::import_key).transpose()?;
            println!("{}", client.pipeline().retrieve(&address, key.as_ref()).await?);
        }
    }

    Ok(())
}

async fn connect(client: &AnonexClient, preferred: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let session = client.session();
    if preferred.is_none() && session.auto_connect().await.unwrap_or(false) {
        return Ok(());
    }
    session.connect(preferred).await?;

    let state = session.state();
    if state.is_demo() {
        eprintln!(
            "No wallet connected, using a simulated wallet ({})",
            state.last_error.as_deref().unwrap_or("no reason given")
        );
    }
    tracing::info!(
        alias = state.display_alias.as_deref().unwrap_or_default(),
        demo = state.is_demo(),
        "Session ready"
    );
    Ok(())
}

async fn run_query(client: &AnonexClient, query: Query) -> Result<(), Box<dyn std::error::Error>> {
    let queries = client.queries();
    let value = match query {
        Query::Height => json!(queries.ledger().latest_block_height().await?),
        Query::Program { id } => json!(queries.ledger().program(&id).await?),
        Query::Transaction { id } => queries.ledger().transaction(&id).await?,
        Query::Post { id } => queries.post(&id).await?.unwrap_or(Value::Null),
        Query::PostCount => json!(queries.post_count().await?),
        Query::Reactions { post_id } => json!(queries.reaction_count(&post_id).await?),
        Query::Likes { post_id } => json!(queries.like_count(&post_id).await?),
        Query::Followers { user_hash } => json!(queries.follower_count(&user_hash).await?),
        Query::Following { user_hash } => json!(queries.following_count(&user_hash).await?),
        Query::Group { id } => queries.group(&id).await?.unwrap_or(Value::Null),
        Query::Members { group_id } => json!(queries.member_count(&group_id).await?),
        Query::Profile { pseudonym_hash } => {
            queries.profile(&pseudonym_hash).await?.unwrap_or(Value::Null)
        }
        Query::Verified { pseudonym_hash } => json!(queries.is_verified(&pseudonym_hash).await?),
    };
    print_json(&value)
}

fn report_json(report: &ExecutionReport) -> Value {
    json!({
        "lifecycle_id": report.lifecycle_id.to_string(),
        "transaction_id": report.transaction_id,
        "outcome": format!("{:?}", report.outcome),
        "assumed": report.outcome.is_assumed(),
    })
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
