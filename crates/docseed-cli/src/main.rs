//! `docseed` CLI — encode documents to the Firestore wire format and seed demo data.
//!
//! ## Usage
//!
//! ```sh
//! # Encode a JSON object into Firestore `fields` (stdin → stdout)
//! echo '{"count":3,"appliedAt":"2025-09-17T05:00:00Z"}' | docseed encode
//!
//! # Decode Firestore `fields` (or a whole document) back to plain JSON
//! docseed decode -i document.json
//!
//! # Show the demo seed requests without sending anything
//! docseed seed --project-id bugcash --dry-run
//!
//! # Seed the demo data set
//! DOCSEED_API_KEY=... docseed seed --project-id bugcash
//!
//! # Seed from a plan file instead of the built-in demo data
//! docseed seed --project-id bugcash --plan plan.json -v
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docseed_core::config::{DEFAULT_BASE_URL, DEFAULT_DATABASE};
use docseed_core::{
    decode, demo_plan, encode, load_plan, write_target, EncodedFields, RestStore, SeedReport,
    SeedWrite, StoreConfig, Value, WriteRequest,
};
use std::io::{self, Read};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docseed",
    version,
    about = "Firestore wire-format encoder and demo data seeder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON object into Firestore `fields` JSON
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode Firestore `fields` JSON (or a document with a `fields` key) to plain JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write the demo data set (or a plan file) to the document store
    Seed {
        /// JSON plan file to use instead of the built-in demo data
        #[arg(long)]
        plan: Option<String>,
        /// Print each request instead of sending it
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args)]
struct StoreArgs {
    /// Project id of the document store
    #[arg(long, env = "DOCSEED_PROJECT_ID")]
    project_id: String,
    /// Web API key sent as `?key=` (omit for emulators)
    #[arg(long, env = "DOCSEED_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,
    /// Database id
    #[arg(long, env = "DOCSEED_DATABASE", default_value = DEFAULT_DATABASE)]
    database: String,
    /// REST endpoint, e.g. http://localhost:8080/v1 for the emulator
    #[arg(long, env = "DOCSEED_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

impl StoreArgs {
    fn into_config(self) -> StoreConfig {
        StoreConfig::new(self.project_id, self.api_key)
            .with_database(self.database)
            .with_base_url(self.base_url)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            pretty,
        } => {
            let json = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Failed to parse input JSON")?;
            let fields = Value::from(value)
                .into_fields()
                .context("Input must be a JSON object of document fields")?;
            let encoded = encode(&fields);
            let rendered = if pretty {
                serde_json::to_string_pretty(&encoded)?
            } else {
                serde_json::to_string(&encoded)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Decode { input, output } => {
            let json = read_input(input.as_deref())?;
            let fields = parse_encoded_fields(&json)?;
            let decoded = decode(&fields).context("Failed to decode Firestore fields")?;
            let pretty = serde_json::to_string_pretty(&Value::Map(decoded).to_json())?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Seed {
            plan,
            dry_run,
            store,
        } => {
            let config = store.into_config();
            config.validate().context("Invalid store configuration")?;

            let writes = match plan {
                Some(path) => {
                    let json = read_input(Some(path.as_str()))?;
                    load_plan(&json).with_context(|| format!("Failed to load plan: {}", path))?
                }
                None => demo_plan(chrono::Utc::now()),
            };
            info!(
                project = %config.project_id,
                database = %config.database,
                writes = writes.len(),
                "seeding document store"
            );

            if dry_run {
                print_dry_run(&config, &writes)?;
                return Ok(());
            }

            let store = RestStore::new(config).context("Failed to create store client")?;
            let report = docseed_core::run(&store, &writes);
            print_report(&report);
            if !report.is_success() {
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// Accepts either a bare `fields` object or a whole document (`{"fields": ...}`).
fn parse_encoded_fields(json: &str) -> Result<EncodedFields> {
    let mut value: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse input JSON")?;
    let is_document = value.get("fields").is_some_and(|f| f.is_object());
    let fields = if is_document {
        value["fields"].take()
    } else {
        value
    };
    serde_json::from_value(fields).context("Input is not a Firestore fields object")
}

/// Prints method, path, and body of each write. The API key is left out of
/// the printed URL.
fn print_dry_run(config: &StoreConfig, writes: &[SeedWrite]) -> Result<()> {
    let redacted = StoreConfig {
        api_key: String::new(),
        ..config.clone()
    };
    for write in writes {
        let target = write_target(&redacted, &write.collection, write.document_id.as_deref())
            .with_context(|| format!("Invalid target in collection {}", write.collection))?;
        let body = WriteRequest {
            fields: encode(&write.fields),
        };
        println!("{} {}", target.method, target.url);
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    Ok(())
}

fn print_report(report: &SeedReport) {
    for outcome in &report.outcomes {
        let target = outcome.document_id.as_deref().unwrap_or("<auto>");
        match &outcome.result {
            Ok(doc) => println!("ok     {}/{}", outcome.collection, doc.id()),
            Err(e) => println!("FAILED {}/{}: {}", outcome.collection, target, e),
        }
    }
    println!();
    for (collection, count) in report.created_by_collection() {
        println!("{}: {} document(s) written", collection, count);
    }
    println!(
        "{} written, {} failed",
        report.succeeded(),
        report.failed()
    );
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
