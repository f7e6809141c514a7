use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfreader::document::{build_document, DocumentSnapshot};
use rfreader::navigation::{NavigationPolicy, NavigationRequest};
use rfreader::platform::default_opener;
use rfreader::progress::normalized_progress;
use rfreader::{Entry, NavigationDecision, ReaderConfig, ScrollGeometry};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(name = "rfreader", version, about = "Inspect how the reader presents an entry")]
struct Cli {
    /// JSON reader configuration (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the HTML document built for an entry JSON file
    Render {
        entry: PathBuf,
        #[arg(long)]
        justify: bool,
    },
    /// Print the heading and text of the document built for an entry
    Preview { entry: PathBuf },
    /// Classify a navigation request
    Classify {
        url: String,
        /// The request targets a nested frame
        #[arg(long)]
        subframe: bool,
        /// Override the first-party content root
        #[arg(long)]
        root: Option<Url>,
        /// Open external targets in the system browser
        #[arg(long)]
        open: bool,
    },
    /// Compute normalized progress for a scroll position
    Progress {
        offset: f64,
        viewport: f64,
        content: f64,
    },
}

fn load_entry(path: &PathBuf) -> Result<Entry> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading entry {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing entry {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReaderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReaderConfig::default(),
    };

    match cli.command {
        Command::Render { entry, justify } => {
            let entry = load_entry(&entry)?;
            println!("{}", build_document(&entry, justify || config.justify_by_default));
        }
        Command::Preview { entry } => {
            let entry = load_entry(&entry)?;
            let snapshot = DocumentSnapshot::parse(&build_document(&entry, config.justify_by_default));
            println!("Title: {}", snapshot.heading);
            println!("Saved offset: {}px", entry.screen_position_for_webview());
            println!("{}", snapshot.text);
        }
        Command::Classify {
            url,
            subframe,
            root,
            open,
        } => {
            let policy = NavigationPolicy::new(root.unwrap_or(config.content_root));
            let request = NavigationRequest {
                url: Some(url),
                targets_main_frame: !subframe,
            };
            let decision = if open {
                policy.decide_and_dispatch(&request, default_opener(false).as_ref())
            } else {
                policy.decide(&request)
            };
            match decision {
                NavigationDecision::AllowInPlace => println!("allow-in-place"),
                NavigationDecision::AllowSubframe => println!("allow-subframe"),
                NavigationDecision::OpenExternally(u) => println!("open-externally {}", u),
                NavigationDecision::Cancel => println!("cancel"),
            }
        }
        Command::Progress {
            offset,
            viewport,
            content,
        } => {
            println!(
                "{:.4}",
                normalized_progress(ScrollGeometry::new(offset, viewport, content))
            );
        }
    }
    Ok(())
}
