//! Medkg CLI — biomedical knowledge-graph ingestion engine.
//!
//! Usage:
//!   medkg ingest --source knowledge-graph --file payload.json [--store-url URL]
//!   medkg annotate --text "..." [--concepts gene,disease] [--store-url URL]

use clap::{Parser, Subcommand, ValueEnum};
use medkg::{
    IngestOptions, IngestOutcome, IngestPipeline, JobPoller, MemoryStore, Source, SourcePayload,
};
use medkg::annotate::HttpAnnotationSession;
use medkg::storage::{GraphStore, HttpStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "medkg", version, about = "Biomedical knowledge-graph ingestion engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Document/passage/annotation payload
    Literature,
    /// Message/knowledge-graph payload
    KnowledgeGraph,
    /// Results/analyses/edge-binding payload
    Bindings,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Literature => Source::Literature,
            SourceArg::KnowledgeGraph => Source::KnowledgeGraph,
            SourceArg::Bindings => Source::Bindings,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a payload file from one of the three sources
    Ingest {
        /// Which source produced the payload
        #[arg(long, value_enum)]
        source: SourceArg,
        /// Path to the payload JSON file
        #[arg(long)]
        file: PathBuf,
        /// Graph scope identities are computed under
        #[arg(long, default_value = "main")]
        scope: String,
        /// Records per store batch
        #[arg(long, default_value_t = 100)]
        batch_size: usize,
        /// Seed node ids; two or more enable the neighborhood filter
        #[arg(long)]
        seed: Vec<String>,
        /// External store base URL (in-memory store when omitted)
        #[arg(long, env = "MEDKG_STORE_URL")]
        store_url: Option<String>,
    },
    /// Annotate free text via the async annotation service, then ingest
    Annotate {
        /// Text to annotate
        #[arg(long)]
        text: String,
        /// Concept filter passed to the service (e.g. "gene,disease")
        #[arg(long)]
        concepts: Option<String>,
        /// Annotation service base URL
        #[arg(long, env = "MEDKG_ANNOTATE_URL")]
        annotate_url: String,
        /// Graph scope identities are computed under
        #[arg(long, default_value = "main")]
        scope: String,
        /// External store base URL (in-memory store when omitted)
        #[arg(long, env = "MEDKG_STORE_URL")]
        store_url: Option<String>,
    },
}

fn open_store(store_url: Option<String>) -> Arc<dyn GraphStore> {
    match store_url {
        Some(url) => Arc::new(HttpStore::new(url)),
        None => Arc::new(MemoryStore::new()),
    }
}

fn report(outcome: IngestOutcome) {
    match outcome {
        IngestOutcome::Completed(summary) => {
            println!(
                "nodes: {} created, {} skipped / edges: {} created, {} skipped, {} updated",
                summary.nodes.created,
                summary.nodes.skipped,
                summary.edges.created,
                summary.edges.skipped,
                summary.updated_edges,
            );
            if summary.counters.dropped_records > 0 {
                println!("dropped records: {}", summary.counters.dropped_records);
            }
        }
        IngestOutcome::Background { call_id } => {
            println!("deadline passed; ingestion {} continuing in background", call_id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest {
            source,
            file,
            scope,
            batch_size,
            seed,
            store_url,
        } => {
            let raw = std::fs::read_to_string(&file)?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let payload = SourcePayload::from_value(source.into(), value)?;

            let pipeline = IngestPipeline::new(open_store(store_url));
            let options = IngestOptions {
                graph_scope: scope,
                batch_size,
                seeds: seed,
                deadline: None,
            };
            report(pipeline.ingest(payload, options).await?);
        }
        Commands::Annotate {
            text,
            concepts,
            annotate_url,
            scope,
            store_url,
        } => {
            let session = HttpAnnotationSession::new(annotate_url, Duration::from_secs(1));
            let poller = JobPoller::default();
            let pipeline = IngestPipeline::new(open_store(store_url));
            let options = IngestOptions {
                graph_scope: scope,
                ..Default::default()
            };
            let outcome = pipeline
                .ingest_text(&poller, &session, &text, concepts.as_deref(), options)
                .await?;
            report(outcome);
        }
    }
    Ok(())
}
