//! Command-line harness for exercising a [`HybridRetriever`] against a
//! small in-memory corpus. Not a production ingestion tool — there is no
//! persistence and no real encoder; `--demo` seeds the corpus with a
//! handful of hard-coded passages and a deterministic hash-based
//! encoder, which is enough to exercise ingestion, search, and fusion
//! end to end.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rank_rank::prelude::*;
use rank_retrieve::dense::Encoder;
use rank_retrieve::RetrieveError;

#[derive(Parser)]
#[command(name = "rank-rank", about = "Hybrid lexical/dense retrieval + QA demo CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// BM25 variant: "plus" or "l".
    #[arg(long, default_value = "plus", global = true)]
    bm25_variant: String,

    /// Fusion method: "weighted-sum" or "rrf".
    #[arg(long, default_value = "weighted-sum", global = true)]
    fusion: String,
}

#[derive(Subcommand)]
enum Command {
    /// Seeds a small demo corpus and runs a query against it.
    Demo {
        query: String,
        #[arg(long, default_value_t = 5)]
        top_k: usize,
        #[arg(long, default_value = "normal")]
        mode: String,
    },
    /// Prints retriever configuration as JSON.
    Info,
}

const DEMO_PASSAGES: &[&str] = &[
    "The Eiffel Tower is 330 meters tall and located in Paris.",
    "The Great Wall of China stretches over 21,000 kilometers.",
    "Mount Everest is the tallest mountain above sea level at 8,849 meters.",
    "The Amazon rainforest produces roughly 20% of the world's oxygen.",
    "Python is a high-level, general-purpose programming language.",
];

/// A deterministic, dependency-free stand-in for a real bi-encoder:
/// hashes bytes into fixed-width buckets. Suitable for demoing fusion
/// behavior, not for real semantic search.
struct HashEncoder {
    dim: usize,
}

impl Encoder for HashEncoder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn encode_query(&self, text: &str) -> Result<Vec<f32>, RetrieveError> {
        Ok(self.encode_passages(&[text])?.remove(0))
    }

    fn encode_passages(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrieveError> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; self.dim];
                for (i, b) in t.bytes().enumerate() {
                    v[i % self.dim] += b as f32;
                }
                v
            })
            .collect())
    }
}

fn build_retriever(cli: &Cli) -> Result<HybridRetriever> {
    let bm25_params = match cli.bm25_variant.as_str() {
        "l" | "bm25l" => Bm25Params::bm25l(),
        _ => Bm25Params::bm25_plus(),
    };
    let fusion_method = match cli.fusion.as_str() {
        "rrf" => FusionMethod::Rrf,
        _ => FusionMethod::WeightedSum,
    };
    Ok(HybridRetriever::new(
        Arc::new(HashEncoder { dim: 32 }),
        bm25_params,
        fusion_method,
        true,
        (0.5, 0.5),
    ))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let retriever = build_retriever(&cli)?;

    match &cli.command {
        Command::Demo { query, top_k, mode } => {
            let texts: Vec<String> = DEMO_PASSAGES.iter().map(|s| s.to_string()).collect();
            retriever
                .add_documents(&texts, None, None)
                .context("seeding demo corpus")?;
            let results = retriever.search(query, *top_k, None, mode)?;
            for r in &results {
                println!(
                    "[{:.4}] (bm25={:.4} dense={:.4}) {}",
                    r.fused_score, r.bm25_score, r.dense_score, r.passage
                );
            }
        }
        Command::Info => {
            let info = retriever.get_retriever_info();
            println!("{}", serde_json::to_string_pretty(&InfoView::from(info))?);
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct InfoView {
    retriever_type: &'static str,
    document_count: usize,
    bm25_variant: &'static str,
    fusion_method: &'static str,
    normalize_scores: bool,
    default_weights: (f64, f64),
    neural_qa_info: Option<NeuralQaInfoView>,
}

#[derive(serde::Serialize)]
struct NeuralQaInfoView {
    confidence_threshold: f32,
    max_answer_length: usize,
    top_k_answers: usize,
}

impl From<RetrieverInfo> for InfoView {
    fn from(info: RetrieverInfo) -> Self {
        let stats = info.stats;
        Self {
            retriever_type: info.retriever_type,
            document_count: stats.document_count,
            bm25_variant: match stats.bm25_variant {
                Bm25Variant::Bm25Plus => "bm25+",
                Bm25Variant::Bm25L => "bm25l",
            },
            fusion_method: match stats.fusion_method {
                FusionMethod::WeightedSum => "weighted-sum",
                FusionMethod::Rrf => "rrf",
            },
            normalize_scores: stats.normalize_scores,
            default_weights: stats.default_weights,
            neural_qa_info: info.neural_qa_info.map(|q| NeuralQaInfoView {
                confidence_threshold: q.confidence_threshold,
                max_answer_length: q.max_answer_length,
                top_k_answers: q.top_k_answers,
            }),
        }
    }
}
