//! Subcommand implementations. Each returns the text to print on stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use sift_rag::scorer;
use sift_rag::{RetrievalConfig, RetrievalSummary, SearchType, summarize};
use tracing::info;

use crate::cli::{AnalyzeArgs, RankArgs};
use crate::input::{build_query, load_corpus};
use crate::output::{render_results, render_summaries};

/// Start from `--config` (or defaults) and apply flag overrides.
pub fn resolve_config(args: &RankArgs) -> Result<RetrievalConfig> {
    let mut config = match &args.config {
        Some(path) => RetrievalConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RetrievalConfig::default(),
    };
    if args.mmr {
        config.search_type = SearchType::Mmr;
    }
    if let Some(k) = args.top_k {
        config.top_k = k;
        // Keep the default fetch_k usable when only k was raised.
        if args.fetch_k.is_none() && config.fetch_k < k {
            config.fetch_k = k;
        }
    }
    if let Some(fetch_k) = args.fetch_k {
        config.fetch_k = fetch_k;
    }
    if let Some(lambda) = args.lambda {
        config.lambda_mult = lambda;
    }
    if let Some(max) = args.max_distance {
        config.max_distance = Some(max);
    }
    config.validate()?;
    Ok(config)
}

pub fn rank(args: &RankArgs) -> Result<String> {
    let config = resolve_config(args)?;
    let query = build_query(&args.input)?;
    let corpus = load_corpus(&args.input.corpus)?;
    let total = corpus.len();

    let results = scorer::rank(&query, corpus, &config)?;
    info!(corpus = total, returned = results.len(), search_type = ?config.search_type, "ranked corpus");

    if args.json {
        let mut out = serde_json::to_string_pretty(&results)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render_results(&results, args.preview))
    }
}

/// One `--k` entry of `analyze --json`; `summary` is null when nothing matched.
#[derive(Debug, Serialize)]
struct KReport<'a> {
    k: usize,
    summary: Option<&'a RetrievalSummary>,
}

pub fn analyze(args: &AnalyzeArgs) -> Result<String> {
    let query = build_query(&args.input)?;
    let corpus = load_corpus(&args.input.corpus)?;

    let candidates = scorer::filter(corpus, &query.filter);
    let scored = scorer::score(&query.embedding, candidates)?;

    let mut report: Vec<(usize, Option<RetrievalSummary>)> = Vec::with_capacity(args.k.len());
    for &k in &args.k {
        let results = scorer::top_k(scored.clone(), k)?;
        report.push((k, summarize(k, &results)));
    }

    if args.json {
        let entries: Vec<KReport<'_>> =
            report.iter().map(|(k, summary)| KReport { k: *k, summary: summary.as_ref() }).collect();
        let mut out = serde_json::to_string_pretty(&entries)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render_summaries(&report))
    }
}
