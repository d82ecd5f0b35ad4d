//! Loading corpora and queries from disk and the command line.

use std::path::Path;

use anyhow::{Context, Result, bail};
use sift_rag::{Chunk, MetadataValue, Query};

use crate::cli::InputArgs;

/// Read a JSON array of chunks.
pub fn load_corpus(path: &Path) -> Result<Vec<Chunk>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid corpus {}", path.display()))
}

/// Read a JSON query.
pub fn load_query(path: &Path) -> Result<Query> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read query {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid query {}", path.display()))
}

/// Parse a comma-separated list of floats.
pub fn parse_vector(raw: &str) -> Result<Vec<f32>> {
    let vector = raw
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f32>().with_context(|| format!("invalid vector component '{part}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    if vector.is_empty() {
        bail!("query vector is empty");
    }
    Ok(vector)
}

/// Parse `key=value`; the value is read as a bool, then a number, then a string.
pub fn parse_filter(raw: &str) -> Result<(String, MetadataValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("filter '{raw}' must look like key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("filter '{raw}' has an empty key");
    }
    let value = value.trim();
    let value = if let Ok(b) = value.parse::<bool>() {
        MetadataValue::Bool(b)
    } else if let Ok(n) = value.parse::<f64>() {
        MetadataValue::Number(n)
    } else {
        MetadataValue::String(value.to_string())
    };
    Ok((key.to_string(), value))
}

/// Build the query from either `--query-file` or `--vector`, then add `--filter`s.
///
/// Command-line filters override entries with the same key in the query file.
pub fn build_query(args: &InputArgs) -> Result<Query> {
    let mut query = match (&args.query_file, &args.vector) {
        (Some(path), _) => load_query(path)?,
        (None, Some(raw)) => Query::new(parse_vector(raw)?),
        (None, None) => bail!("either --query-file or --vector is required"),
    };
    for raw in &args.filters {
        let (key, value) = parse_filter(raw)?;
        query.filter.insert(key, value);
    }
    Ok(query)
}
