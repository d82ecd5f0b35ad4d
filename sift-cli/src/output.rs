//! Human-readable rendering of results.

use std::fmt::Write;

use sift_rag::{RetrievalSummary, ScoredResult};

/// Metadata keys shown first, in this order, when present.
const PRIMARY_KEYS: [&str; 2] = ["source", "page"];

pub fn render_results(results: &[ScoredResult], preview_chars: usize) -> String {
    if results.is_empty() {
        return "No results matched.\n".to_string();
    }
    let mut out = String::new();
    for r in results {
        let _ = write!(out, "[{}] {} distance {:.4} ({})", r.rank + 1, r.chunk.id, r.distance, r.tier());
        for key in PRIMARY_KEYS {
            if let Some(value) = r.chunk.metadata.get(key) {
                let _ = write!(out, " {key}={value}");
            }
        }
        out.push('\n');

        let preview = r.preview(preview_chars);
        let ellipsis = if r.chunk.text.chars().count() > preview_chars { "..." } else { "" };
        let _ = writeln!(out, "    {preview}{ellipsis}");
        let _ = writeln!(out, "    Length: {} characters", r.chunk.text.chars().count());
    }
    out
}

pub fn render_summaries(report: &[(usize, Option<RetrievalSummary>)]) -> String {
    let mut out = String::new();
    for (k, summary) in report {
        match summary {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "k={k:<3} returned {:<3} mean {:.4} best {:.4} worst {:.4}",
                    s.count, s.mean_distance, s.best_distance, s.worst_distance
                );
            }
            None => {
                let _ = writeln!(out, "k={k:<3} no results");
            }
        }
    }
    out
}
