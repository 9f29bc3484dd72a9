use std::sync::OnceLock;

use regex::Regex;
use taskloom_core::api::{Summarizer, SummaryKind};

/// Structural summary without a model: declarations for code, headings
/// plus paragraph leads for prose.
#[derive(Debug, Default, Clone)]
pub struct HeuristicSummarizer;

fn signature_regex() -> &'static Regex {
    static SIGNATURE: OnceLock<Regex> = OnceLock::new();
    SIGNATURE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:pub(?:\([^)]*\))?\s+|export\s+(?:default\s+)?)?(?:async\s+)?(?:fn|struct|enum|trait|impl|mod|type|const|class|def|function|interface)\b",
        )
        .unwrap()
    })
}

impl HeuristicSummarizer {
    fn summarize_code(content: &str) -> String {
        let re = signature_regex();
        let signatures: Vec<&str> = content
            .lines()
            .filter(|line| re.is_match(line))
            .map(|line| line.trim_end().trim_end_matches('{').trim_end())
            .collect();
        if signatures.is_empty() {
            return content.lines().next().unwrap_or_default().trim().to_string();
        }
        signatures.join("\n")
    }

    fn summarize_docs(content: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut paragraph_open = false;
        for line in content.lines().map(str::trim) {
            if line.is_empty() {
                paragraph_open = false;
            } else if line.starts_with('#') {
                out.push(line.to_string());
                paragraph_open = false;
            } else if !paragraph_open {
                let lead = match line.find(". ") {
                    Some(idx) => &line[..=idx],
                    None => line,
                };
                out.push(lead.to_string());
                paragraph_open = true;
            }
        }
        out.join("\n")
    }
}

impl Summarizer for HeuristicSummarizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn summarize(&self, content: &str, kind: SummaryKind) -> String {
        match kind {
            SummaryKind::Code => Self::summarize_code(content),
            SummaryKind::Documentation => Self::summarize_docs(content),
        }
    }
}
