//! Per-type reductions applied when a component overflows the budget.

use super::traits::{Summarizer, SummaryKind, TokenEstimator};
use super::types::{ComponentPayload, ContextComponent, DependencyItem};
use crate::util::truncate_chars;

pub(crate) fn estimate_payload(estimator: &dyn TokenEstimator, payload: &ComponentPayload) -> usize {
    serde_json::to_string(payload)
        .map(|s| estimator.estimate(&s))
        .unwrap_or(usize::MAX)
}

pub(crate) struct Strategies<'a> {
    pub estimator: &'a dyn TokenEstimator,
    pub summarizer: &'a dyn Summarizer,
    pub dependency_item_cost: usize,
}

impl Strategies<'_> {
    /// Compressed form of `component` costing at most `budget`, or `None`
    /// when the type has no strategy or nothing useful fits.
    pub fn compress(&self, component: &ContextComponent, budget: usize) -> Option<ContextComponent> {
        if budget == 0 {
            return None;
        }
        let (payload, cost) = match &component.payload {
            ComponentPayload::Code { content, path } => {
                self.fit_summary(content, SummaryKind::Code, budget, |content| {
                    ComponentPayload::Code {
                        content,
                        path: path.clone(),
                    }
                })?
            }
            ComponentPayload::Documentation { content, title } => {
                self.fit_summary(content, SummaryKind::Documentation, budget, |content| {
                    ComponentPayload::Documentation {
                        content,
                        title: title.clone(),
                    }
                })?
            }
            ComponentPayload::Dependencies { items, .. } => self.top_dependencies(items, budget)?,
            ComponentPayload::Other { .. } => return None,
        };
        Some(ContextComponent {
            key: component.key.clone(),
            payload,
            estimated_tokens: cost,
            is_compressed: true,
        })
    }

    fn fit_summary(
        &self,
        content: &str,
        kind: SummaryKind,
        budget: usize,
        build: impl Fn(String) -> ComponentPayload,
    ) -> Option<(ComponentPayload, usize)> {
        let summary = self.summarizer.summarize(content, kind);
        let overhead = estimate_payload(self.estimator, &build(String::new()));
        if overhead >= budget {
            return None;
        }

        let mut limit = self.estimator.chars_for(budget - overhead);
        loop {
            let text = truncate_chars(&summary, limit);
            if text.is_empty() {
                return None;
            }
            let payload = build(text);
            let cost = estimate_payload(self.estimator, &payload);
            if cost <= budget {
                return Some((payload, cost));
            }
            // Escaping can inflate the serialized form; shrink and retry.
            let excess = self.estimator.chars_for(cost - budget).max(1);
            if excess >= limit {
                return None;
            }
            limit -= excess;
        }
    }

    fn top_dependencies(
        &self,
        items: &[DependencyItem],
        budget: usize,
    ) -> Option<(ComponentPayload, usize)> {
        let keep = (budget / self.dependency_item_cost.max(1)).max(1);
        let mut ranked = items.to_vec();
        ranked.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(keep);

        while !ranked.is_empty() {
            let payload = ComponentPayload::Dependencies {
                items: ranked.clone(),
                total_count: Some(items.len()),
            };
            let cost = estimate_payload(self.estimator, &payload);
            if cost <= budget {
                return Some((payload, cost));
            }
            ranked.pop();
        }
        None
    }
}
