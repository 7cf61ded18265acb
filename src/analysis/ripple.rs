use indexmap::IndexMap;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::models::KnowledgeGraph;

use super::scanner::ScanResult;

/// Neighbor tickers nominated by today's active cores.
///
/// Each candidate maps to the cores that nominated it, in first-seen order.
/// Candidates themselves are ordered by first nomination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RippleCandidates {
    pub source_map: IndexMap<String, Vec<String>>,
}

impl RippleCandidates {
    pub fn candidates(&self) -> Vec<String> {
        self.source_map.keys().cloned().collect()
    }

    pub fn sources(&self, candidate: &str) -> &[String] {
        self.source_map
            .get(candidate)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.source_map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source_map.len()
    }
}

/// Expand actionable core results to their graph neighbors.
///
/// Non-actionable results are ignored, so callers may pass the whole core
/// batch. No active core gives an empty set.
pub fn propagate(core_results: &[ScanResult], graph: &KnowledgeGraph) -> RippleCandidates {
    let mut source_map: IndexMap<String, Vec<String>> = IndexMap::new();

    for core in core_results.iter().filter(|r| r.actionable) {
        for neighbor in graph.neighbors(&core.ticker) {
            let sources = source_map.entry(neighbor.clone()).or_default();
            if !sources.contains(&core.ticker) {
                sources.push(core.ticker.clone());
            }
        }
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_ripple_sources {
        for (candidate, sources) in &source_map {
            log::info!("{} <- {}", candidate, sources.join(", "));
        }
    }

    RippleCandidates { source_map }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KnowledgeGraphNode, SparkVerdict, VcpVerdict};
    use crate::test_support::day;

    fn result(ticker: &str, actionable: bool) -> ScanResult {
        ScanResult {
            ticker: ticker.to_string(),
            as_of_date: day(0),
            current_price: 100.0,
            vcp: VcpVerdict {
                is_vcp: actionable,
                tightness: Some(0.02),
            },
            spark: SparkVerdict::default(),
            actionable,
        }
    }

    fn graph() -> KnowledgeGraph {
        KnowledgeGraph::from_nodes([
            KnowledgeGraphNode::new("AAA", &["NB1", "SHARED"], "Semis", ""),
            KnowledgeGraphNode::new("BBB", &["SHARED", "NB2"], "Semis", ""),
            KnowledgeGraphNode::new("CCC", &["NB3"], "Energy", ""),
        ])
    }

    #[test]
    fn shared_neighbor_keeps_both_sources_in_order() {
        let cores = vec![result("AAA", true), result("BBB", true), result("CCC", false)];
        let ripple = propagate(&cores, &graph());

        assert_eq!(ripple.candidates(), vec!["NB1", "SHARED", "NB2"]);
        assert_eq!(ripple.sources("SHARED"), ["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(ripple.sources("NB1"), ["AAA".to_string()]);
        assert!(ripple.sources("NB3").is_empty());
    }

    #[test]
    fn first_seen_order_follows_core_results() {
        let cores = vec![result("BBB", true), result("AAA", true)];
        let ripple = propagate(&cores, &graph());

        assert_eq!(ripple.candidates(), vec!["SHARED", "NB2", "NB1"]);
        assert_eq!(ripple.sources("SHARED"), ["BBB".to_string(), "AAA".to_string()]);
    }

    #[test]
    fn no_active_core_gives_empty_candidates() {
        let cores = vec![result("AAA", false), result("BBB", false)];
        let ripple = propagate(&cores, &graph());
        assert!(ripple.is_empty());
        assert!(ripple.candidates().is_empty());

        assert!(propagate(&[], &KnowledgeGraph::default()).is_empty());
    }

    #[test]
    fn active_core_missing_from_graph_nominates_nothing() {
        let ripple = propagate(&[result("ZZZ", true)], &graph());
        assert!(ripple.is_empty());
    }
}
