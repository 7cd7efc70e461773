use crate::{
    core::{
        config::ClusteringConfig,
        constants::CLUSTER_THRESHOLD_PERCENT,
        geo::{MarkPosition, MarkSet},
    },
    data::records::MarkedMapRecord,
};

/// Collapses marks pooled from several records into one dot per cluster.
///
/// Greedy and single-pass: each mark is kept unless a mark already kept lies
/// within the threshold (percent space, inclusive). The first mark seen in a
/// cluster is its representative, label included, so the result depends on
/// input order. Input is never modified.
#[derive(Debug, Clone)]
pub struct MarkClusterer {
    config: ClusteringConfig,
}

impl MarkClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn with_threshold(threshold_percent: f64) -> Self {
        Self::new(ClusteringConfig { threshold_percent })
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold_percent
    }

    /// Cluster an already flattened sequence of marks
    pub fn merge<'a, I>(&self, marks: I) -> MarkSet
    where
        I: IntoIterator<Item = &'a MarkPosition>,
    {
        let threshold = self.config.threshold_percent;
        let mut kept: MarkSet = Vec::new();
        let mut seen = 0usize;

        for mark in marks {
            seen += 1;
            let intersects = kept
                .iter()
                .any(|existing| existing.percent_distance_to(mark) <= threshold);
            if !intersects {
                kept.push(mark.clone());
            }
        }

        log::debug!("clustered {} marks into {}", seen, kept.len());
        kept
    }

    /// Flatten records in order, then their marks in insertion order, and cluster
    pub fn combine_records(&self, records: &[MarkedMapRecord]) -> MarkSet {
        self.merge(records.iter().flat_map(|record| record.marks.iter()))
    }
}

impl Default for MarkClusterer {
    fn default() -> Self {
        Self::with_threshold(CLUSTER_THRESHOLD_PERCENT)
    }
}
