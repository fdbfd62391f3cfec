//! Per-destination byte aggregation

use std::collections::HashMap;

use crate::models::FirewallEntry;

/// Running sent-byte totals keyed by destination IP
///
/// Totals are kept in first-seen order so that equal totals keep that order
/// after the final descending sort.
#[derive(Debug, Default)]
pub struct TrafficAggregator {
    index: HashMap<String, usize>,
    totals: Vec<(String, u64)>,
}

impl TrafficAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running total for `ip`
    pub fn add(&mut self, ip: String, bytes: u64) {
        match self.index.get(&ip) {
            Some(&slot) => {
                let total = &mut self.totals[slot].1;
                *total = total.saturating_add(bytes);
            }
            None => {
                self.index.insert(ip.clone(), self.totals.len());
                self.totals.push((ip, bytes));
            }
        }
    }

    /// Number of distinct destinations seen so far
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Entries sorted by total descending, ties in first-seen order
    pub fn finish(self) -> Vec<FirewallEntry> {
        let mut totals = self.totals;
        // sort_by is stable
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
            .into_iter()
            .map(|(ip, total)| FirewallEntry::new(ip, total))
            .collect()
    }

    /// Aggregate a sequence of (ip, bytes) observations in one pass
    pub fn aggregate<I>(entries: I) -> Vec<FirewallEntry>
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let mut aggregator = Self::new();
        for (ip, bytes) in entries {
            aggregator.add(ip, bytes);
        }
        aggregator.finish()
    }
}
