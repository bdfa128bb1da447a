//! Stratification of epitope sites into mutation tiers.

/// Epitope sites split into a low and a high mutation tier.
///
/// The first sites of the epitope list, by list position, form the high tier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpitopeTiers {
    low: Vec<usize>,
    high: Vec<usize>,
    proportion: f64,
}

impl EpitopeTiers {
    /// Split `sites` such that the position `i` goes to the high tier iff `i < n * proportion`.
    ///
    /// Both tiers keep the order of `sites`. For fractional `n * proportion` the high tier
    /// receives `ceil(n * proportion)` sites, which can exceed `expected_high_count` by one.
    pub fn stratify(sites: &[usize], proportion: f64) -> Self {
        let threshold = sites.len() as f64 * proportion;
        let (high, low): (Vec<(usize, usize)>, Vec<(usize, usize)>) = sites
            .iter()
            .copied()
            .enumerate()
            .partition(|(position, _)| (*position as f64) < threshold);
        let tiers = Self {
            low: low.into_iter().map(|(_, site)| site).collect(),
            high: high.into_iter().map(|(_, site)| site).collect(),
            proportion,
        };
        if tiers.high.len() != tiers.expected_high_count() {
            log::debug!(
                "High tier holds {} sites, {} expected from proportionHighSites={}",
                tiers.high.len(),
                tiers.expected_high_count(),
                proportion
            );
        }
        tiers
    }

    pub fn low(&self) -> &[usize] {
        &self.low
    }

    pub fn high(&self) -> &[usize] {
        &self.high
    }

    pub fn len(&self) -> usize {
        self.low.len() + self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the high tier as rounded from the proportion, with halves rounded up.
    pub fn expected_high_count(&self) -> usize {
        (self.len() as f64 * self.proportion + 0.5).floor() as usize
    }

    /// Whether a 1-based codon position is an epitope site in the high tier.
    pub fn is_high(&self, site: usize) -> bool {
        self.high.contains(&site)
    }

    /// Whether a 1-based codon position is an epitope site in the low tier.
    pub fn is_low(&self, site: usize) -> bool {
        self.low.contains(&site)
    }
}
