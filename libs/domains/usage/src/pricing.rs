use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Tier;

pub const CURRENCY: &str = "USD";

/// Per-million-token prices for one (model family, tier) combination.
///
/// Reasoning and non-reasoning output tokens are both billed at `output`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierPricing {
    pub uncached_input: f64,
    pub cached_input: f64,
    pub output: f64,
}

/// Price table keyed by model family (datestamp suffix already stripped).
pub fn pricing_for(model: &str, tier: Tier) -> Option<TierPricing> {
    match (model, tier) {
        ("gpt-4.1-nano", Tier::Regular) => Some(TierPricing {
            uncached_input: 0.10,
            cached_input: 0.025,
            output: 0.40,
        }),
        ("gpt-4.1-nano", Tier::Batch) => Some(TierPricing {
            uncached_input: 0.05,
            cached_input: 0.0,
            output: 0.20,
        }),
        ("text-embedding-3-small", Tier::Regular) => Some(TierPricing {
            uncached_input: 0.02,
            ..TierPricing::default()
        }),
        ("text-embedding-3-small", Tier::Batch) => Some(TierPricing {
            uncached_input: 0.01,
            ..TierPricing::default()
        }),
        _ => None,
    }
}

/// Whether any tier of this model family is priced at all.
pub fn has_pricing(model: &str) -> bool {
    pricing_for(model, Tier::Regular).is_some() || pricing_for(model, Tier::Batch).is_some()
}

static DATESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-\d{4}-\d{2}-\d{2}$").expect("datestamp pattern is valid")
});

/// Strip a trailing `-YYYY-MM-DD` datestamp from a persisted model name.
///
/// Model names come back from the API with a release datestamp
/// (e.g. `gpt-4.1-nano-2025-04-14`) while the price table is keyed by the
/// bare family name.
pub fn strip_datestamp(model: &str) -> &str {
    match DATESTAMP.find(model) {
        Some(m) => &model[..m.start()],
        None => model,
    }
}

/// Cost of `tokens` at a per-million-token price.
pub fn cost_for_tokens(tokens: i64, price_per_million: f64) -> f64 {
    (tokens as f64 / 1_000_000.0) * price_per_million
}
