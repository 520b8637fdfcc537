use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How unordered node pairs that are unreachable in the induced subgraph
/// enter the pairwise-distance pool. Both conventions exist across the
/// pipeline's history, so the choice is explicit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnreachablePairPolicy {
    /// Drop unreachable pairs from the distance pool.
    Exclude,
    /// Count unreachable pairs at the maximum distance of 1.0.
    MaxDistance,
}

impl fmt::Display for UnreachablePairPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreachablePairPolicy::Exclude => write!(f, "exclude"),
            UnreachablePairPolicy::MaxDistance => write!(f, "max-distance"),
        }
    }
}

impl FromStr for UnreachablePairPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclude" => Ok(UnreachablePairPolicy::Exclude),
            "max-distance" | "max_distance" => Ok(UnreachablePairPolicy::MaxDistance),
            other => Err(format!("unknown unreachable-pair policy: {other}")),
        }
    }
}

/// Where the subject-pair distances for Rao's quadratic entropy come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaoMode {
    /// Geodesic distances on the unit's induced subgraph.
    Geodesic,
    /// Geodesic distances on the full base graph, restricted to the unit's
    /// mapped nodes as endpoints.
    Global,
    /// Direct-edge distances with fallback 1.0 when no edge exists.
    Edge,
}

impl fmt::Display for RaoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaoMode::Geodesic => write!(f, "geodesic"),
            RaoMode::Global => write!(f, "global"),
            RaoMode::Edge => write!(f, "edge"),
        }
    }
}

impl FromStr for RaoMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "geodesic" | "shortest" => Ok(RaoMode::Geodesic),
            "global" => Ok(RaoMode::Global),
            "edge" => Ok(RaoMode::Edge),
            other => Err(format!("unknown Rao mode: {other}")),
        }
    }
}

/// Logarithm base for the entropy metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogBase {
    Natural,
    Two,
}

impl LogBase {
    pub fn log(&self, x: f64) -> f64 {
        match self {
            LogBase::Natural => x.ln(),
            LogBase::Two => x.log2(),
        }
    }
}

impl FromStr for LogBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "e" | "natural" => Ok(LogBase::Natural),
            "2" | "two" => Ok(LogBase::Two),
            other => Err(format!("unknown log base: {other}")),
        }
    }
}

/// Tie-break comparator for the roster fallback lookup. The original
/// pipeline sorted semester strings bytewise, which misorders non-standard
/// term letters (a January "J" sorts between "F" and "S" lexically whether
/// or not that is chronologically right), so the comparator is exposed
/// instead of hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackOrder {
    /// Latest semester by plain string comparison.
    Lexicographic,
    /// Latest semester by (year, F < J < S) ordering.
    YearThenTerm,
}

impl FromStr for FallbackOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicographic" | "lex" => Ok(FallbackOrder::Lexicographic),
            "year-then-term" | "year_then_term" => Ok(FallbackOrder::YearThenTerm),
            other => Err(format!("unknown fallback order: {other}")),
        }
    }
}

/// All knobs for one batch run. A config is built once from CLI flags and
/// environment, then shared read-only across units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Similarity cutoff for the filtered (cohesion) view.
    pub min_similarity: f64,
    /// Optional top-K neighbor pruning applied to the base graph.
    pub keep_top_k: Option<usize>,
    pub unreachable_pairs: UnreachablePairPolicy,
    pub rao_mode: RaoMode,
    pub log_base: LogBase,
    pub fallback_order: FallbackOrder,
    /// Optional per-unit guard for pathologically large aggregates. A unit
    /// that exceeds it degrades to a NaN row; the batch continues.
    pub unit_time_budget: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.75,
            keep_top_k: None,
            unreachable_pairs: UnreachablePairPolicy::Exclude,
            rao_mode: RaoMode::Geodesic,
            log_base: LogBase::Natural,
            fallback_order: FallbackOrder::Lexicographic,
            unit_time_budget: None,
        }
    }
}
