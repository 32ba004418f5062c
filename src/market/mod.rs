//! Market classification
//!
//! Bet-type labels arrive as free text ("Top 20", "make_cut", "Matchup 3-Ball").
//! They are resolved once into a closed [`Market`] enum at the boundary and
//! carried as a typed value from there on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A wagering market
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Market {
    /// Finish in the top N (dead heat rules apply)
    TopN(u32),
    /// Player makes the cut
    MakeCut,
    /// Player misses the cut
    MissCut,
    /// Head-to-head matchup
    Matchup2,
    /// Three-ball matchup
    Matchup3,
    /// Anything we cannot classify; the original label is kept verbatim
    Unclassified(String),
}

/// How a market creates liability against other players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentExposure {
    /// No opponent-side exposure
    None,
    /// Every listed opponent is exposed
    Listed,
    /// The bet fades its own player
    SelfKeyed,
}

/// Lower-case, trim and collapse runs of whitespace into `_`
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

fn parse_top_n(normalized: &str) -> Option<u32> {
    for (idx, _) in normalized.match_indices("top") {
        let rest = &normalized[idx + 3..];
        let rest = rest.strip_prefix(['_', '-']).unwrap_or(rest);
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(n) = digits.parse::<u32>() {
            if n > 0 {
                return Some(n);
            }
        }
    }
    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

impl Market {
    /// Classify a free-text bet-type label
    pub fn classify(label: &str) -> Self {
        let norm = normalize_label(label);

        if let Some(n) = parse_top_n(&norm) {
            return Market::TopN(n);
        }
        if contains_any(&norm, &["make_cut", "makecut"]) {
            return Market::MakeCut;
        }
        if contains_any(&norm, &["miss_cut", "misscut"]) {
            return Market::MissCut;
        }
        if contains_any(&norm, &["matchup_3", "matchup3", "matchups_3", "3-ball", "3ball", "3_ball"]) {
            return Market::Matchup3;
        }
        if contains_any(&norm, &["matchup_2", "matchup2", "matchups_2", "2-ball", "2ball", "2_ball"]) {
            return Market::Matchup2;
        }

        Market::Unclassified(label.trim().to_string())
    }

    /// Display label, also used as the persisted form
    pub fn label(&self) -> String {
        match self {
            Market::TopN(n) => format!("Top {}", n),
            Market::MakeCut => "Make Cut".to_string(),
            Market::MissCut => "Miss Cut".to_string(),
            Market::Matchup2 => "Matchup 2-Ball".to_string(),
            Market::Matchup3 => "Matchup 3-Ball".to_string(),
            Market::Unclassified(raw) => raw.clone(),
        }
    }

    /// Opponent-side exposure created by a bet in this market
    pub fn opponent_exposure(&self) -> OpponentExposure {
        match self {
            Market::Matchup2 | Market::Matchup3 => OpponentExposure::Listed,
            Market::MissCut => OpponentExposure::SelfKeyed,
            _ => OpponentExposure::None,
        }
    }

    /// Whether this is a matchup market
    pub fn is_matchup(&self) -> bool {
        matches!(self, Market::Matchup2 | Market::Matchup3)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Market {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Market::classify(s))
    }
}

impl From<String> for Market {
    fn from(label: String) -> Self {
        Market::classify(&label)
    }
}

impl From<Market> for String {
    fn from(market: Market) -> Self {
        market.label()
    }
}
