//! Player identity keys

use std::collections::HashMap;
use std::fmt;

/// Identity used to group exposure
///
/// A DataGolf id wins over a name whenever one is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    Dg(String),
    Name(String),
}

impl Identity {
    /// Identity of a bet's own player
    pub fn for_player(dg_id: Option<&str>, player_name: &str) -> Self {
        match dg_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Identity::Dg(id.to_string()),
            None => Identity::Name(player_name.trim().to_string()),
        }
    }

    /// Parse an opponent string. `dg:<id>` and `name:<name>` are honoured,
    /// anything else is a bare name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(id) = raw.strip_prefix("dg:") {
            return Identity::Dg(id.trim().to_string());
        }
        if let Some(name) = raw.strip_prefix("name:") {
            return Identity::Name(name.trim().to_string());
        }
        Identity::Name(raw.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Dg(id) => write!(f, "dg:{}", id),
            Identity::Name(name) => write!(f, "name:{}", name),
        }
    }
}

/// Case- and order-insensitive name key: "Scheffler, Scottie" and
/// "scottie scheffler" compare equal
fn name_key(name: &str) -> String {
    let name = match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.trim().to_string(),
    };
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name to DataGolf id aliases learned from a set of bets
///
/// Lets a name-keyed opponent and a dg-keyed player resolve to one key.
/// A name seen with two different ids is ambiguous and stays unresolved.
#[derive(Debug, Clone, Default)]
pub struct IdentityAliases {
    by_name: HashMap<String, Option<String>>,
}

impl IdentityAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` is the player with DataGolf id `dg_id`
    pub fn insert(&mut self, name: &str, dg_id: &str) {
        let (key, id) = (name_key(name), dg_id.trim());
        if key.is_empty() || id.is_empty() {
            return;
        }
        self.by_name
            .entry(key)
            .and_modify(|known| {
                if known.as_deref() != Some(id) {
                    *known = None;
                }
            })
            .or_insert_with(|| Some(id.to_string()));
    }

    /// Canonical key for an identity: a known name maps to its dg id
    pub fn resolve(&self, identity: Identity) -> Identity {
        match identity {
            Identity::Name(name) => match self.by_name.get(&name_key(&name)) {
                Some(Some(id)) => Identity::Dg(id.clone()),
                _ => Identity::Name(name),
            },
            dg => dg,
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.values().filter(|id| id.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a free-text opponent list ("A, B", "A vs B", "A; B") into names
pub fn parse_opponents(raw: &str) -> Vec<String> {
    raw.split([',', ';', '|'])
        .flat_map(|part| part.split(" vs "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
