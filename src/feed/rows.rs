//! Normalization of leaderboard payloads into finish rows
//!
//! Payload shapes vary between endpoints and exports: a bare array, or an
//! object carrying the rows under `data`, `results` or `players`. Field names
//! vary too, so each field is read from the first alias present.

use crate::settlement::FinishRow;
use serde_json::Value;

const ROW_CONTAINERS: &[&str] = &["data", "results", "players"];
const ID_FIELDS: &[&str] = &["dg_id", "dgId", "player_dg_id", "player_id", "playerId"];
const NAME_FIELDS: &[&str] = &["player_name", "playerName", "name"];
const FINISH_FIELDS: &[&str] = &["finish_position", "finishPos", "finish", "position", "pos", "fin_text"];

fn first<'a>(row: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|f| row.get(*f))
        .find(|v| !v.is_null())
}

fn parse_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Finish text like `"T18"` or `"18"` becomes 18; `"CUT"`, `"WD"` and blanks are unknown
fn parse_finish(value: &Value) -> Option<u32> {
    let position: Option<u32> = match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => {
            let trimmed = s.trim();
            let digits = trimmed
                .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'t'))
                .unwrap_or(trimmed);
            digits.parse().ok()
        }
        _ => None,
    };
    position.filter(|pos| *pos > 0)
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "0" | "false" | "no" | "n" => Some(false),
            _ => Some(true),
        },
        _ => None,
    }
}

fn parse_cut(row: &Value) -> Option<bool> {
    if let Some(made) = first(row, &["made_cut", "madeCut"]).and_then(truthy) {
        return Some(made);
    }
    first(row, &["missed_cut", "missedCut"])
        .and_then(truthy)
        .map(|missed| !missed)
}

fn parse_row(row: &Value) -> Option<FinishRow> {
    let dg_id = first(row, ID_FIELDS).and_then(parse_id);
    let player_name = first(row, NAME_FIELDS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if dg_id.is_none() && player_name.is_none() {
        return None;
    }

    Some(FinishRow {
        dg_id,
        player_name,
        finish_position: first(row, FINISH_FIELDS).and_then(parse_finish),
        made_cut: parse_cut(row),
    })
}

/// Extract finish rows from a leaderboard payload, skipping rows without an identity
pub fn parse_rows(payload: &Value) -> Vec<FinishRow> {
    let mut candidates: Vec<&Value> = Vec::new();
    if let Some(items) = payload.as_array() {
        candidates.extend(items);
    }
    for key in ROW_CONTAINERS {
        if let Some(items) = payload.get(*key).and_then(Value::as_array) {
            candidates.extend(items);
        }
    }

    candidates.into_iter().filter_map(parse_row).collect()
}
