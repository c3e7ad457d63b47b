//! Export a game ledger to various formats

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tabula_core::{Action, ActionId, Game, Payload, ValueId, Visibility};

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// CSV format, one row per action
    Csv,
    /// Human-readable text format
    Text,
}

/// Summary counts for a ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerStats {
    pub actions: usize,
    pub creations: usize,
    pub mutations: usize,
    pub entities: usize,
    pub seconds_passed: f64,
    pub active_effects: usize,
}

impl LedgerStats {
    /// Compute stats for a game
    pub fn of(game: &Game) -> Self {
        let creations = game
            .actions()
            .iter()
            .filter(|action| action.is_creation())
            .count();
        Self {
            actions: game.actions().len(),
            creations,
            mutations: game.actions().len() - creations,
            entities: game.entities().count(),
            seconds_passed: game.timer().seconds_passed(),
            active_effects: game.timer().active_effects().count(),
        }
    }
}

/// Exporter for a game ledger
pub struct Exporter<'a> {
    game: &'a Game,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(game: &'a Game) -> Self {
        Self { game }
    }

    /// Summary counts for the ledger
    pub fn stats(&self) -> LedgerStats {
        LedgerStats::of(self.game)
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Csv => Ok(self.to_csv()),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| Error::Export(e.to_string()))?;
        Ok(())
    }

    /// Export to RON format
    pub fn to_ron(&self) -> Result<String> {
        let export = ExportData::from_game(self.game);
        ron::ser::to_string_pretty(&export, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to CSV format
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("index,timestamp,kind,action,entity,name,visibility,duration,payload\n");

        for entry in ledger_entries(self.game) {
            output.push_str(&format!(
                "{},{},{},{},{},{},{:?},{},{}\n",
                entry.index,
                entry.timestamp.to_rfc3339(),
                entry.kind,
                entry.id.raw(),
                entry.entity.raw(),
                csv_field(&entry.name),
                entry.visibility,
                entry.duration,
                csv_field(&entry.payload.to_string()),
            ));
        }

        output
    }

    /// Export to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let stats = self.stats();

        output.push_str(&format!("=== Ledger Export: {} ===\n\n", self.game.name()));
        output.push_str(&format!("Actions: {}\n", stats.actions));
        output.push_str(&format!("Creations: {}\n", stats.creations));
        output.push_str(&format!("Mutations: {}\n", stats.mutations));
        output.push_str(&format!("Entities: {}\n", stats.entities));
        output.push_str(&format!("Seconds passed: {}\n", stats.seconds_passed));
        output.push_str(&format!("Active effects: {}\n", stats.active_effects));

        output.push_str("\n=== Actions ===\n\n");
        for entry in ledger_entries(self.game) {
            let hidden = match entry.visibility {
                Visibility::Visible => "",
                Visibility::Hidden => " [hidden]",
                Visibility::GameMaster => " [gm]",
            };
            output.push_str(&format!(
                "  #{} {} {}{} -> {}\n",
                entry.index, entry.kind, entry.name, hidden, entry.payload
            ));
            output.push_str(&format!("      {}\n", entry.short_description));
        }

        output.push_str("\n=== Entities ===\n\n");
        for value in self.game.entities() {
            output.push_str(&format!("  {} = {}\n", value.name(), value.payload()));
        }

        output
    }
}

fn csv_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn ledger_entries(game: &Game) -> impl Iterator<Item = LedgerEntry> + '_ {
    game.actions()
        .iter()
        .enumerate()
        .map(|(index, action)| LedgerEntry::new(index, action))
}

/// Data structure for full ledger export
#[derive(Debug, Clone, Serialize)]
struct ExportData {
    version: u32,
    name: String,
    stats: LedgerStats,
    entries: Vec<LedgerEntry>,
}

impl ExportData {
    fn from_game(game: &Game) -> Self {
        Self {
            version: 1,
            name: game.name().to_string(),
            stats: LedgerStats::of(game),
            entries: ledger_entries(game).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct LedgerEntry {
    index: usize,
    id: ActionId,
    timestamp: DateTime<Utc>,
    kind: &'static str,
    entity: ValueId,
    name: String,
    visibility: Visibility,
    duration: f64,
    short_description: String,
    payload: Payload,
}

impl LedgerEntry {
    fn new(index: usize, action: &Action) -> Self {
        Self {
            index,
            id: action.id(),
            timestamp: action.timestamp(),
            kind: if action.is_creation() { "create" } else { "change" },
            entity: action.target(),
            name: action.name().to_string(),
            visibility: action.visibility(),
            duration: action.duration(),
            short_description: action.short_description().to_string(),
            payload: action.post_payload().clone(),
        }
    }
}
