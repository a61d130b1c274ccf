//! Interactive terminal front-end: rank the names in a CSV file by answering pairwise questions.
//! Run with: cargo run --bin rank -- candidates.csv [ratings.json]
//! Ratings and history are written to ratings.json by default; override with env RANKER_STORE.
//! Engine tuning comes from RANKER_* env vars (see EngineConfig::from_env).

use name_tournament::{
    seeds_from_json, Candidate, EngineConfig, MatchObserver, MatchRecord, RankingItem,
    RankingSession, Rating, RatingSeed, RatingStore, StoreError, TournamentSnapshot, VoteType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

const DEFAULT_STORE_PATH: &str = "ratings.json";

/// One row of the candidates CSV.
#[derive(Deserialize)]
struct CandidateRow {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    id: Option<Uuid>,
}

/// What the JSON store file holds.
#[derive(Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    ratings: HashMap<String, Rating>,
    #[serde(default)]
    history: Vec<MatchRecord>,
}

/// Writes the whole state to one JSON file after every vote or undo.
struct JsonFileStore {
    path: PathBuf,
    state: StoredState,
}

impl JsonFileStore {
    /// Open the store, keeping any history already in the file.
    fn open(path: PathBuf) -> Self {
        let state = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { path, state }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.state)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl RatingStore for JsonFileStore {
    fn persist_vote(
        &mut self,
        ratings: &HashMap<String, Rating>,
        record: &MatchRecord,
    ) -> Result<(), StoreError> {
        self.state.ratings = ratings.clone();
        self.state.history.push(record.clone());
        self.flush()
    }

    fn persist_undo(
        &mut self,
        ratings: &HashMap<String, Rating>,
        removed: &MatchRecord,
    ) -> Result<(), StoreError> {
        self.state.ratings = ratings.clone();
        self.state.history.retain(|r| r.id != removed.id);
        self.flush()
    }
}

/// Prints the current match, or the final ranking.
struct TerminalView;

impl MatchObserver for TerminalView {
    fn on_transition(&mut self, snapshot: &TournamentSnapshot) {
        if snapshot.is_error {
            println!("Need at least two distinct names to run a tournament.");
            return;
        }
        if let Some(m) = &snapshot.current_match {
            println!();
            println!(
                "Round {} - match {}/{}",
                snapshot.round_number, snapshot.current_match_number, snapshot.total_matches
            );
            println!("  [1] {}", describe(&m.left));
            println!("  [2] {}", describe(&m.right));
            let undo = if snapshot.can_undo { ", u = undo" } else { "" };
            println!("  1/l = left, 2/r = right, b = both, n = neither{}, q = quit", undo);
        }
    }

    fn on_complete(&mut self, ranking: &[RankingItem]) {
        print_ranking(ranking);
    }
}

fn describe(candidate: &Candidate) -> String {
    match &candidate.description {
        Some(d) => format!("{} ({})", candidate.name, d),
        None => candidate.name.clone(),
    }
}

fn print_ranking(ranking: &[RankingItem]) {
    println!();
    println!("=== Ranking ===");
    println!("{:<4} {:<30} {:>8} {:>5} {:>5}", "#", "Name", "Rating", "W", "L");
    println!("{}", "-".repeat(56));
    for (i, item) in ranking.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:>8.1} {:>5} {:>5}",
            i + 1,
            item.name,
            item.rating,
            item.wins,
            item.losses
        );
    }
}

fn load_candidates(path: &str) -> Result<Vec<Candidate>, String> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
    let mut candidates = Vec::new();
    for row in reader.deserialize::<CandidateRow>() {
        let row = row.map_err(|e| format!("Bad row in {}: {}", path, e))?;
        let name = row.name.trim();
        if name.is_empty() {
            continue;
        }
        let mut candidate = match row.id {
            Some(id) => Candidate::with_id(id, name),
            None => Candidate::new(name),
        };
        if let Some(d) = row.description.filter(|d| !d.trim().is_empty()) {
            candidate = candidate.with_description(d.trim());
        }
        candidates.push(candidate);
    }
    Ok(candidates)
}

fn load_seeds(path: &str) -> Result<HashMap<String, RatingSeed>, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    seeds_from_json(&text).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "l" | "left" => Some(Command::Vote(VoteType::Left)),
        "2" | "r" | "right" => Some(Command::Vote(VoteType::Right)),
        "b" | "both" => Some(Command::Vote(VoteType::Both)),
        "n" | "neither" | "none" => Some(Command::Vote(VoteType::Neither)),
        "u" | "undo" => Some(Command::Undo),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

enum Command {
    Vote(VoteType),
    Undo,
    Quit,
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let candidates_path = args
        .first()
        .ok_or_else(|| "usage: rank <candidates.csv> [ratings.json]".to_string())?;
    let candidates = load_candidates(candidates_path)?;
    let seeds = match args.get(1) {
        Some(path) => load_seeds(path)?,
        None => HashMap::new(),
    };

    let config = EngineConfig::from_env();
    config.validate().map_err(|e| e.to_string())?;
    let store_path =
        std::env::var("RANKER_STORE").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    log::info!(
        "Ranking {} candidates, saving to {}",
        candidates.len(),
        store_path
    );

    let store = JsonFileStore::open(PathBuf::from(store_path));
    let mut session = RankingSession::new(candidates, &seeds, config, store);
    session.add_observer(Box::new(TerminalView));
    if session.machine().is_error() {
        return Err("not enough candidates".to_string());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.machine().is_complete() {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let line = match lines.next() {
            Some(line) => line.map_err(|e| e.to_string())?,
            None => break,
        };
        match parse_command(&line) {
            Some(Command::Vote(vote)) => {
                if let Err(e) = session.vote(vote) {
                    println!("{}", e);
                }
            }
            Some(Command::Undo) => {
                if let Err(e) = session.undo() {
                    println!("{}", e);
                }
            }
            Some(Command::Quit) => break,
            None => println!("Unknown input {:?}", line.trim()),
        }
    }

    if !session.machine().is_complete() {
        println!("Stopped early; standings so far:");
        print_ranking(&session.machine().ranking());
    }
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
