//! Integration tests for collaborator wiring: store notifications, offline store, observers,
//! candidate-set changes.

use name_tournament::{
    Candidate, EngineConfig, MatchObserver, MemoryStore, RankingItem, RankingSession,
    TournamentSnapshot, VoteType,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

fn candidates(names: &[&str]) -> Vec<Candidate> {
    names.iter().map(|n| Candidate::new(*n)).collect()
}

fn session(c: Vec<Candidate>) -> RankingSession<MemoryStore> {
    RankingSession::new(c, &HashMap::new(), EngineConfig::default(), MemoryStore::new())
}

#[derive(Default)]
struct Seen {
    snapshots: Vec<TournamentSnapshot>,
    ranking: Option<Vec<RankingItem>>,
}

struct Recorder(Rc<RefCell<Seen>>);

impl MatchObserver for Recorder {
    fn on_transition(&mut self, snapshot: &TournamentSnapshot) {
        self.0.borrow_mut().snapshots.push(snapshot.clone());
    }

    fn on_complete(&mut self, ranking: &[RankingItem]) {
        self.0.borrow_mut().ranking = Some(ranking.to_vec());
    }
}

#[test]
fn every_vote_reaches_the_store() {
    let mut s = session(candidates(&["Ada", "Bo", "Cy"]));
    s.vote(VoteType::Left).unwrap();
    s.vote(VoteType::Both).unwrap();

    let store = s.store();
    assert_eq!(store.history.len(), 2);
    assert_eq!(store.history[1].vote, VoteType::Both);
    assert_eq!(store.ratings.len(), 3);
    assert_eq!(store.ratings, s.machine().ratings_by_name());
}

#[test]
fn undo_is_forwarded_to_the_store() {
    let mut s = session(candidates(&["Ada", "Bo", "Cy"]));
    s.vote(VoteType::Left).unwrap();
    s.undo().unwrap();
    assert!(s.store().history.is_empty());
    assert!(s.store().ratings.values().all(|r| r.rating == 1500.0));
}

#[test]
fn offline_store_never_rolls_back_votes() {
    let mut s = session(candidates(&["Ada", "Bo", "Cy"]));
    s.store_mut().offline = true;
    let snap = s.vote(VoteType::Right).unwrap();
    assert_eq!(snap.current_match_number, 2);
    assert_eq!(s.machine().history().len(), 1);
    assert_eq!(s.store().failures, 1);
    assert!(s.store().history.is_empty());

    s.store_mut().offline = false;
    s.vote(VoteType::Left).unwrap();
    assert!(s.machine().is_complete());
    assert_eq!(s.store().history.len(), 1);
}

#[test]
fn observers_see_each_transition_and_the_final_ranking() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let mut s = session(candidates(&["Milo", "Luna"]));
    s.add_observer(Box::new(Recorder(seen.clone())));
    s.vote(VoteType::Left).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.snapshots.len(), 2);
    assert!(!seen.snapshots[0].is_complete);
    assert!(seen.snapshots[1].is_complete);
    let ranking = seen.ranking.as_ref().unwrap();
    assert_eq!(ranking[0].name, "Milo");
}

#[test]
fn rejected_commands_do_not_notify() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let mut s = session(candidates(&["Ada", "Bo", "Cy"]));
    s.add_observer(Box::new(Recorder(seen.clone())));
    assert!(s.undo().is_err());
    assert_eq!(seen.borrow().snapshots.len(), 1);
    assert!(s.store().history.is_empty());
}

#[test]
fn same_candidates_in_new_order_keep_the_tournament() {
    let c = candidates(&["Ada", "Bo", "Cy"]);
    let mut s = session(c.clone());
    s.vote(VoteType::Left).unwrap();

    let mut reordered = c;
    reordered.rotate_left(1);
    assert!(!s.sync_candidates(reordered, &HashMap::new()));
    assert_eq!(s.machine().history().len(), 1);
}

#[test]
fn changed_candidates_start_a_new_tournament() {
    let c = candidates(&["Ada", "Bo", "Cy"]);
    let mut s = session(c.clone());
    s.vote(VoteType::Left).unwrap();

    let mut more = c;
    more.push(Candidate::new("Di"));
    assert!(s.sync_candidates(more, &HashMap::new()));
    assert!(s.machine().history().is_empty());
    assert_eq!(s.machine().total_matches(), 3);
}

#[test]
fn restart_keeps_earned_ratings() {
    let mut s = session(candidates(&["Milo", "Luna"]));
    s.vote(VoteType::Left).unwrap();
    let ratings = s.machine().ratings().clone();

    s.restart();
    assert!(!s.machine().is_complete());
    assert!(s.machine().history().is_empty());
    assert_eq!(s.machine().ratings(), &ratings);
}
