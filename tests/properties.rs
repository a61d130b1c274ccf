//! Property-based tests for the ranking engine.
//!
//! Uses proptest to check bracket totals, pair uniqueness, the vote/undo round trip,
//! and rating conservation.

use name_tournament::bracket::{rounds, total_matches};
use name_tournament::{
    Candidate, EngineConfig, MatchStats, RatingEngine, TournamentMachine, VoteType,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn vote_from(code: u8) -> VoteType {
    match code % 4 {
        0 => VoteType::Left,
        1 => VoteType::Right,
        2 => VoteType::Both,
        _ => VoteType::Neither,
    }
}

fn machine(n: usize) -> TournamentMachine {
    let c: Vec<Candidate> = (0..n).map(|i| Candidate::new(format!("C{i}"))).collect();
    TournamentMachine::new(c, &HashMap::new(), EngineConfig::default())
}

proptest! {
    #[test]
    fn bracket_needs_n_minus_one_matches(n in 2usize..300) {
        prop_assert_eq!(total_matches(n), n - 1);
        prop_assert_eq!(rounds(n).iter().sum::<usize>(), n - 1);
    }

    #[test]
    fn no_pair_is_shown_twice(
        n in 2usize..12,
        votes in prop::collection::vec(0u8..4, 0..80)
    ) {
        let mut t = machine(n);
        let mut shown = HashSet::new();
        for code in votes {
            let m = match t.current_match() {
                Some(m) => m.clone(),
                None => break,
            };
            let key = if m.left.id < m.right.id {
                (m.left.id, m.right.id)
            } else {
                (m.right.id, m.left.id)
            };
            prop_assert!(shown.insert(key));
            t.vote(vote_from(code)).unwrap();
        }
    }

    #[test]
    fn vote_then_undo_round_trips(
        n in 3usize..10,
        prefix in prop::collection::vec(0u8..4, 0..8),
        last in 0u8..4
    ) {
        let mut t = machine(n);
        for code in prefix {
            if t.is_complete() {
                break;
            }
            t.vote(vote_from(code)).unwrap();
        }
        prop_assume!(!t.is_complete());

        let snapshot = t.snapshot();
        let ratings = t.ratings().clone();
        let entries = t.matrix().entry_count();

        t.vote(vote_from(last)).unwrap();
        prop_assume!(!t.is_complete());
        t.undo().unwrap();

        prop_assert_eq!(t.snapshot(), snapshot);
        prop_assert_eq!(t.ratings(), &ratings);
        prop_assert_eq!(t.matrix().entry_count(), entries);
    }

    #[test]
    fn decisive_votes_are_zero_sum(
        a in 900.0f64..2300.0,
        b in 900.0f64..2300.0,
        left_wins in any::<bool>()
    ) {
        let vote = if left_wins { VoteType::Left } else { VoteType::Right };
        let u = RatingEngine::default().calculate_new_ratings(a, b, vote, MatchStats::default());
        prop_assert!(((u.new_rating_a + u.new_rating_b) - (a + b)).abs() < 1e-9);
    }

    #[test]
    fn neutral_votes_are_small_and_zero_sum(
        a in 900.0f64..2300.0,
        b in 900.0f64..2300.0,
        both in any::<bool>()
    ) {
        let vote = if both { VoteType::Both } else { VoteType::Neither };
        let config = EngineConfig::default();
        let u = RatingEngine::from_config(&config)
            .calculate_new_ratings(a, b, vote, MatchStats::default());
        let bound = config.k_factor * config.neutral_scale / 2.0 + 1e-9;
        prop_assert!((u.new_rating_a - a).abs() <= bound);
        prop_assert!((u.new_rating_b - b).abs() <= bound);
        prop_assert!(((u.new_rating_a + u.new_rating_b) - (a + b)).abs() < 1e-9);
        prop_assert!((u.new_rating_a - u.new_rating_b).abs() >= (a - b).abs() - 1e-9);
        prop_assert_eq!((u.wins_a, u.losses_a, u.wins_b, u.losses_b), (0, 0, 0, 0));
    }
}
