//! Integration tests for the Elo update: decisive and neutral outcomes, counters, clamping.

use name_tournament::{EngineConfig, MatchStats, Rating, RatingEngine, VoteType};

fn engine() -> RatingEngine {
    RatingEngine::default()
}

#[test]
fn left_win_between_equals_moves_half_k() {
    let u = engine().calculate_new_ratings(1500.0, 1500.0, VoteType::Left, MatchStats::default());
    assert!((u.new_rating_a - 1516.0).abs() < 1e-9);
    assert!((u.new_rating_b - 1484.0).abs() < 1e-9);
    assert_eq!((u.wins_a, u.losses_a, u.wins_b, u.losses_b), (1, 0, 0, 1));
}

#[test]
fn right_win_mirrors_left_win() {
    let u = engine().calculate_new_ratings(1500.0, 1500.0, VoteType::Right, MatchStats::default());
    assert!((u.new_rating_a - 1484.0).abs() < 1e-9);
    assert!((u.new_rating_b - 1516.0).abs() < 1e-9);
    assert_eq!((u.wins_a, u.losses_a, u.wins_b, u.losses_b), (0, 1, 1, 0));
}

#[test]
fn upset_win_moves_more_points() {
    let favourite = engine().calculate_new_ratings(1700.0, 1500.0, VoteType::Left, MatchStats::default());
    let upset = engine().calculate_new_ratings(1700.0, 1500.0, VoteType::Right, MatchStats::default());
    let favourite_gain = favourite.new_rating_a - 1700.0;
    let upset_gain = upset.new_rating_b - 1500.0;
    assert!(upset_gain > favourite_gain);
}

#[test]
fn neutral_between_equals_changes_nothing() {
    for vote in [VoteType::Both, VoteType::Neither] {
        let stats = MatchStats {
            wins_a: 2,
            losses_a: 1,
            wins_b: 0,
            losses_b: 3,
        };
        let u = engine().calculate_new_ratings(1500.0, 1500.0, vote, stats);
        assert_eq!(u.new_rating_a, 1500.0);
        assert_eq!(u.new_rating_b, 1500.0);
        assert_eq!((u.wins_a, u.losses_a, u.wins_b, u.losses_b), (2, 1, 0, 3));
    }
}

#[test]
fn neutral_is_small_and_widens_the_gap() {
    let u = engine().calculate_new_ratings(1600.0, 1400.0, VoteType::Both, MatchStats::default());
    assert!(u.new_rating_a > 1600.0);
    assert!(u.new_rating_b < 1400.0);
    // K * neutral_scale / 2 with the defaults
    assert!(u.new_rating_a - 1600.0 <= 1.6);
    assert!(((u.new_rating_a + u.new_rating_b) - 3000.0).abs() < 1e-9);

    let u = engine().calculate_new_ratings(1400.0, 1600.0, VoteType::Neither, MatchStats::default());
    assert!(u.new_rating_a < 1400.0);
    assert!(u.new_rating_b > 1600.0);
}

#[test]
fn repeated_neutral_votes_drift_slowly_within_bounds() {
    let e = engine();
    let (mut a, mut b) = (1600.0, 1400.0);
    for _ in 0..1000 {
        let u = e.calculate_new_ratings(a, b, VoteType::Neither, MatchStats::default());
        assert!(u.new_rating_a >= a && u.new_rating_a - a <= 1.6);
        assert!(u.new_rating_b <= b && b - u.new_rating_b <= 1.6);
        a = u.new_rating_a;
        b = u.new_rating_b;
    }
    assert!(a > 1600.0 && a <= 2400.0);
    assert!(b < 1400.0 && b >= 800.0);
}

#[test]
fn output_is_clamped_to_configured_range() {
    let u = engine().calculate_new_ratings(805.0, 805.0, VoteType::Right, MatchStats::default());
    assert_eq!(u.new_rating_a, 800.0);
    assert!((u.new_rating_b - 821.0).abs() < 1e-9);

    let u = engine().calculate_new_ratings(2395.0, 2395.0, VoteType::Left, MatchStats::default());
    assert_eq!(u.new_rating_a, 2400.0);
}

#[test]
fn k_factor_comes_from_config() {
    let config = EngineConfig {
        k_factor: 64.0,
        ..EngineConfig::default()
    };
    let e = RatingEngine::from_config(&config);
    let u = e.calculate_new_ratings(1500.0, 1500.0, VoteType::Left, MatchStats::default());
    assert!((u.new_rating_a - 1532.0).abs() < 1e-9);
}

#[test]
fn apply_carries_counters_on_ratings() {
    let left = Rating {
        rating: 1500.0,
        wins: 3,
        losses: 1,
    };
    let right = Rating::default();
    let (l, r) = engine().apply(&left, &right, VoteType::Left);
    assert_eq!((l.wins, l.losses), (4, 1));
    assert_eq!((r.wins, r.losses), (0, 1));
    assert!(l.rating > 1500.0 && r.rating < 1500.0);
}
