//! Single-elimination round arithmetic.
//!
//! Round 1 has `n / 2` matches; an odd candidate out gets a bye. Each round's winners
//! plus its bye form the next round's field, until one candidate is left. Every match
//! eliminates exactly one candidate, so a bracket of `n` always takes `n - 1` matches.

/// Total matches to crown a winner among `candidate_count` candidates.
pub fn total_matches(candidate_count: usize) -> usize {
    candidate_count.saturating_sub(1)
}

/// Match count of each round, in order. Sums to [`total_matches`].
pub fn rounds(candidate_count: usize) -> Vec<usize> {
    let mut rounds = Vec::new();
    let mut field = candidate_count;
    while field > 1 {
        let matches = field / 2;
        let byes = field % 2;
        rounds.push(matches);
        field = matches + byes;
    }
    rounds
}

pub fn total_rounds(candidate_count: usize) -> usize {
    rounds(candidate_count).len().max(1)
}

/// Round (1-based) that match number `match_number` (1-based) belongs to.
///
/// `0` maps to round 1; numbers past the last match map to the last round.
pub fn round_for(candidate_count: usize, match_number: usize) -> usize {
    let rounds = rounds(candidate_count);
    let mut cumulative = 0;
    for (i, matches) in rounds.iter().enumerate() {
        cumulative += matches;
        if match_number <= cumulative {
            return i + 1;
        }
    }
    rounds.len().max(1)
}

/// Number of byes handed out in each round (0 or 1 per round).
pub fn byes_per_round(candidate_count: usize) -> Vec<usize> {
    let mut byes = Vec::new();
    let mut field = candidate_count;
    while field > 1 {
        byes.push(field % 2);
        field = field / 2 + field % 2;
    }
    byes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_candidates_halve_each_round() {
        assert_eq!(rounds(8), vec![4, 2, 1]);
        assert_eq!(byes_per_round(8), vec![0, 0, 0]);
    }

    #[test]
    fn fewer_than_two_candidates_have_no_rounds() {
        assert!(rounds(0).is_empty());
        assert!(rounds(1).is_empty());
        assert_eq!(round_for(1, 1), 1);
        assert_eq!(total_matches(0), 0);
    }
}
