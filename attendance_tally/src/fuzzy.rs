//! Approximate string matching.
//!
//! The reconciler only relies on the [ApproximateMatcher] trait: ranked
//! candidates, a score cutoff, and a deterministic order among equal scores.
//! [FuzzyIndex] is the implementation used by default. It aligns the query
//! against the best fitting part of every corpus entry (edit distance with a
//! free starting point) and penalizes matches that start far from the
//! expected location. Only identical strings score 0: a query found inside a
//! longer entry scores at least [PARTIAL_MATCH_FLOOR], and among equal scores
//! the entry with the fewest unmatched characters comes first.

use log::debug;

use crate::config::MatchRules;

/// The lowest score of a match that is not an identical string.
pub const PARTIAL_MATCH_FLOOR: f64 = 0.001;

/// A corpus entry returned by a search.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct MatchCandidate {
    /// The position of the entry in the corpus.
    pub index: usize,
    /// 0 for a perfect match, larger is worse.
    pub score: f64,
}

pub trait ApproximateMatcher {
    /// Returns the entries whose score is within the threshold, best first.
    /// Entries with the same score are returned by increasing length
    /// difference with the query, then in corpus order.
    fn search(&self, query: &str) -> Vec<MatchCandidate>;
}

pub struct FuzzyIndex {
    corpus: Vec<Vec<char>>,
    threshold: f64,
    location: usize,
    distance: usize,
}

impl FuzzyIndex {
    pub fn new(corpus: Vec<String>, rules: &MatchRules) -> FuzzyIndex {
        debug!("FuzzyIndex::new: {} entries", corpus.len());
        FuzzyIndex {
            corpus: corpus.iter().map(|s| s.chars().collect()).collect(),
            threshold: rules.threshold,
            location: rules.location,
            distance: rules.distance,
        }
    }
}

impl ApproximateMatcher for FuzzyIndex {
    fn search(&self, query: &str) -> Vec<MatchCandidate> {
        let pattern: Vec<char> = query.chars().collect();
        let mut res: Vec<(MatchCandidate, usize)> = self
            .corpus
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                score_chars(&pattern, text, self.location, self.distance)
                    .filter(|score| *score <= self.threshold)
                    .map(|score| {
                        let unmatched = text.len().abs_diff(pattern.len());
                        (MatchCandidate { index, score }, unmatched)
                    })
            })
            .collect();
        // Best score first, then the closest length, then corpus order.
        res.sort_by(|(a, a_unmatched), (b, b_unmatched)| {
            a.score
                .total_cmp(&b.score)
                .then(a_unmatched.cmp(b_unmatched))
                .then(a.index.cmp(&b.index))
        });
        res.into_iter().map(|(c, _)| c).collect()
    }
}

/// Scores how well `pattern` appears in `text`.
///
/// The score is the number of edits needed to find the pattern in the text,
/// divided by the length of the pattern, plus a proximity penalty of
/// `|start - location| / distance`. Only identical strings score 0, every
/// other match scores at least [PARTIAL_MATCH_FLOOR]. Returns `None` for an
/// empty pattern, which never matches anything.
pub fn approximate_score(pattern: &str, text: &str, location: usize, distance: usize) -> Option<f64> {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    score_chars(&p, &t, location, distance)
}

fn score_chars(pattern: &[char], text: &[char], location: usize, distance: usize) -> Option<f64> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }
    if pattern == text {
        return Some(0.0);
    }

    // Column j holds, for every pattern prefix, the cheapest alignment ending
    // right before text[j] and the text position where that alignment starts.
    let mut prev_cost: Vec<usize> = (0..=m).collect();
    let mut prev_start: Vec<usize> = vec![0; m + 1];
    let mut cur_cost: Vec<usize> = vec![0; m + 1];
    let mut cur_start: Vec<usize> = vec![0; m + 1];

    // Deleting the whole pattern.
    let mut best = compute_score(m, m, 0, location, distance);

    for (j, tc) in text.iter().enumerate() {
        cur_cost[0] = 0;
        cur_start[0] = j + 1;
        for i in 1..=m {
            let substitution = prev_cost[i - 1] + usize::from(pattern[i - 1] != *tc);
            let deletion = cur_cost[i - 1] + 1;
            let insertion = prev_cost[i] + 1;
            let (cost, start) = if substitution <= deletion && substitution <= insertion {
                (substitution, prev_start[i - 1])
            } else if deletion <= insertion {
                (deletion, cur_start[i - 1])
            } else {
                (insertion, prev_start[i])
            };
            cur_cost[i] = cost;
            cur_start[i] = start;
        }
        let score = compute_score(cur_cost[m], m, cur_start[m], location, distance);
        if score < best {
            best = score;
        }
        std::mem::swap(&mut prev_cost, &mut cur_cost);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }
    Some(best.max(PARTIAL_MATCH_FLOOR))
}

fn compute_score(errors: usize, pattern_len: usize, start: usize, location: usize, distance: usize) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = start.abs_diff(location);
    if distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }
    accuracy + (proximity as f64) / (distance as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> FuzzyIndex {
        FuzzyIndex::new(
            names.iter().map(|s| s.to_string()).collect(),
            &MatchRules::DEFAULT_RULES,
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_zero() {
        assert_eq!(approximate_score("ana silva", "ana silva", 0, 100), Some(0.0));
    }

    #[test]
    fn empty_pattern_never_matches() {
        assert_eq!(approximate_score("", "ana silva", 0, 100), None);
        assert_eq!(approximate_score("", "", 0, 100), None);
        assert!(index(&["ana silva", ""]).search("").is_empty());
    }

    #[test]
    fn one_extra_space_costs_one_edit() {
        let s = approximate_score("ana  silva", "ana silva", 0, 100).unwrap();
        assert!(close(s, 0.1), "score {}", s);
        let s = approximate_score("ana silva", "ana  silva", 0, 100).unwrap();
        assert!(close(s, 1.0 / 9.0), "score {}", s);
    }

    #[test]
    fn typos_are_tolerated() {
        let s = approximate_score("bruno csota", "bruno costa", 0, 100).unwrap();
        assert!(s <= 0.4, "score {}", s);
        let s = approximate_score("joao silv", "joao silva", 0, 100).unwrap();
        assert!(s < 0.01, "score {}", s);
    }

    #[test]
    fn matches_away_from_the_location_are_penalized() {
        let s = approximate_score("silva", "ana silva", 0, 100).unwrap();
        assert!(close(s, 0.04), "score {}", s);
        let s = approximate_score("silva", "ana silva", 0, 0).unwrap();
        assert!(s > MatchRules::DEFAULT_RULES.threshold, "score {}", s);
        let s = approximate_score("silva", "ana silva", 4, 0).unwrap();
        assert!(close(s, PARTIAL_MATCH_FLOOR), "score {}", s);
    }

    #[test]
    fn unrelated_names_are_rejected() {
        let idx = index(&["ana silva", "bruno costa"]);
        assert!(idx.search("xxx unrelated name").is_empty());
        assert!(idx.search("zzz").is_empty());
    }

    #[test]
    fn results_are_ranked_by_score() {
        let idx = index(&["bruno costa", "ana silva", "ana silveira"]);
        let res = idx.search("ana silva");
        assert!(res.len() >= 2);
        assert_eq!(res[0].index, 1);
        assert!(close(res[0].score, 0.0));
        assert!(res.iter().all(|c| c.index != 0));
        assert!(res.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn equal_scores_keep_corpus_order() {
        let idx = index(&["ana silva", "bruno costa", "ana silva"]);
        let res = idx.search("ana silva");
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].index, 0);
        assert_eq!(res[1].index, 2);
    }

    #[test]
    fn whole_name_ranks_before_a_longer_name_starting_with_it() {
        assert_eq!(
            approximate_score("maria silva", "maria silva santos", 0, 100),
            Some(PARTIAL_MATCH_FLOOR)
        );
        let idx = index(&["maria silva santos", "maria silva"]);
        let res = idx.search("maria silva");
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].index, 1);
        assert!(close(res[0].score, 0.0));
        assert!(res[1].score > res[0].score);
    }

    #[test]
    fn equal_scores_prefer_the_closest_length() {
        let idx = index(&["maria silva santos", "maria silva sa", "ana"]);
        let res = idx.search("maria silva");
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].index, 1);
        assert_eq!(res[1].index, 0);
        assert!(close(res[0].score, res[1].score));
    }

    #[test]
    fn threshold_bounds_the_results() {
        let strict = MatchRules {
            threshold: 0.0,
            ..MatchRules::DEFAULT_RULES
        };
        let idx = FuzzyIndex::new(vec!["ana silva".to_string()], &strict);
        assert_eq!(idx.search("ana silva").len(), 1);
        assert!(idx.search("ana silvb").is_empty());
    }
}
