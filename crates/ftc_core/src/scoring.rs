//! Scoring engine
//!
//! Pure functions of the roster and the rule set. Nothing here reads the
//! field geometry, the match phase or the clock.
//!
//! A robot scores `leave_points` for leaving its start tile plus the points
//! for its base return level; the two are independent. Each alliance earns
//! its own movement Ranking Point from its own subtotal.

use serde::{Deserialize, Serialize};

use crate::robot::{Alliance, BaseReturn, Robot};
use crate::rules::RuleSet;

/// Points one robot contributes.
pub fn score(robot: &Robot, rules: &RuleSet) -> u32 {
    let leave = if robot.has_left_start { rules.leave_points() } else { 0 };
    let base = match robot.base_return {
        BaseReturn::Full => rules.base_return_full_points(),
        BaseReturn::Partial => rules.base_return_partial_points(),
        BaseReturn::None => 0,
    };
    leave + base
}

pub fn alliance_subtotal(roster: &[Robot], alliance: Alliance, rules: &RuleSet) -> u32 {
    roster
        .iter()
        .filter(|r| r.alliance == alliance)
        .map(|r| score(r, rules))
        .sum()
}

/// Sum of the subtotals of every alliance present in the roster.
pub fn total_score(roster: &[Robot], rules: &RuleSet) -> u32 {
    Alliance::ALL
        .iter()
        .filter(|&&a| roster.iter().any(|r| r.alliance == a))
        .map(|&a| alliance_subtotal(roster, a, rules))
        .sum()
}

/// Movement Ranking Point for one alliance's subtotal.
pub fn ranking_point_earned(subtotal: u32, rules: &RuleSet) -> bool {
    subtotal >= rules.movement_rp_threshold()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceScore {
    pub alliance: Alliance,
    pub subtotal: u32,
    pub ranking_point: bool,
}

/// Everything a scoreboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub alliances: Vec<AllianceScore>,
    pub total: u32,
}

impl ScoreSummary {
    pub fn compute(roster: &[Robot], rules: &RuleSet) -> Self {
        let alliances = Alliance::ALL
            .iter()
            .map(|&alliance| {
                let subtotal = alliance_subtotal(roster, alliance, rules);
                AllianceScore {
                    alliance,
                    subtotal,
                    ranking_point: ranking_point_earned(subtotal, rules),
                }
            })
            .collect();
        Self { alliances, total: total_score(roster, rules) }
    }

    pub fn alliance(&self, alliance: Alliance) -> Option<&AllianceScore> {
        self.alliances.iter().find(|a| a.alliance == alliance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TileCoord;
    use crate::rules::RuleSetDraft;

    fn robot(id: &str, alliance: Alliance, leave: bool, base: BaseReturn) -> Robot {
        Robot {
            id: id.to_string(),
            alliance,
            position: TileCoord::new(0, 0),
            has_left_start: leave,
            base_return: base,
        }
    }

    #[test]
    fn test_score_components_are_additive() {
        let rules = RuleSet::default();
        assert_eq!(score(&robot("R1", Alliance::Red, false, BaseReturn::None), &rules), 0);
        assert_eq!(score(&robot("R1", Alliance::Red, true, BaseReturn::None), &rules), 3);
        assert_eq!(score(&robot("R1", Alliance::Red, false, BaseReturn::Partial), &rules), 5);
        assert_eq!(score(&robot("R1", Alliance::Red, true, BaseReturn::Full), &rules), 13);
    }

    #[test]
    fn test_subtotal_only_counts_own_alliance() {
        let rules = RuleSet::default();
        let roster = vec![
            robot("R1", Alliance::Red, true, BaseReturn::Full),
            robot("B1", Alliance::Blue, true, BaseReturn::None),
        ];
        assert_eq!(alliance_subtotal(&roster, Alliance::Red, &rules), 13);
        assert_eq!(alliance_subtotal(&roster, Alliance::Blue, &rules), 3);
        assert_eq!(total_score(&roster, &rules), 16);
    }

    #[test]
    fn test_ranking_point_is_per_alliance_not_combined() {
        let rules = RuleSet::default();
        let roster = vec![
            robot("R1", Alliance::Red, true, BaseReturn::Full),
            robot("B1", Alliance::Blue, true, BaseReturn::None),
        ];
        let summary = ScoreSummary::compute(&roster, &rules);
        // Combined total reaches 16, but neither alliance does on its own.
        assert_eq!(summary.total, 16);
        assert!(!summary.alliance(Alliance::Red).unwrap().ranking_point);
        assert!(!summary.alliance(Alliance::Blue).unwrap().ranking_point);
    }

    #[test]
    fn test_zero_threshold_always_earns() {
        let rules = RuleSet::new(RuleSetDraft {
            movement_ranking_point_threshold: 0,
            ..RuleSetDraft::default()
        });
        assert!(ranking_point_earned(0, &rules));
    }

    #[test]
    fn test_empty_roster_scores_zero() {
        let rules = RuleSet::default();
        let summary = ScoreSummary::compute(&[], &rules);
        assert_eq!(summary.total, 0);
        assert!(summary.alliances.iter().all(|a| a.subtotal == 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn base_strategy() -> impl Strategy<Value = BaseReturn> {
            prop_oneof![
                Just(BaseReturn::None),
                Just(BaseReturn::Partial),
                Just(BaseReturn::Full),
            ]
        }

        fn rules_strategy() -> impl Strategy<Value = RuleSet> {
            (0i64..=999, 0i64..=999, 0i64..=999, 0i64..=9999).prop_map(|(l, p, f, t)| {
                RuleSet::new(RuleSetDraft {
                    grid_size: 6,
                    leave_points: l,
                    base_return_partial_points: p,
                    base_return_full_points: f,
                    movement_ranking_point_threshold: t,
                })
            })
        }

        fn roster_strategy() -> impl Strategy<Value = Vec<Robot>> {
            prop::collection::vec((any::<bool>(), any::<bool>(), base_strategy()), 0..6).prop_map(
                |entries| {
                    entries
                        .into_iter()
                        .enumerate()
                        .map(|(i, (red, leave, base))| {
                            let alliance = if red { Alliance::Red } else { Alliance::Blue };
                            robot(&format!("X{i}"), alliance, leave, base)
                        })
                        .collect()
                },
            )
        }

        proptest! {
            /// Property: leave and base return contribute independently
            #[test]
            fn prop_score_is_additive(rules in rules_strategy(), base in base_strategy()) {
                let with_leave = score(&robot("A", Alliance::Red, true, base), &rules);
                let without = score(&robot("A", Alliance::Red, false, base), &rules);
                prop_assert_eq!(with_leave, without + rules.leave_points());
                let full = score(&robot("A", Alliance::Red, true, BaseReturn::Full), &rules);
                prop_assert_eq!(full, rules.leave_points() + rules.base_return_full_points());
                prop_assert_eq!(score(&robot("A", Alliance::Red, false, BaseReturn::None), &rules), 0);
            }

            /// Property: total equals the sum of per-alliance subtotals
            #[test]
            fn prop_total_is_sum_of_subtotals(rules in rules_strategy(), roster in roster_strategy()) {
                let sum: u32 = Alliance::ALL
                    .iter()
                    .map(|&a| alliance_subtotal(&roster, a, &rules))
                    .sum();
                prop_assert_eq!(total_score(&roster, &rules), sum);
                let direct: u32 = roster.iter().map(|r| score(r, &rules)).sum();
                prop_assert_eq!(sum, direct);
            }

            /// Property: raising the subtotal never loses the Ranking Point
            #[test]
            fn prop_ranking_point_is_monotonic(
                rules in rules_strategy(),
                subtotal in 0u32..20_000,
                extra in 0u32..20_000,
            ) {
                if ranking_point_earned(subtotal, &rules) {
                    prop_assert!(ranking_point_earned(subtotal + extra, &rules));
                }
            }
        }
    }
}
