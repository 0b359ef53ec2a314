use crate::{CohortDistribution, MoveStatRow, Thresholds, analyze};

use super::fakes::{BASE, TARGET};

fn thresholds(min_games: u64) -> Thresholds {
    Thresholds {
        min_games,
        min_win_rate_delta: 0.07,
        significance_level: 0.05,
    }
}

fn counts(band: crate::RatingBand, counts: &[(&str, u64)]) -> CohortDistribution {
    CohortDistribution::from_counts(band, counts.iter().copied())
}

#[test]
fn thin_sample_short_circuits_without_tests() {
    let base = counts(BASE, &[("e2e4", 8), ("d2d4", 1)]);
    let target = counts(TARGET, &[("c2c4", 500)]);

    let result = analyze(&base, &target, &thresholds(10));

    assert!(result.short_circuited);
    assert!(!result.frequency_significant);
    assert!(!result.win_rate_significant);
    assert!(result.frequency.is_none());
    assert!(result.win_rate.is_none());
    assert_eq!(result.base_total, 9);
    assert_eq!(result.target_total, 500);
}

#[test]
fn opposite_preferences_diverge_by_frequency() {
    let base = counts(BASE, &[("e4", 80), ("d4", 20)]);
    let target = counts(TARGET, &[("e4", 20), ("d4", 80)]);

    let result = analyze(&base, &target, &thresholds(10));
    let frequency = result.frequency.as_ref().expect("chi-square should run");

    assert!(result.frequency_significant);
    assert_eq!(frequency.degrees_of_freedom, 1);
    assert!((frequency.statistic - 72.0).abs() < 1e-9);
    assert!(frequency.p_value < 1e-10);
    assert_eq!(result.preferred_move.as_deref(), Some("d4"));
}

#[test]
fn proportional_counts_do_not_diverge() {
    let base = counts(BASE, &[("e4", 40), ("d4", 10)]);
    let target = counts(TARGET, &[("e4", 80), ("d4", 20)]);

    let result = analyze(&base, &target, &thresholds(10));
    let frequency = result.frequency.as_ref().expect("chi-square should run");

    assert!(!result.frequency_significant);
    assert!(frequency.statistic.abs() < 1e-9);
    assert!(frequency.p_value > 0.99);
}

#[test]
fn identical_distributions_do_not_diverge() {
    let rows = [
        MoveStatRow::with_outcomes("e2e4", 40, 20, 40),
        MoveStatRow::with_outcomes("d2d4", 30, 30, 20),
    ];
    let base = CohortDistribution::new(BASE, rows.clone());
    let target = CohortDistribution::new(TARGET, rows);

    let result = analyze(&base, &target, &thresholds(10));

    assert!(!result.is_divergent());
    let win_rate = result.win_rate.expect("both cohorts played the move");
    assert_eq!(win_rate.delta, 0.0);
}

#[test]
fn move_absent_from_base_is_significant_even_when_chi_square_is_not() {
    let base = counts(BASE, &[("e2e4", 10_000), ("d2d4", 10_000)]);
    let target = counts(TARGET, &[("e2e4", 10_000), ("d2d4", 10_000), ("c2c4", 5)]);

    let result = analyze(&base, &target, &thresholds(5));
    let frequency = result.frequency.as_ref().expect("chi-square should run");

    assert!(frequency.p_value > 0.05);
    assert_eq!(frequency.novel_moves, vec!["c2c4".to_string()]);
    assert!(result.frequency_significant);
    assert_eq!(result.preferred_move.as_deref(), Some("c2c4"));
    // Base never played c2c4, so there is nothing to compare win rates against.
    assert!(result.win_rate.is_none());
    assert!(!result.win_rate_significant);
}

#[test]
fn disjoint_move_sets_are_trivially_significant() {
    let base = counts(BASE, &[("e2e4", 12)]);
    let target = counts(TARGET, &[("d2d4", 12)]);

    let result = analyze(&base, &target, &thresholds(10));

    let frequency = result.frequency.as_ref().expect("chi-square should run");
    assert!(frequency.disjoint);
    assert!(result.frequency_significant);
}

#[test]
fn single_shared_move_skips_frequency_test() {
    let base = counts(BASE, &[("e2e4", 100)]);
    let target = counts(TARGET, &[("e2e4", 300)]);

    let result = analyze(&base, &target, &thresholds(10));

    assert!(result.frequency.is_none());
    assert!(!result.frequency_significant);
    assert_eq!(result.preferred_move.as_deref(), Some("e2e4"));
}

#[test]
fn small_but_significant_win_rate_gap_is_not_enough() {
    // Score 0.50 against 0.52 over 10k games each: p is well below 0.05, delta is 0.02.
    let base = CohortDistribution::new(BASE, [MoveStatRow::with_outcomes("e2e4", 4000, 2000, 4000)]);
    let target =
        CohortDistribution::new(TARGET, [MoveStatRow::with_outcomes("e2e4", 4200, 2000, 3800)]);

    let result = analyze(&base, &target, &thresholds(10));
    let win_rate = result.win_rate.as_ref().expect("win-rate test should run");

    assert!(win_rate.p_value < 0.05);
    assert!((win_rate.delta - 0.02).abs() < 1e-12);
    assert!(!result.win_rate_significant);
    assert!(!result.is_divergent());
}

#[test]
fn large_win_rate_gap_is_significant() {
    let base = CohortDistribution::new(BASE, [MoveStatRow::with_outcomes("e2e4", 300, 100, 600)]);
    let target =
        CohortDistribution::new(TARGET, [MoveStatRow::with_outcomes("e2e4", 600, 100, 300)]);

    let result = analyze(&base, &target, &thresholds(10));
    let win_rate = result.win_rate.as_ref().expect("win-rate test should run");

    assert!((win_rate.base_win_rate - 0.35).abs() < 1e-12);
    assert!((win_rate.target_win_rate - 0.65).abs() < 1e-12);
    assert!(win_rate.z > 0.0);
    assert!(result.win_rate_significant);
    assert!(!result.frequency_significant);
}

#[test]
fn zero_variance_win_rates_are_not_significant() {
    let base = CohortDistribution::new(BASE, [MoveStatRow::with_outcomes("e2e4", 50, 0, 0)]);
    let target = CohortDistribution::new(TARGET, [MoveStatRow::with_outcomes("e2e4", 80, 0, 0)]);

    let result = analyze(&base, &target, &thresholds(10));
    let win_rate = result.win_rate.as_ref().expect("win-rate test should run");

    assert_eq!(win_rate.p_value, 1.0);
    assert_eq!(win_rate.z, 0.0);
    assert!(!result.win_rate_significant);
}

#[test]
fn preferred_move_ties_break_on_target_games_then_name() {
    let base = counts(BASE, &[("a2a3", 50), ("b2b3", 50)]);
    let target = counts(TARGET, &[("a2a3", 50), ("b2b3", 50)]);

    let result = analyze(&base, &target, &thresholds(10));

    assert_eq!(result.preferred_move.as_deref(), Some("a2a3"));
}
