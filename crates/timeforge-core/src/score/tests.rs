//! Tests for score types.

use super::*;

#[test]
fn test_creation() {
    let score = TimetableScore::of(-2, -100);
    assert_eq!(score.hard(), -2);
    assert_eq!(score.soft(), -100);
    assert_eq!(TimetableScore::of_penalties(2, 100), score);
}

#[test]
fn test_feasibility() {
    assert!(TimetableScore::of(0, -1000).is_feasible());
    assert!(!TimetableScore::of(-1, 0).is_feasible());
}

#[test]
fn test_cost() {
    assert_eq!(TimetableScore::ZERO.cost(), 0);
    assert_eq!(TimetableScore::of(-3, -12).cost(), 3012);
}

#[test]
fn test_comparison_by_scalar_cost() {
    let infeasible = TimetableScore::of(-1, 0);
    let feasible = TimetableScore::of(0, -999);
    assert!(feasible > infeasible);

    let s1 = TimetableScore::of(0, -100);
    let s2 = TimetableScore::of(0, -50);
    assert!(s2 > s1);

    // Soft cost large enough to outweigh a hard violation.
    let heavy_soft = TimetableScore::of(0, -1500);
    assert!(infeasible > heavy_soft);
}

#[test]
fn test_arithmetic() {
    let s1 = TimetableScore::of(-1, -100);
    let s2 = TimetableScore::of(-1, -50);

    assert_eq!(s1 + s2, TimetableScore::of(-2, -150));
    assert_eq!(s1 - s2, TimetableScore::of(0, -50));
    assert_eq!(-s1, TimetableScore::of(1, 100));
}

#[test]
fn test_parse() {
    assert_eq!(
        TimetableScore::parse("0hard/-100soft").unwrap(),
        TimetableScore::of(0, -100)
    );
    assert_eq!(
        TimetableScore::parse("-1hard/0soft").unwrap(),
        TimetableScore::of(-1, 0)
    );
    assert!(TimetableScore::parse("-1hard").is_err());
    assert!(TimetableScore::parse("xhard/0soft").is_err());
}

#[test]
fn test_display() {
    let score = TimetableScore::of(-1, -100);
    assert_eq!(format!("{}", score), "-1hard/-100soft");
    assert_eq!(TimetableScore::parse(&score.to_string()).unwrap(), score);
}
