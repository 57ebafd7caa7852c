//! Tests for instance building and lookup tables.

use super::*;
use crate::error::InstanceError;

fn base() -> InstanceBuilder {
    InstanceBuilder::new()
        .double_slot("Mo_1", 0, 1, "Mo_2")
        .slot("Mo_2", 0, 2)
        .slot("Tu_1", 1, 1)
        .teacher("T1", "Ada")
        .teacher("T2", "Grace")
        .class("C1", "1A")
        .event("E1", "Math", "T1", "C1", 2)
        .event("E2", "Art", "T2", "C1", 1)
}

#[test]
fn test_build_resolves_ids() {
    let instance = base().build().unwrap();
    assert_eq!(instance.slot_count(), 3);
    assert_eq!(instance.event_count(), 2);
    assert_eq!(instance.courses().len(), 2);

    let e1 = instance.event_by_name("E1").unwrap();
    let event = instance.event(e1).unwrap();
    assert_eq!(event.teacher, instance.teacher_by_name("T1").unwrap());
    assert_eq!(event.course, instance.course_by_name("Math").unwrap());
    assert_eq!(event.duration, 2);
}

#[test]
fn test_double_partner_requires_max_duration_two() {
    let instance = base().build().unwrap();
    let mo1 = instance.slot_by_name("Mo_1").unwrap();
    let mo2 = instance.slot_by_name("Mo_2").unwrap();
    assert_eq!(instance.slot(mo1).unwrap().double_partner(), Some(mo2));
    assert_eq!(instance.slot(mo2).unwrap().double_partner(), None);
    assert_eq!(instance.covered_slots(mo1, 2), Some([Some(mo1), Some(mo2)]));
    assert_eq!(instance.covered_slots(mo2, 2), None);
}

#[test]
fn test_constraint_tables() {
    let instance = base()
        .constraint(ConstraintRecord::avoid_unavailable_times("Off", ["T1"], ["Tu_1"]))
        .constraint(ConstraintRecord::cluster_busy_times("Days", ["T2"], 1).with_weight(4))
        .constraint(ConstraintRecord::split_distribution("Split", ["Math"], 1, 1).with_weight(3))
        .constraint(ConstraintRecord::limit_idle_times("Idle", Vec::<String>::new()).with_weight(2))
        .build()
        .unwrap();

    let t1 = instance.teacher_by_name("T1").unwrap();
    let t2 = instance.teacher_by_name("T2").unwrap();
    let tu1 = instance.slot_by_name("Tu_1").unwrap();
    assert!(instance.is_forbidden(t1, tu1));
    assert!(!instance.is_forbidden(t2, tu1));

    assert_eq!(instance.max_days(t1), None);
    assert_eq!(
        instance.max_days(t2),
        Some(WeightedLimit { max: 1, weight: 4 })
    );

    let math = instance.course_by_name("Math").unwrap();
    let range = instance.split_range(math).unwrap();
    assert_eq!(range.weight, 3);
    assert_eq!(range.deviation(0), 1);
    assert!(range.contains(1));
    assert_eq!(range.deviation(3), 2);

    assert_eq!(instance.idle_weight(t1), Some(2));
    assert_eq!(instance.idle_weight(t2), Some(2));
}

#[test]
fn test_duplicate_id_rejected() {
    let err = base().slot("Mo_1", 0, 3).build().unwrap_err();
    assert_eq!(
        err,
        InstanceError::DuplicateId {
            kind: "slot",
            id: "Mo_1".to_string()
        }
    );
}

#[test]
fn test_unknown_reference_rejected() {
    let err = base()
        .event("E3", "Math", "T9", "C1", 1)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        InstanceError::UnknownReference { kind: "teacher", .. }
    ));
}

#[test]
fn test_structural_checks() {
    assert!(matches!(
        base().slot("Sa_1", 5, 1).build(),
        Err(InstanceError::DayOutOfRange { day: 5, .. })
    ));
    assert!(matches!(
        base().double_slot("Tu_2", 1, 2, "Mo_2").build(),
        Err(InstanceError::PairAcrossDays { .. })
    ));
    assert!(matches!(
        base().event("E0", "Math", "T1", "C1", 0).build(),
        Err(InstanceError::ZeroDuration { .. })
    ));
}
