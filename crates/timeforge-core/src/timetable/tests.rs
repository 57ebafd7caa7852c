//! Tests for timetable mutation and index maintenance.

use super::*;
use crate::instance::InstanceBuilder;

fn instance() -> Instance {
    InstanceBuilder::new()
        .double_slot("Mo_1", 0, 1, "Mo_2")
        .slot("Mo_2", 0, 2)
        .slot("Mo_3", 0, 3)
        .slot("Tu_1", 1, 1)
        .teacher("T1", "Ada")
        .teacher("T2", "Grace")
        .class("C1", "1A")
        .class("C2", "1B")
        .event("E1", "Math", "T1", "C1", 3)
        .event("E2", "Art", "T1", "C2", 1)
        .event("E3", "Music", "T2", "C1", 1)
        .build()
        .unwrap()
}

struct Ids {
    e1: EventId,
    e2: EventId,
    e3: EventId,
    mo1: SlotId,
    mo2: SlotId,
    mo3: SlotId,
    tu1: SlotId,
    t1: TeacherId,
    c1: ClassId,
}

fn ids(instance: &Instance) -> Ids {
    Ids {
        e1: instance.event_by_name("E1").unwrap(),
        e2: instance.event_by_name("E2").unwrap(),
        e3: instance.event_by_name("E3").unwrap(),
        mo1: instance.slot_by_name("Mo_1").unwrap(),
        mo2: instance.slot_by_name("Mo_2").unwrap(),
        mo3: instance.slot_by_name("Mo_3").unwrap(),
        tu1: instance.slot_by_name("Tu_1").unwrap(),
        t1: instance.teacher_by_name("T1").unwrap(),
        c1: instance.class_by_name("C1").unwrap(),
    }
}

#[test]
fn test_place_double_updates_indexes() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);

    assert!(timetable.place(&instance, id.e1, id.mo1, 2));

    assert_eq!(timetable.allocated_duration(id.e1), 2);
    assert_eq!(timetable.double_lessons(id.e1), 1);
    assert_eq!(timetable.day_count(id.e1, 0), 1);
    assert!(!timetable.is_teacher_free(id.mo1, id.t1));
    assert!(!timetable.is_teacher_free(id.mo2, id.t1));
    assert!(!timetable.is_class_free(id.mo2, id.c1));
    assert!(timetable.is_teacher_free(id.mo3, id.t1));
    assert!(timetable.teacher_days(id.t1).unwrap().contains(&0));
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_place_rejects_illegal_double() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);

    assert!(!timetable.place(&instance, id.e1, id.mo2, 2));
    assert!(!timetable.place(&instance, EventId(99), id.mo1, 1));
    assert!(timetable.allocations().is_empty());
}

#[test]
fn test_record_unallocated_replaces_marker() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);

    timetable.place(&instance, id.e1, id.mo1, 2);
    timetable.record_unallocated(id.e1, 3);
    timetable.record_unallocated(id.e1, 1);

    assert_eq!(timetable.unallocated_duration(id.e1), 1);
    let markers = timetable
        .allocations()
        .iter()
        .filter(|a| a.slot.is_unallocated())
        .count();
    assert_eq!(markers, 1);
    assert!(timetable.check_consistency(&instance).is_ok());

    timetable.record_unallocated(id.e1, 0);
    assert_eq!(timetable.unallocated_duration(id.e1), 0);
}

#[test]
fn test_remove_event_keeps_shared_day() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);

    timetable.place(&instance, id.e1, id.mo1, 2);
    timetable.place(&instance, id.e1, id.tu1, 1);
    timetable.place(&instance, id.e2, id.mo3, 1);

    assert_eq!(timetable.remove_event(&instance, id.e1), 2);

    let days = timetable.teacher_days(id.t1).unwrap();
    assert!(days.contains(&0), "E2 still teaches on Monday");
    assert!(!days.contains(&1));
    assert_eq!(timetable.allocated_duration(id.e1), 0);
    assert_eq!(timetable.double_lessons(id.e1), 0);
    assert!(timetable.is_teacher_free(id.mo1, id.t1));
    assert!(timetable.allocations_of(id.e1).is_empty());
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_remove_one_of_two_clashing_allocations() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);

    // E1 and E2 share T1; place both at Mo_1.
    timetable.place(&instance, id.e1, id.mo1, 1);
    timetable.place(&instance, id.e2, id.mo1, 1);
    timetable.remove_event(&instance, id.e2);

    assert!(!timetable.is_teacher_free(id.mo1, id.t1));
    assert_eq!(timetable.teachers_at(id.mo1).count(), 1);
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_clone_is_independent() {
    let instance = instance();
    let id = ids(&instance);
    let mut original = Timetable::new(&instance);
    original.place(&instance, id.e3, id.mo3, 1);

    let mut copy = original.clone();
    copy.remove_event(&instance, id.e3);
    copy.place(&instance, id.e1, id.tu1, 1);

    assert_eq!(original.allocated_duration(id.e3), 1);
    assert_eq!(original.allocated_duration(id.e1), 0);
    assert_eq!(original.allocations().len(), 1);
}

#[test]
fn test_allocation_records_round_trip() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);
    timetable.place(&instance, id.e1, id.mo1, 2);
    timetable.record_unallocated(id.e1, 1);
    timetable.place(&instance, id.e3, id.mo3, 1);

    let records = timetable.to_allocations(&instance);
    assert_eq!(records[0], AllocationRecord::new("E1", Some("Mo_1"), 2));
    assert_eq!(records[1], AllocationRecord::new("E1", None, 1));

    let restored = Timetable::from_allocations(&instance, &records);
    assert_eq!(restored.to_allocations(&instance), records);
    assert!(restored.check_consistency(&instance).is_ok());
}

#[test]
fn test_from_allocations_skips_unknown_ids() {
    let instance = instance();
    let records = vec![
        AllocationRecord::new("E9", Some("Mo_1"), 1),
        AllocationRecord::new("E3", Some("Fr_9"), 1),
        AllocationRecord::new("E3", Some("Mo_3"), 1),
    ];
    let timetable = Timetable::from_allocations(&instance, &records);
    assert_eq!(timetable.allocations().len(), 1);
}

#[test]
fn test_check_consistency_reports_accounting() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);
    timetable.place(&instance, id.e1, id.tu1, 1);
    timetable.record_unallocated(id.e1, 1);

    assert!(matches!(
        timetable.check_consistency(&instance),
        Err(crate::InconsistencyError::DurationAccounting { .. })
    ));
}

#[test]
fn test_blacklist() {
    let instance = instance();
    let id = ids(&instance);
    let mut timetable = Timetable::new(&instance);
    timetable.extend_blacklist(id.e2, [id.mo1, id.tu1]);
    assert_eq!(timetable.blacklist(id.e2).unwrap().len(), 2);

    timetable.clear_blacklists();
    assert!(timetable.blacklist(id.e2).unwrap().is_empty());
}
