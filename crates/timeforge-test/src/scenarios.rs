//! Minimal instances, each isolating one behavior.

use timeforge_core::{ConstraintRecord, Instance, InstanceBuilder};

use crate::week::{slot_name, week};

/// One teacher, one class, one event of duration 2, five single slots on
/// Monday. No double can be placed and only one lesson fits per day.
pub fn no_double_slots() -> Instance {
    week(InstanceBuilder::new(), 1, 5, false)
        .teacher("T1", "Ada")
        .class("C1", "1A")
        .event("E1", "Math", "T1", "C1", 2)
        .build()
        .expect("valid fixture")
}

/// Two single-period events of one teacher, forbidden everywhere except
/// `Mo_1`.
pub fn shared_forbidden_slot() -> Instance {
    let forbidden: Vec<String> = (1..=4)
        .map(|p| slot_name(0, p))
        .filter(|s| s != "Mo_1")
        .collect();
    week(InstanceBuilder::new(), 1, 4, false)
        .teacher("T1", "Ada")
        .class("C1", "1A")
        .class("C2", "1B")
        .event("E1", "Math", "T1", "C1", 1)
        .event("E2", "Math", "T1", "C2", 1)
        .constraint(ConstraintRecord::avoid_unavailable_times(
            "Unavailable",
            ["T1"],
            forbidden,
        ))
        .build()
        .expect("valid fixture")
}

/// A single event of duration 2 with a free week of single slots.
pub fn two_day_event() -> Instance {
    week(InstanceBuilder::new(), 5, 4, false)
        .teacher("T1", "Ada")
        .class("C1", "1A")
        .event("E1", "Math", "T1", "C1", 2)
        .build()
        .expect("valid fixture")
}

/// One teacher with lessons on Monday periods 1 and 3, capped at one day and
/// limited on idle time, with a course that wants exactly one double.
pub fn soft_penalties() -> Instance {
    week(InstanceBuilder::new(), 2, 4, true)
        .teacher("T1", "Ada")
        .class("C1", "1A")
        .event("E1", "Math", "T1", "C1", 2)
        .event("E2", "Art", "T1", "C1", 1)
        .constraint(ConstraintRecord::split_distribution("Split", ["Math"], 1, 1).with_weight(3))
        .constraint(ConstraintRecord::cluster_busy_times("Days", ["T1"], 1).with_weight(5))
        .constraint(ConstraintRecord::limit_idle_times("Idle", ["T1"]).with_weight(2))
        .build()
        .expect("valid fixture")
}
