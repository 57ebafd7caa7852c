//! A small feasible school.

use timeforge_core::{ConstraintRecord, Instance, InstanceBuilder};

use crate::week::week;

/// Three teachers and two classes over a five-day, four-period week with
/// double slots.
///
/// Each class needs 11 of its 20 periods, so a feasible timetable exists
/// with room to spare. Teacher `T3` is unavailable on Friday.
pub fn small_school() -> Instance {
    week(InstanceBuilder::new(), 5, 4, true)
        .teacher("T1", "Ada")
        .teacher("T2", "Grace")
        .teacher("T3", "Edsger")
        .class("C1", "1A")
        .class("C2", "1B")
        .event("E1", "Math", "T1", "C1", 4)
        .event("E2", "Math", "T1", "C2", 4)
        .event("E3", "Physics", "T2", "C1", 3)
        .event("E4", "Physics", "T2", "C2", 3)
        .event("E5", "History", "T3", "C1", 2)
        .event("E6", "History", "T3", "C2", 2)
        .event("E7", "Art", "T2", "C1", 2)
        .event("E8", "Art", "T3", "C2", 2)
        .constraint(ConstraintRecord::avoid_unavailable_times(
            "T3 Friday",
            ["T3"],
            ["Fr_1", "Fr_2", "Fr_3", "Fr_4"],
        ))
        .constraint(ConstraintRecord::split_distribution("Math doubles", ["Math"], 1, 2).with_weight(2))
        .constraint(ConstraintRecord::cluster_busy_times("T2 days", ["T2"], 4))
        .constraint(ConstraintRecord::limit_idle_times("Idle", Vec::<String>::new()))
        .build()
        .expect("valid fixture")
}
