//! Slot grid helpers.

use timeforge_core::{Day, InstanceBuilder};

const DAY_NAMES: [&str; 5] = ["Mo", "Tu", "We", "Th", "Fr"];

/// Natural id of the slot at `period` (1-based) on `day`, e.g. `"Tu_3"`.
pub fn slot_name(day: Day, period: u32) -> String {
    format!("{}_{}", DAY_NAMES[day as usize], period)
}

/// Adds `days × periods` slots to `builder`.
///
/// With `doubles`, every odd period is paired with the next one so a
/// double lesson can start there.
pub fn week(mut builder: InstanceBuilder, days: u8, periods: u32, doubles: bool) -> InstanceBuilder {
    for day in 0..days {
        for period in 1..=periods {
            let id = slot_name(day, period);
            builder = if doubles && period % 2 == 1 && period < periods {
                builder.double_slot(id, day, period, slot_name(day, period + 1))
            } else {
                builder.slot(id, day, period)
            };
        }
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_pairs_odd_periods() {
        let instance = week(InstanceBuilder::new(), 2, 5, true).build().unwrap();
        assert_eq!(instance.slot_count(), 10);

        let mo1 = instance.slot_by_name("Mo_1").unwrap();
        let mo2 = instance.slot_by_name("Mo_2").unwrap();
        let mo5 = instance.slot_by_name("Mo_5").unwrap();
        assert_eq!(instance.slot(mo1).unwrap().double_partner(), Some(mo2));
        assert_eq!(instance.slot(mo5).unwrap().double_partner(), None);
    }
}
