//! Builder that validates raw instance data and resolves lookup tables.

use std::collections::{HashMap, HashSet};

use crate::error::InstanceError;

use super::{
    ClassGroup, ClassId, ConstraintRecord, ConstraintRule, Course, CourseId, Day, Event, EventId,
    Instance, SlotId, SplitRange, Teacher, TeacherId, TimeSlot, WeightedLimit, DAYS_PER_WEEK,
};

/// Raw time slot as provided by a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlotSpec {
    pub id: String,
    pub day: Day,
    pub order: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub paired: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "default_max_duration"))]
    pub max_duration: u8,
}

#[cfg(feature = "serde")]
fn default_max_duration() -> u8 {
    1
}

/// Raw teacher or class record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSpec {
    pub id: String,
    pub name: String,
}

/// Raw event record referencing resources by natural id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSpec {
    pub id: String,
    pub course: String,
    pub teacher: String,
    pub class: String,
    pub duration: u32,
}

/// Collects raw instance data and builds a validated [`Instance`].
///
/// # Example
///
/// ```
/// use timeforge_core::{ConstraintRecord, InstanceBuilder};
///
/// let instance = InstanceBuilder::new()
///     .double_slot("Mo_1", 0, 1, "Mo_2")
///     .slot("Mo_2", 0, 2)
///     .teacher("T1", "Ada")
///     .class("C1", "1A")
///     .event("E1", "Math", "T1", "C1", 2)
///     .constraint(ConstraintRecord::cluster_busy_times("MaxDays", ["T1"], 1))
///     .build()
///     .unwrap();
///
/// let mo1 = instance.slot_by_name("Mo_1").unwrap();
/// assert_eq!(instance.slot(mo1).unwrap().double_partner(), instance.slot_by_name("Mo_2"));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceBuilder {
    #[cfg_attr(feature = "serde", serde(default))]
    pub slots: Vec<TimeSlotSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub teachers: Vec<ResourceSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub classes: Vec<ResourceSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub events: Vec<EventSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<ConstraintRecord>,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot that only hosts single periods.
    pub fn slot(mut self, id: impl Into<String>, day: Day, order: u32) -> Self {
        self.slots.push(TimeSlotSpec {
            id: id.into(),
            day,
            order,
            paired: None,
            max_duration: 1,
        });
        self
    }

    /// Adds a slot that can start a double period together with `paired`.
    pub fn double_slot(
        mut self,
        id: impl Into<String>,
        day: Day,
        order: u32,
        paired: impl Into<String>,
    ) -> Self {
        self.slots.push(TimeSlotSpec {
            id: id.into(),
            day,
            order,
            paired: Some(paired.into()),
            max_duration: 2,
        });
        self
    }

    pub fn teacher(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.teachers.push(ResourceSpec {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn class(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.classes.push(ResourceSpec {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Adds an event. Courses are registered from the events that name them.
    pub fn event(
        mut self,
        id: impl Into<String>,
        course: impl Into<String>,
        teacher: impl Into<String>,
        class: impl Into<String>,
        duration: u32,
    ) -> Self {
        self.events.push(EventSpec {
            id: id.into(),
            course: course.into(),
            teacher: teacher.into(),
            class: class.into(),
            duration,
        });
        self
    }

    pub fn constraint(mut self, record: ConstraintRecord) -> Self {
        self.constraints.push(record);
        self
    }

    /// Validates the collected data and resolves all lookup tables.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] for duplicate ids, dangling references,
    /// out-of-range days or durations, and pairs spanning two days.
    pub fn build(self) -> Result<Instance, InstanceError> {
        let slot_index = index_unique("slot", self.slots.iter().map(|s| s.id.as_str()), SlotId)?;
        let teacher_index =
            index_unique("teacher", self.teachers.iter().map(|t| t.id.as_str()), TeacherId)?;
        let class_index =
            index_unique("class", self.classes.iter().map(|c| c.id.as_str()), ClassId)?;
        let event_index =
            index_unique("event", self.events.iter().map(|e| e.id.as_str()), EventId)?;

        let mut slots = Vec::with_capacity(self.slots.len());
        for spec in &self.slots {
            if spec.day as usize >= DAYS_PER_WEEK {
                return Err(InstanceError::DayOutOfRange {
                    slot: spec.id.clone(),
                    day: spec.day,
                });
            }
            if !(1..=2).contains(&spec.max_duration) {
                return Err(InstanceError::InvalidMaxDuration {
                    slot: spec.id.clone(),
                    duration: spec.max_duration,
                });
            }
            let paired = match &spec.paired {
                Some(next) => {
                    let id = lookup(&slot_index, next, &spec.id, "slot")?;
                    if self.slots[id.0].day != spec.day {
                        return Err(InstanceError::PairAcrossDays {
                            slot: spec.id.clone(),
                            paired: next.clone(),
                        });
                    }
                    Some(id)
                }
                None => None,
            };
            slots.push(TimeSlot {
                id: spec.id.clone(),
                day: spec.day,
                order: spec.order,
                paired,
                max_duration: spec.max_duration,
            });
        }

        let mut courses: Vec<Course> = Vec::new();
        let mut course_index: HashMap<String, CourseId> = HashMap::new();
        let mut events = Vec::with_capacity(self.events.len());
        for spec in &self.events {
            if spec.duration == 0 {
                return Err(InstanceError::ZeroDuration {
                    event: spec.id.clone(),
                });
            }
            let teacher = lookup(&teacher_index, &spec.teacher, &spec.id, "teacher")?;
            let class = lookup(&class_index, &spec.class, &spec.id, "class")?;
            let course = *course_index.entry(spec.course.clone()).or_insert_with(|| {
                courses.push(Course {
                    id: spec.course.clone(),
                });
                CourseId(courses.len() - 1)
            });
            events.push(Event {
                id: spec.id.clone(),
                course,
                teacher,
                class,
                duration: spec.duration,
            });
        }

        let mut forbidden: Vec<HashSet<SlotId>> = vec![HashSet::new(); self.teachers.len()];
        let mut max_days: Vec<Option<WeightedLimit>> = vec![None; self.teachers.len()];
        let mut split_ranges: Vec<Option<SplitRange>> = vec![None; courses.len()];
        let mut idle_weights: Vec<Option<i64>> = vec![None; self.teachers.len()];

        for record in &self.constraints {
            match &record.rule {
                ConstraintRule::SplitDistribution {
                    courses: names,
                    min_doubles,
                    max_doubles,
                } => {
                    for name in names {
                        let course = lookup(&course_index, name, &record.name, "course")?;
                        split_ranges[course.0] = Some(SplitRange {
                            min: *min_doubles,
                            max: *max_doubles,
                            weight: record.weight,
                        });
                    }
                }
                ConstraintRule::ClusterBusyTimes {
                    teachers,
                    max_days: max,
                } => {
                    for name in teachers {
                        let teacher = lookup(&teacher_index, name, &record.name, "teacher")?;
                        max_days[teacher.0] = Some(WeightedLimit {
                            max: *max,
                            weight: record.weight,
                        });
                    }
                }
                ConstraintRule::AvoidUnavailableTimes {
                    teachers,
                    slots: slot_names,
                } => {
                    for name in teachers {
                        let teacher = lookup(&teacher_index, name, &record.name, "teacher")?;
                        for slot_name in slot_names {
                            let slot = lookup(&slot_index, slot_name, &record.name, "slot")?;
                            forbidden[teacher.0].insert(slot);
                        }
                    }
                }
                ConstraintRule::LimitIdleTimes { teachers } => {
                    if teachers.is_empty() {
                        idle_weights.fill(Some(record.weight));
                    }
                    for name in teachers {
                        let teacher = lookup(&teacher_index, name, &record.name, "teacher")?;
                        idle_weights[teacher.0] = Some(record.weight);
                    }
                }
            }
        }

        Ok(Instance {
            slots,
            teachers: self
                .teachers
                .into_iter()
                .map(|t| Teacher {
                    id: t.id,
                    name: t.name,
                })
                .collect(),
            classes: self
                .classes
                .into_iter()
                .map(|c| ClassGroup {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
            courses,
            events,
            constraints: self.constraints,
            slot_index,
            teacher_index,
            class_index,
            course_index,
            event_index,
            forbidden,
            max_days,
            split_ranges,
            idle_weights,
        })
    }
}

fn index_unique<'a, I>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    make: fn(usize) -> I,
) -> Result<HashMap<String, I>, InstanceError> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if index.insert(id.to_string(), make(position)).is_some() {
            return Err(InstanceError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(index)
}

fn lookup<I: Copy>(
    index: &HashMap<String, I>,
    id: &str,
    owner: &str,
    kind: &'static str,
) -> Result<I, InstanceError> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| InstanceError::UnknownReference {
            owner: owner.to_string(),
            kind,
            id: id.to_string(),
        })
}
