//! In-memory, insertion-ordered collection of workouts.

use crate::workout::{Workout, WorkoutSnapshot};
use log::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end. No deduplication.
    pub fn append(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    /// First record with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Records in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    pub fn to_snapshot(&self) -> Vec<WorkoutSnapshot> {
        self.workouts.iter().map(WorkoutSnapshot::from).collect()
    }

    /// Rebuild a store from persisted records, keeping their order.
    ///
    /// Records that fail reconstruction are skipped.
    pub fn from_snapshot(snapshots: Vec<WorkoutSnapshot>) -> Self {
        let total = snapshots.len();
        let workouts: Vec<Workout> = snapshots
            .into_iter()
            .filter_map(|snapshot| match Workout::try_from(snapshot) {
                Ok(workout) => Some(workout),
                Err(e) => {
                    warn!("Skipping stored workout: {}", e);
                    None
                }
            })
            .collect();
        debug!("Restored {} of {} stored workouts", workouts.len(), total);
        Self { workouts }
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
