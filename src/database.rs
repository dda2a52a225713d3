//! In-memory mock store.
//!
//! Collections keep insertion order so leaderboard ties resolve the same way
//! on every render. Rows are only ever appended or updated in place.

use std::collections::HashMap;

use crate::config::PointsPolicy;
use crate::error::{PortalError, PortalResult};
use crate::model::{
    Administrator, Collection, Entity, FloorCoordinator, Mentor, Student,
};

/// Longest mentor note accepted, in characters.
pub const FEEDBACK_MAX_CHARS: usize = 2000;

/// Storage seam between the view router and whatever holds the rows.
pub trait Repository {
    fn get(&self, collection: Collection, key: &str) -> Option<Entity>;

    fn list(&self, collection: Collection) -> Vec<(String, Entity)>;

    fn create(&mut self, key: &str, entity: Entity) -> PortalResult<()>;

    fn update_student(
        &mut self,
        key: &str,
        apply: &mut dyn FnMut(&mut Student) -> PortalResult<()>,
    ) -> PortalResult<()>;

    fn points_policy(&self) -> PointsPolicy;

    fn contains(&self, collection: Collection, key: &str) -> bool {
        self.get(collection, key).is_some()
    }

    fn student(&self, key: &str) -> Option<Student> {
        self.get(Collection::Students, key)
            .and_then(|e| e.as_student().cloned())
    }

    fn students(&self) -> Vec<(String, Student)> {
        self.list(Collection::Students)
            .into_iter()
            .filter_map(|(key, e)| e.as_student().cloned().map(|s| (key, s)))
            .collect()
    }

    /// Returns the student's new total.
    fn add_points(&mut self, key: &str, delta: i64) -> PortalResult<u32> {
        let policy = self.points_policy();
        if !policy.contains(delta) {
            return Err(PortalError::validation(format!(
                "Points must be between {} and {}",
                policy.min, policy.max
            )));
        }
        let mut total = 0;
        self.update_student(key, &mut |student: &mut Student| {
            let delta = u32::try_from(delta)
                .map_err(|_| PortalError::validation("Points out of range"))?;
            student.points = student.points.saturating_add(delta);
            total = student.points;
            Ok(())
        })?;
        Ok(total)
    }

    fn add_feedback(&mut self, key: &str, text: &str) -> PortalResult<()> {
        let note = text.trim();
        if note.is_empty() {
            return Err(PortalError::validation("Feedback is empty"));
        }
        if note.chars().count() > FEEDBACK_MAX_CHARS {
            return Err(PortalError::validation(format!(
                "Feedback is too long (max {} characters)",
                FEEDBACK_MAX_CHARS
            )));
        }
        self.update_student(key, &mut |student: &mut Student| {
            student.feedback.push(note.to_string());
            Ok(())
        })
    }
}

#[derive(Debug, Default, Clone)]
struct Table {
    rows: Vec<(String, Entity)>,
    index: HashMap<String, usize>,
}

impl Table {
    fn get(&self, key: &str) -> Option<&Entity> {
        self.index.get(key).map(|&i| &self.rows[i].1)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.rows[i].1),
            None => None,
        }
    }

    fn insert(&mut self, key: String, entity: Entity) {
        self.index.insert(key.clone(), self.rows.len());
        self.rows.push((key, entity));
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: HashMap<Collection, Table>,
    policy: PointsPolicy,
}

impl MemoryStore {
    pub fn empty(policy: PointsPolicy) -> Self {
        let tables = Collection::ALL
            .into_iter()
            .map(|c| (c, Table::default()))
            .collect();
        Self { tables, policy }
    }

    /// Store holding the fixed demo rows.
    pub fn seeded(policy: PointsPolicy) -> Self {
        let mut store = Self::empty(policy);
        for (key, entity) in seed_rows() {
            store.insert_unchecked(key, entity);
        }
        store
    }

    fn insert_unchecked(&mut self, key: &str, entity: Entity) {
        self.tables
            .entry(entity.collection())
            .or_default()
            .insert(key.to_string(), entity);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded(PointsPolicy::default())
    }
}

impl Repository for MemoryStore {
    fn get(&self, collection: Collection, key: &str) -> Option<Entity> {
        self.tables.get(&collection)?.get(key).cloned()
    }

    fn list(&self, collection: Collection) -> Vec<(String, Entity)> {
        self.tables
            .get(&collection)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    fn create(&mut self, key: &str, mut entity: Entity) -> PortalResult<()> {
        let key = key.trim();
        let name = entity.name().trim().to_string();
        if key.is_empty() || name.is_empty() {
            return Err(PortalError::validation("Provide key and name"));
        }
        *entity.name_mut() = name;
        let collection = entity.collection();
        if self.contains(collection, key) {
            return Err(PortalError::validation(format!(
                "User key '{}' already exists in {}",
                key, collection
            )));
        }
        self.insert_unchecked(key, entity);
        log::info!("Created {} entry '{}'", collection, key);
        Ok(())
    }

    fn update_student(
        &mut self,
        key: &str,
        apply: &mut dyn FnMut(&mut Student) -> PortalResult<()>,
    ) -> PortalResult<()> {
        let entity = self
            .tables
            .get_mut(&Collection::Students)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| PortalError::not_found(format!("Student '{}' not found", key)))?;
        match entity {
            Entity::Student(student) => {
                let mut draft = student.clone();
                apply(&mut draft)?;
                *student = draft;
                Ok(())
            }
            _ => Err(PortalError::not_found(format!("Student '{}' not found", key))),
        }
    }

    fn points_policy(&self) -> PointsPolicy {
        self.policy
    }
}

fn seed_rows() -> Vec<(&'static str, Entity)> {
    vec![
        (
            "s1",
            Entity::Student(Student {
                name: "Alice".to_string(),
                points: 450,
                floor: 'A',
                badges: vec!["Top Performer".to_string()],
                progress: 0.75,
                feedback: vec!["Great work on design".to_string()],
            }),
        ),
        (
            "s2",
            Entity::Student(Student {
                name: "Bob".to_string(),
                points: 400,
                floor: 'A',
                badges: vec!["Consistent".to_string()],
                progress: 0.6,
                feedback: vec![],
            }),
        ),
        (
            "s3",
            Entity::Student(Student {
                name: "Carol".to_string(),
                points: 350,
                floor: 'B',
                badges: vec![],
                progress: 0.45,
                feedback: vec!["Needs improvement on deadlines".to_string()],
            }),
        ),
        (
            "m1",
            Entity::Mentor(Mentor {
                name: "Dr. Rao".to_string(),
                floor: 'A',
            }),
        ),
        (
            "m2",
            Entity::Mentor(Mentor {
                name: "Ms. Iyer".to_string(),
                floor: 'B',
            }),
        ),
        (
            "fA",
            Entity::Floorwing(FloorCoordinator {
                name: "Floor A".to_string(),
            }),
        ),
        (
            "fB",
            Entity::Floorwing(FloorCoordinator {
                name: "Floor B".to_string(),
            }),
        ),
        (
            "admin",
            Entity::Admin(Administrator {
                name: "Administrator".to_string(),
            }),
        ),
    ]
}
