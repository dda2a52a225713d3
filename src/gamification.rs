use serde::{Deserialize, Serialize};

use crate::database::Repository;
use crate::model::Student;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub key: String,
    pub name: String,
    pub points: u32,
    pub floor: char,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BadgeInfo {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum BadgeSlot {
    Earned(String),
    Locked,
}

/// All students ranked by points, highest first. Ties keep store order.
pub fn leaderboard(store: &dyn Repository) -> Vec<LeaderboardEntry> {
    let mut students = store.students();
    // sort_by is stable, which is what keeps ties in insertion order
    students.sort_by(|a, b| b.1.points.cmp(&a.1.points));
    students
        .into_iter()
        .enumerate()
        .map(|(i, (key, s))| LeaderboardEntry {
            rank: i + 1,
            key,
            name: s.name,
            points: s.points,
            floor: s.floor,
        })
        .collect()
}

pub fn top_students(store: &dyn Repository, n: usize) -> Vec<LeaderboardEntry> {
    let mut board = leaderboard(store);
    board.truncate(n);
    board
}

pub fn badge_catalog() -> Vec<BadgeInfo> {
    [
        ("Top Performer", "Top 3 in leaderboard this month"),
        ("Consistent", "Participated 4 weeks in a row"),
        ("Milestone Achiever", "Completed major project milestone"),
    ]
    .into_iter()
    .map(|(title, description)| BadgeInfo {
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}

pub fn find_badge(title: &str) -> Option<BadgeInfo> {
    badge_catalog().into_iter().find(|b| b.title == title.trim())
}

/// Fixed number of slots: earned badges first, the rest locked.
pub fn badge_slots(student: &Student, slots: usize) -> Vec<BadgeSlot> {
    (0..slots)
        .map(|i| match student.badges.get(i) {
            Some(title) => BadgeSlot::Earned(title.clone()),
            None => BadgeSlot::Locked,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::model::{Collection, Entity};

    fn names(entries: &[LeaderboardEntry]) -> Vec<(&str, u32)> {
        entries.iter().map(|e| (e.name.as_str(), e.points)).collect()
    }

    #[test]
    fn test_top_three_on_seed() {
        let store = MemoryStore::default();
        let top = top_students(&store, 3);
        assert_eq!(names(&top), vec![("Alice", 450), ("Bob", 400), ("Carol", 350)]);
        assert_eq!(top.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_n_larger_than_collection() {
        let store = MemoryStore::default();
        assert_eq!(top_students(&store, 5).len(), 3);
        assert!(top_students(&store, 0).is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = MemoryStore::default();
        store.create("s4", Entity::with_defaults(Collection::Students, "Dan")).unwrap();
        store.create("s5", Entity::with_defaults(Collection::Students, "Eve")).unwrap();
        store.add_points("s5", 50).unwrap();
        store.add_points("s4", 50).unwrap();
        // Bob catches Alice: 400 + 50 = 450
        store.add_points("s2", 50).unwrap();

        let board = leaderboard(&store);
        assert_eq!(
            names(&board),
            vec![("Alice", 450), ("Bob", 450), ("Carol", 350), ("Dan", 50), ("Eve", 50)]
        );
    }

    #[test]
    fn test_badge_slots() {
        let store = MemoryStore::default();
        let alice = store.student("s1").unwrap();
        let slots = badge_slots(&alice, 4);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], BadgeSlot::Earned("Top Performer".to_string()));
        assert!(slots[1..].iter().all(|s| *s == BadgeSlot::Locked));

        let carol = store.student("s3").unwrap();
        assert!(badge_slots(&carol, 4).iter().all(|s| *s == BadgeSlot::Locked));
    }

    #[test]
    fn test_badge_lookup() {
        assert_eq!(badge_catalog().len(), 3);
        let badge = find_badge("Consistent").unwrap();
        assert_eq!(badge.description, "Participated 4 weeks in a row");
        assert!(find_badge("Unknown").is_none());
    }
}
