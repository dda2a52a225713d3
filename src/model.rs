use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Student {
    pub name: String,
    pub points: u32,
    pub floor: char,
    pub badges: Vec<String>,
    // TODO: no action mutates progress yet; decide whether mentors should set it.
    pub progress: f64,
    pub feedback: Vec<String>,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: 0,
            floor: DEFAULT_FLOOR,
            badges: Vec::new(),
            progress: 0.0,
            feedback: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Mentor {
    pub name: String,
    pub floor: char,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FloorCoordinator {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Administrator {
    pub name: String,
}

pub const DEFAULT_FLOOR: char = 'A';

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Student(Student),
    Mentor(Mentor),
    Floorwing(FloorCoordinator),
    Admin(Administrator),
}

impl Entity {
    /// Defaults used when an administrator creates a user.
    pub fn with_defaults(collection: Collection, name: impl Into<String>) -> Self {
        let name = name.into();
        match collection {
            Collection::Students => Entity::Student(Student::new(name)),
            Collection::Mentors => Entity::Mentor(Mentor {
                name,
                floor: DEFAULT_FLOOR,
            }),
            Collection::Floorwings => Entity::Floorwing(FloorCoordinator { name }),
            Collection::Admins => Entity::Admin(Administrator { name }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Student(s) => &s.name,
            Entity::Mentor(m) => &m.name,
            Entity::Floorwing(f) => &f.name,
            Entity::Admin(a) => &a.name,
        }
    }

    pub fn name_mut(&mut self) -> &mut String {
        match self {
            Entity::Student(s) => &mut s.name,
            Entity::Mentor(m) => &mut m.name,
            Entity::Floorwing(f) => &mut f.name,
            Entity::Admin(a) => &mut a.name,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Entity::Student(_) => Collection::Students,
            Entity::Mentor(_) => Collection::Mentors,
            Entity::Floorwing(_) => Collection::Floorwings,
            Entity::Admin(_) => Collection::Admins,
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Entity::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mentor(&self) -> Option<&Mentor> {
        match self {
            Entity::Mentor(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Students,
    Mentors,
    Floorwings,
    Admins,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Mentors,
        Collection::Floorwings,
        Collection::Admins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Mentors => "mentors",
            Collection::Floorwings => "floorwings",
            Collection::Admins => "admins",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw.trim())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Mentor,
    Floorwing,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Mentor, Role::Floorwing, Role::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Mentor => "Mentor",
            Role::Floorwing => "Floorwing",
            Role::Administrator => "Administrator",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == raw.trim())
    }

    /// The collection a username must belong to for this role.
    pub fn collection(&self) -> Collection {
        match self {
            Role::Student => Collection::Students,
            Role::Mentor => Collection::Mentors,
            Role::Floorwing => Collection::Floorwings,
            Role::Administrator => Collection::Admins,
        }
    }

    pub fn login_label(&self) -> &'static str {
        match self {
            Role::Student => "Student Login 👩‍🎓",
            Role::Mentor => "Mentor Login 👨‍🏫",
            Role::Floorwing => "Floorwing Login 🏢",
            Role::Administrator => "Administrator Login 🛠️",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a mentor is scoring. Shown in the form, not stored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Quiz,
    Project,
    PeerReview,
    Attendance,
}

impl Activity {
    pub const ALL: [Activity; 4] = [
        Activity::Quiz,
        Activity::Project,
        Activity::PeerReview,
        Activity::Attendance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Quiz => "Quiz",
            Activity::Project => "Project",
            Activity::PeerReview => "Peer Review",
            Activity::Attendance => "Attendance",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == raw.trim())
    }
}
