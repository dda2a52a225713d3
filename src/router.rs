//! View router.
//!
//! Pages declare the role they require as data; [`guard`] checks it once
//! before any page is rendered or any action runs. Rendering is read-only,
//! actions are the only path that mutates the store or the session.

use serde::Serialize;
use std::fmt;

use crate::analytics::{self, FloorRow, PointsBar};
use crate::auth;
use crate::config::{PointsPolicy, PortalConfig};
use crate::database::Repository;
use crate::error::{Notice, PortalError, PortalResult};
use crate::gamification::{self, BadgeInfo, BadgeSlot, LeaderboardEntry};
use crate::model::{Activity, Collection, Entity, Role};
use crate::session::Session;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Welcome,
    LoginOptions,
    LoginPage,
    StudentDashboard,
    MentorDashboard,
    FloorwingDashboard,
    AdminDashboard,
    Leaderboard,
    Achievements,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Welcome,
        Page::LoginOptions,
        Page::LoginPage,
        Page::StudentDashboard,
        Page::MentorDashboard,
        Page::FloorwingDashboard,
        Page::AdminDashboard,
        Page::Leaderboard,
        Page::Achievements,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Welcome => "welcome",
            Page::LoginOptions => "login-options",
            Page::LoginPage => "login",
            Page::StudentDashboard => "student",
            Page::MentorDashboard => "mentor",
            Page::FloorwingDashboard => "floorwing",
            Page::AdminDashboard => "admin",
            Page::Leaderboard => "leaderboard",
            Page::Achievements => "achievements",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::LoginOptions => "Login Options",
            Page::LoginPage => "Login Page",
            Page::StudentDashboard => "Student Dashboard",
            Page::MentorDashboard => "Mentor Dashboard",
            Page::FloorwingDashboard => "Floorwing Dashboard",
            Page::AdminDashboard => "Admin Dashboard",
            Page::Leaderboard => "Leaderboard",
            Page::Achievements => "Achievements",
        }
    }

    pub fn parse(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug.trim())
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Page::StudentDashboard => Some(Role::Student),
            Page::MentorDashboard => Some(Role::Mentor),
            Page::FloorwingDashboard => Some(Role::Floorwing),
            Page::AdminDashboard => Some(Role::Administrator),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectRole(Role),
    Login {
        role: Role,
        username: String,
        password: String,
    },
    Logout,
    AssignPoints {
        student: String,
        activity: Activity,
        points: i64,
    },
    SubmitFeedback {
        student: String,
        text: String,
    },
    CreateUser {
        collection: Collection,
        key: String,
        name: String,
    },
    RevealBadge {
        title: String,
    },
}

impl Action {
    /// Page the action is offered on; `None` means any page.
    pub fn page(&self) -> Option<Page> {
        match self {
            Action::SelectRole(_) => Some(Page::LoginOptions),
            Action::Login { .. } => Some(Page::LoginPage),
            Action::Logout => None,
            Action::AssignPoints { .. } | Action::SubmitFeedback { .. } => {
                Some(Page::MentorDashboard)
            }
            Action::CreateUser { .. } => Some(Page::AdminDashboard),
            Action::RevealBadge { .. } => Some(Page::Achievements),
        }
    }
}

/// Everything a request may touch, passed in explicitly.
pub struct AppContext<'a> {
    pub store: &'a mut dyn Repository,
    pub session: &'a mut Session,
    pub config: &'a PortalConfig,
}

/// Check the page's role requirement. Yields the username for protected pages.
pub fn guard<'s>(session: &'s Session, page: Page) -> PortalResult<Option<&'s str>> {
    match page.required_role() {
        None => Ok(None),
        Some(role) => session
            .identity_for(role)
            .map(Some)
            .ok_or(PortalError::Authorization { required: role }),
    }
}

pub fn navigate(session: &mut Session, page: Page) {
    session.page = page;
}

/// Run one action and report what happened as notices.
pub fn handle(ctx: &mut AppContext<'_>, action: Action) -> Vec<Notice> {
    match apply(ctx, action) {
        Ok(notices) => notices,
        Err(err) => {
            log::debug!("Action failed on {}: {}", ctx.session.page, err);
            vec![Notice::from(err)]
        }
    }
}

fn apply(ctx: &mut AppContext<'_>, action: Action) -> PortalResult<Vec<Notice>> {
    let mut actor = None;
    if let Some(page) = action.page() {
        if page != ctx.session.page {
            return Err(PortalError::validation(format!(
                "That action belongs to the {} page",
                page
            )));
        }
        actor = guard(&*ctx.session, page)?.map(str::to_string);
    }

    match action {
        Action::SelectRole(role) => {
            ctx.session.selected_role = Some(role);
            navigate(ctx.session, Page::LoginPage);
            Ok(vec![Notice::info(format!("{} login selected", role))])
        }
        Action::Login {
            role,
            username,
            password,
        } => {
            let username = username.trim();
            if !auth::authenticate(&*ctx.store, role, username, &password) {
                return Err(PortalError::Authentication);
            }
            ctx.session.log_in(role, username);
            Ok(vec![Notice::success(format!(
                "Logged in as {} ({})",
                username, role
            ))])
        }
        Action::Logout => {
            if !ctx.session.logged_in {
                return Ok(vec![Notice::info("You are not logged in")]);
            }
            ctx.session.log_out();
            Ok(vec![Notice::success("Logged out")])
        }
        Action::AssignPoints {
            student,
            activity,
            points,
        } => {
            let student = student.trim();
            if !ctx.store.contains(Collection::Students, student) {
                return Err(PortalError::not_found(format!(
                    "Student '{}' not found",
                    student
                )));
            }
            let total = ctx.store.add_points(student, points)?;
            log::info!(
                "Mentor {} awarded {} pts to {} for {} (now {})",
                actor.as_deref().unwrap_or("?"),
                points,
                student,
                activity.as_str(),
                total
            );
            Ok(vec![Notice::success(format!(
                "Added {} pts to {}",
                points, student
            ))])
        }
        Action::SubmitFeedback { student, text } => {
            ctx.store.add_feedback(student.trim(), &text)?;
            log::info!(
                "Mentor {} left feedback for {}",
                actor.as_deref().unwrap_or("?"),
                student.trim()
            );
            Ok(vec![Notice::success("Feedback submitted")])
        }
        Action::CreateUser {
            collection,
            key,
            name,
        } => {
            let entity = Entity::with_defaults(collection, name.trim());
            ctx.store.create(key.trim(), entity)?;
            Ok(vec![Notice::success("User created in demo state")])
        }
        Action::RevealBadge { title } => {
            let badge = gamification::find_badge(&title)
                .ok_or_else(|| PortalError::not_found(format!("Badge '{}' not found", title)))?;
            Ok(vec![Notice::info(format!(
                "{}: {}",
                badge.title, badge.description
            ))])
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StudentView {
    pub key: String,
    pub name: String,
    pub points: u32,
    pub progress: f64,
    pub badges: Vec<BadgeSlot>,
    pub preview: Vec<LeaderboardEntry>,
    pub feedback: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MentorView {
    pub key: String,
    pub name: String,
    /// (key, display name) in store order.
    pub students: Vec<(String, String)>,
    pub activities: Vec<Activity>,
    pub policy: PointsPolicy,
    pub chart: Vec<PointsBar>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FloorwingView {
    pub key: String,
    pub floor: char,
    pub rows: Vec<FloorRow>,
    pub approvals_note: &'static str,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ReportRow {
    pub id: String,
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AdminView {
    pub collections: Vec<Collection>,
    pub report: Vec<ReportRow>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum PageView {
    /// Guard failure or missing identity: a message and no page data.
    Blocked(Notice),
    Welcome {
        top: Vec<LeaderboardEntry>,
    },
    LoginOptions {
        roles: Vec<Role>,
        top: Vec<LeaderboardEntry>,
        milestones: Vec<&'static str>,
    },
    Login {
        roles: Vec<Role>,
        selected: Role,
        key_hint: String,
    },
    Student(StudentView),
    Mentor(MentorView),
    Floorwing(FloorwingView),
    Admin(AdminView),
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },
    Achievements {
        badges: Vec<BadgeInfo>,
    },
}

pub const APPROVALS_NOTE: &str =
    "Placeholder: approve mentor point submissions (demo does not persist approval history).";

const MILESTONES: [&str; 2] = [
    "Prototype submission due: 4th Oct",
    "Weekly quiz: UX basics (open now)",
];

/// Build the view model for the session's current page.
pub fn render(store: &dyn Repository, session: &Session, config: &PortalConfig) -> PageView {
    let page = session.page;
    let username = match guard(session, page) {
        Ok(username) => username,
        Err(err) => return PageView::Blocked(Notice::from(err)),
    };
    match render_page(store, session, username, config) {
        Ok(view) => view,
        Err(err) => PageView::Blocked(Notice::from(err)),
    }
}

fn render_page(
    store: &dyn Repository,
    session: &Session,
    username: Option<&str>,
    config: &PortalConfig,
) -> PortalResult<PageView> {
    let username = username.unwrap_or_default();
    let view = match session.page {
        Page::Welcome => PageView::Welcome {
            top: gamification::top_students(store, config.welcome_top_n),
        },
        Page::LoginOptions => PageView::LoginOptions {
            roles: Role::ALL.to_vec(),
            top: gamification::top_students(store, config.welcome_top_n),
            milestones: MILESTONES.to_vec(),
        },
        Page::LoginPage => PageView::Login {
            roles: Role::ALL.to_vec(),
            selected: session.selected_role.unwrap_or(Role::Student),
            key_hint: key_hint(store),
        },
        Page::StudentDashboard => {
            let student = store
                .student(username)
                .ok_or_else(|| PortalError::not_found("Student not found in demo data."))?;
            PageView::Student(StudentView {
                key: username.to_string(),
                badges: gamification::badge_slots(&student, config.badge_slots),
                preview: gamification::top_students(store, config.preview_top_n),
                name: student.name,
                points: student.points,
                progress: student.progress.clamp(0.0, 1.0),
                feedback: student.feedback,
            })
        }
        Page::MentorDashboard => {
            let mentor = store
                .get(Collection::Mentors, username)
                .ok_or_else(|| PortalError::not_found("Mentor not found in demo data."))?;
            PageView::Mentor(MentorView {
                key: username.to_string(),
                name: mentor.name().to_string(),
                students: store
                    .students()
                    .into_iter()
                    .map(|(k, s)| (k, s.name))
                    .collect(),
                activities: Activity::ALL.to_vec(),
                policy: store.points_policy(),
                chart: analytics::points_summary(store),
            })
        }
        Page::FloorwingDashboard => {
            // TODO: approvals are display-only until point submissions get a review queue.
            let floor = analytics::floor_for_coordinator(username);
            PageView::Floorwing(FloorwingView {
                key: username.to_string(),
                floor,
                rows: analytics::floor_performance(store, floor),
                approvals_note: APPROVALS_NOTE,
            })
        }
        Page::AdminDashboard => PageView::Admin(AdminView {
            collections: Collection::ALL.to_vec(),
            report: store
                .students()
                .into_iter()
                .map(|(id, s)| ReportRow {
                    id,
                    name: s.name,
                    points: s.points,
                })
                .collect(),
        }),
        Page::Leaderboard => PageView::Leaderboard {
            entries: gamification::leaderboard(store),
        },
        Page::Achievements => PageView::Achievements {
            badges: gamification::badge_catalog(),
        },
    };
    Ok(view)
}

fn key_hint(store: &dyn Repository) -> String {
    let keys: Vec<String> = Collection::ALL
        .into_iter()
        .flat_map(|c| store.list(c).into_iter().map(|(k, _)| k))
        .collect();
    format!("Username (use keys: {})", keys.join(", "))
}
