use cohort_portal::config::PortalConfig;
use cohort_portal::database::{MemoryStore, Repository};
use cohort_portal::error::NoticeLevel;
use cohort_portal::gamification::BadgeSlot;
use cohort_portal::model::{Activity, Collection, Role};
use cohort_portal::router::{self, Action, AppContext, Page, PageView};
use cohort_portal::session::Session;
use cohort_portal::Notice;

struct Harness {
    store: MemoryStore,
    session: Session,
    config: PortalConfig,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: MemoryStore::default(),
            session: Session::default(),
            config: PortalConfig::default(),
        }
    }

    fn go(&mut self, page: Page) {
        router::navigate(&mut self.session, page);
    }

    fn act(&mut self, action: Action) -> Vec<Notice> {
        let mut ctx = AppContext {
            store: &mut self.store,
            session: &mut self.session,
            config: &self.config,
        };
        router::handle(&mut ctx, action)
    }

    fn view(&self) -> PageView {
        router::render(&self.store, &self.session, &self.config)
    }

    fn login(&mut self, role: Role, username: &str) {
        self.go(Page::LoginPage);
        let notices = self.act(Action::Login {
            role,
            username: username.to_string(),
            password: "whatever".to_string(),
        });
        assert_eq!(notices[0].level, NoticeLevel::Success, "{:?}", notices);
    }
}

fn assert_single(notices: &[Notice], level: NoticeLevel, message: &str) {
    assert_eq!(notices.len(), 1, "{:?}", notices);
    assert_eq!(notices[0].level, level);
    assert_eq!(notices[0].message, message);
}

#[test]
fn welcome_shows_top_three() {
    let h = Harness::new();
    let PageView::Welcome { top } = h.view() else {
        panic!("expected welcome view");
    };
    let names: Vec<_> = top.iter().map(|e| (e.name.as_str(), e.points)).collect();
    assert_eq!(names, vec![("Alice", 450), ("Bob", 400), ("Carol", 350)]);
}

#[test]
fn protected_pages_warn_when_logged_out() {
    let mut h = Harness::new();
    for page in Page::ALL {
        h.go(page);
        let view = h.view();
        match page.required_role() {
            Some(role) => {
                let PageView::Blocked(notice) = view else {
                    panic!("{} should be blocked", page);
                };
                assert_eq!(notice.level, NoticeLevel::Warning);
                assert!(notice.message.contains(role.as_str()));
            }
            None => assert!(!matches!(view, PageView::Blocked(_)), "{} blocked", page),
        }
    }
}

#[test]
fn student_dashboard_rejects_mentor() {
    let mut h = Harness::new();
    h.login(Role::Mentor, "m1");
    h.go(Page::StudentDashboard);
    let view = h.view();
    assert_eq!(
        view,
        PageView::Blocked(Notice::warning(
            "You must login as a Student to view this page. Go to Login Page."
        ))
    );
}

#[test]
fn student_dashboard_shows_own_data() {
    let mut h = Harness::new();
    h.login(Role::Student, "s1");
    h.go(Page::StudentDashboard);
    let PageView::Student(v) = h.view() else {
        panic!("expected student view");
    };
    assert_eq!(v.name, "Alice");
    assert_eq!(v.points, 450);
    assert_eq!(v.progress, 0.75);
    assert_eq!(v.badges.len(), 4);
    assert_eq!(v.badges[0], BadgeSlot::Earned("Top Performer".to_string()));
    assert_eq!(v.badges[3], BadgeSlot::Locked);
    assert_eq!(v.preview.len(), 3);
    assert_eq!(v.feedback, vec!["Great work on design".to_string()]);
}

#[test]
fn failed_login_leaves_session_unchanged() {
    let mut h = Harness::new();
    h.go(Page::LoginPage);
    let before = h.session.clone();
    let notices = h.act(Action::Login {
        role: Role::Student,
        username: "nope".to_string(),
        password: "s1".to_string(),
    });
    assert_single(
        &notices,
        NoticeLevel::Error,
        "Invalid credentials for demo. Use example keys shown in the placeholder text.",
    );
    assert_eq!(h.session, before);
}

#[test]
fn login_stays_on_login_page() {
    let mut h = Harness::new();
    h.go(Page::LoginPage);
    let notices = h.act(Action::Login {
        role: Role::Floorwing,
        username: " fB ".to_string(),
        password: String::new(),
    });
    assert_single(&notices, NoticeLevel::Success, "Logged in as fB (Floorwing)");
    assert_eq!(h.session.page, Page::LoginPage);
    assert_eq!(h.session.identity_for(Role::Floorwing), Some("fB"));
}

#[test]
fn select_role_opens_login_with_role_preselected() {
    let mut h = Harness::new();
    h.go(Page::LoginOptions);
    h.act(Action::SelectRole(Role::Administrator));
    assert_eq!(h.session.page, Page::LoginPage);
    assert_eq!(h.session.selected_role, Some(Role::Administrator));
    let PageView::Login { selected, key_hint, .. } = h.view() else {
        panic!("expected login view");
    };
    assert_eq!(selected, Role::Administrator);
    assert_eq!(
        key_hint,
        "Username (use keys: s1, s2, s3, m1, m2, fA, fB, admin)"
    );
}

#[test]
fn mentor_assigns_points() {
    let mut h = Harness::new();
    h.login(Role::Mentor, "m1");
    h.go(Page::MentorDashboard);
    let notices = h.act(Action::AssignPoints {
        student: "s2".to_string(),
        activity: Activity::Quiz,
        points: 10,
    });
    assert_single(&notices, NoticeLevel::Success, "Added 10 pts to s2");
    assert_eq!(h.store.student("s2").unwrap().points, 410);
    assert_eq!(h.store.student("s1").unwrap().points, 450);
    assert_eq!(h.store.student("s3").unwrap().points, 350);

    let PageView::Mentor(v) = h.view() else {
        panic!("expected mentor view");
    };
    assert_eq!(v.name, "Dr. Rao");
    assert_eq!(v.chart[1].points, 410);
}

#[test]
fn mentor_points_out_of_bounds_rejected() {
    let mut h = Harness::new();
    h.login(Role::Mentor, "m2");
    h.go(Page::MentorDashboard);
    for points in [0, -5, 101] {
        let notices = h.act(Action::AssignPoints {
            student: "s2".to_string(),
            activity: Activity::Project,
            points,
        });
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }
    assert_eq!(h.store.student("s2").unwrap().points, 400);

    let notices = h.act(Action::AssignPoints {
        student: "ghost".to_string(),
        activity: Activity::Project,
        points: 5,
    });
    assert_single(&notices, NoticeLevel::Error, "Student 'ghost' not found");
}

#[test]
fn mentor_feedback() {
    let mut h = Harness::new();
    h.login(Role::Mentor, "m1");
    h.go(Page::MentorDashboard);
    let blank = h.act(Action::SubmitFeedback {
        student: "s3".to_string(),
        text: "  ".to_string(),
    });
    assert_single(&blank, NoticeLevel::Error, "Feedback is empty");
    assert_eq!(h.store.student("s3").unwrap().feedback.len(), 1);

    let ok = h.act(Action::SubmitFeedback {
        student: "s3".to_string(),
        text: " ok ".to_string(),
    });
    assert_single(&ok, NoticeLevel::Success, "Feedback submitted");
    let feedback = h.store.student("s3").unwrap().feedback;
    assert_eq!(feedback.len(), 2);
    assert_eq!(feedback[1], "ok");
}

#[test]
fn actions_require_their_page_and_role() {
    let mut h = Harness::new();
    // logged out, on the right page
    h.go(Page::MentorDashboard);
    let notices = h.act(Action::AssignPoints {
        student: "s1".to_string(),
        activity: Activity::Quiz,
        points: 10,
    });
    assert_eq!(notices[0].level, NoticeLevel::Warning);

    // logged in, wrong page
    h.login(Role::Mentor, "m1");
    h.go(Page::Leaderboard);
    let notices = h.act(Action::AssignPoints {
        student: "s1".to_string(),
        activity: Activity::Quiz,
        points: 10,
    });
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(h.store.student("s1").unwrap().points, 450);
}

#[test]
fn floorwing_sees_own_floor() {
    let mut h = Harness::new();
    h.login(Role::Floorwing, "fB");
    h.go(Page::FloorwingDashboard);
    let PageView::Floorwing(v) = h.view() else {
        panic!("expected floorwing view");
    };
    assert_eq!(v.floor, 'B');
    assert_eq!(v.rows.len(), 1);
    assert_eq!(v.rows[0].student, "Carol");
    assert!(v.approvals_note.starts_with("Placeholder"));
}

#[test]
fn admin_creates_student_visible_everywhere() {
    let mut h = Harness::new();
    h.login(Role::Administrator, "admin");
    h.go(Page::AdminDashboard);
    let notices = h.act(Action::CreateUser {
        collection: Collection::Students,
        key: "s4".to_string(),
        name: "Dan".to_string(),
    });
    assert_single(&notices, NoticeLevel::Success, "User created in demo state");

    let dan = h.store.student("s4").unwrap();
    assert_eq!(dan.points, 0);
    assert_eq!(dan.floor, 'A');
    assert!(dan.badges.is_empty() && dan.feedback.is_empty());
    assert_eq!(dan.progress, 0.0);

    let keys: Vec<String> = h
        .store
        .list(Collection::Students)
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(keys, vec!["s1", "s2", "s3", "s4"]);

    let PageView::Admin(v) = h.view() else {
        panic!("expected admin view");
    };
    assert_eq!(v.report.last().map(|r| r.id.as_str()), Some("s4"));

    h.go(Page::Leaderboard);
    let PageView::Leaderboard { entries } = h.view() else {
        panic!("expected leaderboard view");
    };
    assert_eq!(entries.last().map(|e| e.name.as_str()), Some("Dan"));
}

#[test]
fn admin_create_requires_key_and_name() {
    let mut h = Harness::new();
    h.login(Role::Administrator, "admin");
    h.go(Page::AdminDashboard);
    let notices = h.act(Action::CreateUser {
        collection: Collection::Mentors,
        key: "m3".to_string(),
        name: "".to_string(),
    });
    assert_single(&notices, NoticeLevel::Error, "Provide key and name");
    assert!(!h.store.contains(Collection::Mentors, "m3"));
}

#[test]
fn new_mentor_can_log_in() {
    let mut h = Harness::new();
    h.login(Role::Administrator, "admin");
    h.go(Page::AdminDashboard);
    h.act(Action::CreateUser {
        collection: Collection::Mentors,
        key: "m3".to_string(),
        name: "Mr. Das".to_string(),
    });
    h.login(Role::Mentor, "m3");
    h.go(Page::MentorDashboard);
    assert!(matches!(h.view(), PageView::Mentor(_)));
}

#[test]
fn unknown_identity_is_reported_not_found() {
    let mut h = Harness::new();
    h.session.log_in(Role::Student, "s9");
    h.go(Page::StudentDashboard);
    assert_eq!(
        h.view(),
        PageView::Blocked(Notice::error("Student not found in demo data."))
    );
}

#[test]
fn achievements_reveal_badge() {
    let mut h = Harness::new();
    h.go(Page::Achievements);
    let notices = h.act(Action::RevealBadge {
        title: "Milestone Achiever".to_string(),
    });
    assert_single(
        &notices,
        NoticeLevel::Info,
        "Milestone Achiever: Completed major project milestone",
    );
    let missing = h.act(Action::RevealBadge {
        title: "Speedrunner".to_string(),
    });
    assert_eq!(missing[0].level, NoticeLevel::Error);
}

#[test]
fn logout_clears_identity() {
    let mut h = Harness::new();
    h.login(Role::Student, "s2");
    h.go(Page::StudentDashboard);
    h.act(Action::Logout);
    assert!(!h.session.logged_in);
    assert!(matches!(h.view(), PageView::Blocked(_)));
    let again = h.act(Action::Logout);
    assert_single(&again, NoticeLevel::Info, "You are not logged in");
}
