//! HTML rendering for page views.

use std::fmt::Write;

use crate::assistant;
use crate::error::{Notice, NoticeLevel};
use crate::gamification::{BadgeSlot, LeaderboardEntry};
use crate::report::REPORT_FILE_NAME;
use crate::router::{AdminView, FloorwingView, MentorView, Page, PageView, StudentView};
use crate::session::Session;

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 0; display: flex; min-height: 100vh; }
    nav { width: 220px; background: #f0f2f6; padding: 20px; }
    nav label { display: block; margin: 6px 0; }
    main { flex: 1; max-width: 900px; padding: 20px 40px; }
    .notice { margin: 10px 0; padding: 12px; border-radius: 5px; }
    .success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
    .error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
    .warning { background: #fff3cd; color: #856404; border: 1px solid #ffeaa7; }
    .info { background: #d1ecf1; color: #0c5460; border: 1px solid #bee5eb; }
    .columns { display: flex; gap: 20px; }
    .columns > div { flex: 1; }
    .metric { font-size: 32px; margin: 0; }
    .badges { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; }
    .bar { background: #007bff; color: white; padding: 4px 8px; margin: 4px 0; white-space: nowrap; }
    table { width: 100%; border-collapse: collapse; margin: 15px 0; }
    th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }
    th { background: #f8f9fa; }
    button { background: #007bff; color: white; padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer; margin: 4px; }
    button:disabled { background: #adb5bd; cursor: default; }
    input, select, textarea { width: 100%; padding: 8px; margin: 4px 0 10px; box-sizing: border-box; }
    pre { background: #f5f5f5; padding: 12px; border-radius: 5px; overflow-x: auto; }
"#;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

fn notice_html(notice: &Notice) -> String {
    format!(
        "<div class=\"notice {}\">{}</div>\n",
        notice_class(notice.level),
        escape(&notice.message)
    )
}

/// Full HTML document: navigation, notices, page body and footer.
pub fn document(session: &Session, view: &PageView, notices: &[Notice]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>SNS Cohort Hackathon Portal - {}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape(session.page.title()),
        STYLE
    );
    html.push_str(&sidebar(session));
    html.push_str("<main>\n");
    for notice in notices {
        html.push_str(&notice_html(notice));
    }
    html.push_str(&body(view));
    html.push_str(&footer());
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn sidebar(session: &Session) -> String {
    let mut html = String::from("<nav>\n<h2>Navigate</h2>\n<form method=\"post\" action=\"/navigate\">\n<p>Go to</p>\n");
    for page in Page::ALL {
        let checked = if page == session.page { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"page\" value=\"{}\"{}> {}</label>",
            page.slug(),
            checked,
            escape(page.title())
        );
    }
    html.push_str("<button type=\"submit\">Go</button>\n</form>\n");
    if let (true, Some(role), Some(username)) =
        (session.logged_in, session.role, session.username.as_deref())
    {
        let _ = write!(
            html,
            "<p>Signed in as <strong>{}</strong> ({})</p>\n\
             <form method=\"post\" action=\"/action\">\
             <input type=\"hidden\" name=\"action\" value=\"logout\">\
             <button type=\"submit\">Logout</button></form>\n",
            escape(username),
            role
        );
    }
    html.push_str("</nav>\n");
    html
}

fn ranked_list(entries: &[LeaderboardEntry]) -> String {
    let mut html = String::from("<ol>\n");
    for e in entries {
        let _ = writeln!(html, "<li>{} — {} pts</li>", escape(&e.name), e.points);
    }
    html.push_str("</ol>\n");
    html
}

fn action_form(action: &str, fields: &str, label: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/action\">\
         <input type=\"hidden\" name=\"action\" value=\"{}\">{}\
         <button type=\"submit\">{}</button></form>\n",
        action,
        fields,
        escape(label)
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
        name,
        escape(value)
    )
}

fn options<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>, selected: Option<&str>) -> String {
    let mut html = String::new();
    for (value, label) in items {
        let sel = if Some(value) == selected { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            sel,
            escape(label)
        );
    }
    html
}

pub fn body(view: &PageView) -> String {
    match view {
        PageView::Blocked(_) => String::new(),
        PageView::Welcome { top } => {
            let mut html = String::from(
                "<h1>Welcome to SNS Cohort Hackathon Portal</h1>\n\
                 <p><strong>Gamify your learning. Earn points. Unlock achievements.</strong></p>\n\
                 <div class=\"columns\"><div>\n<p><strong>How it works</strong></p>\n<ul>\n\
                 <li>Earn points through activities and mentor scoring.</li>\n\
                 <li>Unlock badges and climb the leaderboard.</li>\n\
                 <li>Role-based dashboards for students, mentors, floor coordinators and admins.</li>\n\
                 </ul></div>\n<div class=\"info notice\">Gamified Learning</div></div>\n<hr>\n\
                 <h3>Top students snapshot</h3>\n",
            );
            html.push_str(&ranked_list(top));
            html
        }
        PageView::LoginOptions {
            roles,
            top,
            milestones,
        } => {
            let mut html = String::from("<h1>Choose Login Role</h1>\n<div class=\"columns\">\n");
            for role in roles {
                html.push_str("<div>");
                html.push_str(&action_form(
                    "select_role",
                    &hidden("role", role.as_str()),
                    role.login_label(),
                ));
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n<hr>\n<h3>Leaderboard Snapshot (Top 3)</h3>\n");
            html.push_str(&ranked_list(top));
            html.push_str("<hr>\n<h3>Upcoming Activities / Milestones</h3>\n<ul>\n");
            for m in milestones {
                let _ = writeln!(html, "<li>{}</li>", escape(m));
            }
            html.push_str("</ul>\n<hr>\n<p>Contact: hackathon@sns.edu | SNS Institutions</p>\n");
            html
        }
        PageView::Login {
            roles,
            selected,
            key_hint,
        } => {
            let role_options = options(
                roles.iter().map(|r| (r.as_str(), r.as_str())),
                Some(selected.as_str()),
            );
            let fields = format!(
                "<label>Select role<select name=\"role\">{}</select></label>\
                 <label>{}<input type=\"text\" name=\"username\"></label>\
                 <label>Password<input type=\"password\" name=\"password\"></label>",
                role_options,
                escape(key_hint)
            );
            let mut html = String::from("<h1>Login</h1>\n");
            html.push_str(&action_form("login", &fields, "Login"));
            html.push_str(
                "<details><summary>Forgot password?</summary>\
                 <div class=\"notice info\">Please contact admin@snshackathon.edu - this demo uses fake auth.</div>\
                 </details>\n",
            );
            html
        }
        PageView::Student(v) => student_body(v),
        PageView::Mentor(v) => mentor_body(v),
        PageView::Floorwing(v) => floorwing_body(v),
        PageView::Admin(v) => admin_body(v),
        PageView::Leaderboard { entries } => {
            let mut html = String::from(
                "<h2>Global Leaderboard</h2>\n<table>\n<tr><th>#</th><th>name</th><th>points</th><th>floor</th></tr>\n",
            );
            for e in entries {
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    e.rank,
                    escape(&e.name),
                    e.points,
                    e.floor
                );
            }
            html.push_str("</table>\n<p>Filter: (demo)</p>\n");
            html
        }
        PageView::Achievements { badges } => {
            let mut html = String::from(
                "<h2>Achievements (Student view)</h2>\n\
                 <p>This page shows badges earned vs locked. Click a badge to see details (demo).</p>\n\
                 <div class=\"columns\">\n",
            );
            for b in badges {
                html.push_str("<div>");
                html.push_str(&action_form("reveal_badge", &hidden("title", &b.title), &b.title));
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
            html
        }
    }
}

fn student_body(v: &StudentView) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<h2>Student Dashboard — {}</h2>\n<div class=\"columns\"><div>\n\
         <p>Points</p><p class=\"metric\">{}</p>\n\
         <progress value=\"{:.2}\" max=\"1\" style=\"width:100%\"></progress>\n\
         <h3>Achievements / Badges</h3>\n<div class=\"badges\">\n",
        escape(&v.name),
        v.points,
        v.progress
    );
    for slot in &v.badges {
        match slot {
            BadgeSlot::Earned(title) => {
                let _ = writeln!(html, "<button type=\"button\">{}</button>", escape(title));
            }
            BadgeSlot::Locked => html.push_str("<button type=\"button\" disabled>Locked</button>\n"),
        }
    }
    html.push_str("</div>\n<h3>Leaderboard preview</h3>\n");
    html.push_str(&ranked_list(&v.preview));
    html.push_str("</div><div>\n<h3>Mentor Notes</h3>\n");
    for note in &v.feedback {
        let _ = writeln!(html, "<div class=\"notice info\">{}</div>", escape(note));
    }
    html.push_str("</div></div>\n");
    html
}

fn mentor_body(v: &MentorView) -> String {
    let student_options = options(
        v.students.iter().map(|(k, _)| (k.as_str(), k.as_str())),
        None,
    );
    let activity_options = options(v.activities.iter().map(|a| (a.as_str(), a.as_str())), None);
    let mut html = String::new();
    let _ = writeln!(html, "<h2>Mentor Dashboard — {}</h2>\n<h3>Assign Points</h3>", escape(&v.name));
    let assign = format!(
        "<label>Select student<select name=\"student\">{}</select></label>\
         <label>Activity<select name=\"activity\">{}</select></label>\
         <label>Points to assign<input type=\"number\" name=\"points\" min=\"{}\" max=\"{}\" value=\"{}\"></label>",
        student_options, activity_options, v.policy.min, v.policy.max, v.policy.default_award
    );
    html.push_str(&action_form("assign_points", &assign, "Assign Points"));
    html.push_str("<hr>\n<h3>Student Performance Chart</h3>\n");
    for bar in &v.chart {
        let _ = writeln!(
            html,
            "<div class=\"bar\" style=\"width: {:.1}%\">{} — {}</div>",
            (bar.share * 100.0).max(1.0),
            escape(&bar.student),
            bar.points
        );
    }
    html.push_str("<h3>Quick Feedback</h3>\n");
    let feedback = format!(
        "<label>Pick student for feedback<select name=\"student\">{}</select></label>\
         <label>Write feedback<textarea name=\"text\" rows=\"4\"></textarea></label>",
        student_options
    );
    html.push_str(&action_form("submit_feedback", &feedback, "Submit Feedback"));
    html
}

fn floorwing_body(v: &FloorwingView) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<h2>Floorwing Dashboard — {}</h2>\n<h3>Floor-wise performance</h3>\n\
         <table>\n<tr><th>student</th><th>points</th><th>floor</th></tr>\n",
        escape(&v.key)
    );
    for row in &v.rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.student),
            row.points,
            row.floor
        );
    }
    let _ = write!(
        html,
        "</table>\n<h3>Approvals</h3>\n<p>{}</p>\n",
        escape(v.approvals_note)
    );
    html
}

fn admin_body(v: &AdminView) -> String {
    let mut html = String::from(
        "<h2>Administrator Panel</h2>\n<h3>Manage Users</h3>\n\
         <p>Add / Remove users (demo modifies in-memory state)</p>\n",
    );
    let fields = format!(
        "<label>Type<select name=\"collection\">{}</select></label>\
         <label>New user key (e.g. s4, m3, fC)<input type=\"text\" name=\"key\"></label>\
         <label>New user display name<input type=\"text\" name=\"name\"></label>",
        options(v.collections.iter().map(|c| (c.as_str(), c.as_str())), None)
    );
    html.push_str(&action_form("create_user", &fields, "Create user"));
    html.push_str(
        "<hr>\n<h3>Reports (demo)</h3>\n<table>\n<tr><th>id</th><th>name</th><th>points</th></tr>\n",
    );
    for row in &v.report {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.id),
            escape(&row.name),
            row.points
        );
    }
    let _ = writeln!(
        html,
        "</table>\n<p><a href=\"/reports/{0}\" download=\"{0}\">Download Student Report CSV</a></p>",
        REPORT_FILE_NAME
    );
    html
}

fn footer() -> String {
    let p = assistant::placeholder();
    format!(
        "<hr>\n<p><small>{}</small></p>\n<pre><code>{}</code></pre>\n<hr>\n\
         <p><strong>Contact:</strong> hackathon@sns.edu | <strong>Prototype Submission:</strong> Oct 4th</p>\n",
        escape(p.caption),
        escape(p.snippet)
    )
}
