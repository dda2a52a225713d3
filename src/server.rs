use actix_web::cookie::Cookie;
use actix_web::error::{InternalError, UrlencodedError};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};

use crate::config::PortalConfig;
use crate::database::{MemoryStore, Repository};
use crate::error::{Notice, PortalError};
use crate::gamification;
use crate::model::{Activity, Collection, Role};
use crate::render;
use crate::report::{self, REPORT_FILE_NAME, REPORT_MIME};
use crate::router::{self, Action, AppContext, Page, PageView};
use crate::session::{Session, SessionRegistry, SESSION_COOKIE};

/// Upper bound on any urlencoded body the portal accepts.
pub const FORM_LIMIT_BYTES: usize = 16 * 1024;

/// Process-wide state shared by every worker.
pub struct AppState {
    store: Mutex<MemoryStore>,
    pub sessions: SessionRegistry,
    pub config: PortalConfig,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            store: Mutex::new(MemoryStore::seeded(config.points)),
            sessions: SessionRegistry::new(),
            config,
        }
    }

    /// Always lock the store before touching a session.
    pub fn store(&self) -> MutexGuard<'_, MemoryStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigateForm {
    pub page: String,
}

/// Flat form shared by every page action; `action` picks which fields matter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionForm {
    pub action: String,
    pub role: String,
    pub username: String,
    pub password: String,
    pub student: String,
    pub activity: String,
    pub points: String,
    pub text: String,
    pub collection: String,
    pub key: String,
    pub name: String,
    pub title: String,
}

fn parse_role(raw: &str) -> Result<Role, PortalError> {
    Role::parse(raw).ok_or_else(|| PortalError::validation(format!("Unknown role '{}'", raw)))
}

impl TryFrom<ActionForm> for Action {
    type Error = PortalError;

    fn try_from(form: ActionForm) -> Result<Self, Self::Error> {
        match form.action.trim() {
            "select_role" => Ok(Action::SelectRole(parse_role(&form.role)?)),
            "login" => Ok(Action::Login {
                role: parse_role(&form.role)?,
                username: form.username,
                password: form.password,
            }),
            "logout" => Ok(Action::Logout),
            "assign_points" => Ok(Action::AssignPoints {
                activity: Activity::parse(&form.activity).ok_or_else(|| {
                    PortalError::validation(format!("Unknown activity '{}'", form.activity))
                })?,
                points: form
                    .points
                    .trim()
                    .parse()
                    .map_err(|_| PortalError::validation("Points must be a whole number"))?,
                student: form.student,
            }),
            "submit_feedback" => Ok(Action::SubmitFeedback {
                student: form.student,
                text: form.text,
            }),
            "create_user" => Ok(Action::CreateUser {
                collection: Collection::parse(&form.collection).ok_or_else(|| {
                    PortalError::validation(format!("Unknown user type '{}'", form.collection))
                })?,
                key: form.key,
                name: form.name,
            }),
            "reveal_badge" => Ok(Action::RevealBadge { title: form.title }),
            other => Err(PortalError::validation(format!("Unknown action '{}'", other))),
        }
    }
}

fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

fn resolve_session(req: &HttpRequest, state: &AppState) -> (String, bool) {
    let cookie = req.cookie(SESSION_COOKIE);
    state.sessions.resolve(cookie.as_ref().map(|c| c.value()))
}

fn page_html(store: &dyn Repository, session: &mut Session, config: &PortalConfig) -> String {
    let mut notices = session.take_flash();
    let view = router::render(store, session, config);
    if let PageView::Blocked(notice) = &view {
        notices.push(notice.clone());
    }
    render::document(session, &view, &notices)
}

fn redirect_home(id: &str, created: bool) -> HttpResponse {
    let mut resp = HttpResponse::SeeOther();
    if created {
        resp.cookie(session_cookie(id));
    }
    resp.insert_header((header::LOCATION, "/")).finish()
}

// Current page of this browser's session; unknown browsers see the welcome page
async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let cookie = req.cookie(SESSION_COOKIE);
    let store = state.store();
    let html = state
        .sessions
        .with_known(cookie.as_ref().map(|c| c.value()), |session| {
            page_html(&*store, session, &state.config)
        })
        .unwrap_or_else(|| page_html(&*store, &mut Session::default(), &state.config));
    drop(store);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

async fn navigate(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<NavigateForm>,
) -> HttpResponse {
    let (id, created) = resolve_session(&req, &state);
    state.sessions.with_session(&id, |session| match Page::parse(&form.page) {
        Some(page) => router::navigate(session, page),
        None => session
            .flash
            .push(Notice::error(format!("Unknown page '{}'", form.page))),
    });
    redirect_home(&id, created)
}

async fn action(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<ActionForm>,
) -> HttpResponse {
    let (id, created) = resolve_session(&req, &state);
    let parsed = Action::try_from(form.into_inner());
    let mut store = state.store();
    state.sessions.with_session(&id, |session| {
        let notices = match parsed {
            Ok(action) => {
                let mut ctx = AppContext {
                    store: &mut *store,
                    session: &mut *session,
                    config: &state.config,
                };
                router::handle(&mut ctx, action)
            }
            Err(err) => vec![Notice::from(err)],
        };
        session.flash.extend(notices);
    });
    drop(store);
    redirect_home(&id, created)
}

async fn download_report(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let cookie = req.cookie(SESSION_COOKIE);
    let store = state.store();
    let allowed = state
        .sessions
        .with_known(cookie.as_ref().map(|c| c.value()), |session| {
            router::guard(session, Page::AdminDashboard).map(|_| ())
        })
        .unwrap_or_else(|| router::guard(&Session::default(), Page::AdminDashboard).map(|_| ()));

    let mut resp = match allowed {
        Err(err) => {
            return HttpResponse::Forbidden()
                .content_type("text/plain; charset=utf-8")
                .body(err.to_string());
        }
        Ok(()) => HttpResponse::Ok(),
    };

    match report::student_report_csv(&*store) {
        Ok(csv) => resp
            .content_type(REPORT_MIME)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
            ))
            .body(csv),
        Err(e) => {
            log::error!("Failed to build student report: {}", e);
            HttpResponse::InternalServerError().body("Report unavailable")
        }
    }
}

async fn leaderboard_json(state: web::Data<AppState>) -> HttpResponse {
    let store = state.store();
    HttpResponse::Ok().json(gamification::leaderboard(&*store))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Cohort Portal is running!")
}

// Extractor failures (oversized body, wrong content type, bad encoding) land
// back on the page as a notice instead of a bare 4xx.
fn rejected_form(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        UrlencodedError::Overflow { .. } => "Form is too large".to_string(),
        UrlencodedError::ContentType => "Form must be URL-encoded".to_string(),
        other => format!("Form could not be read: {}", other),
    };
    log::warn!("Rejected form on {}: {}", req.path(), err);

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return err.into();
    };
    let (id, created) = resolve_session(req, state);
    state
        .sessions
        .with_session(&id, |session| session.flash.push(Notice::error(message)));
    InternalError::from_response(err, redirect_home(&id, created)).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT_BYTES)
            .error_handler(rejected_form),
    )
    .route("/", web::get().to(index))
    .route("/navigate", web::post().to(navigate))
    .route("/action", web::post().to(action))
    .route(
        &format!("/reports/{}", REPORT_FILE_NAME),
        web::get().to(download_report),
    )
    .route("/api/leaderboard", web::get().to(leaderboard_json))
    .route("/health", web::get().to(health_check));
}

pub async fn start_server(config: PortalConfig) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = web::Data::new(AppState::new(config));

    log::info!("Starting Cohort Portal on http://{}:{}", addr.0, addr.1);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(addr)?
    .run()
    .await
}
