use std::{
    io::Result,
    net::SocketAddr,
    sync::{Mutex, MutexGuard, PoisonError},
};

use actix_cors::Cors;
use actix_web::{
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
    web::{self, resource, scope, Json, Query},
    App, HttpRequest, HttpResponse, HttpServer,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    auth::{AdminAuth, LoginOutcome},
    core::{
        data::load_document,
        form::FormState,
        portfolio::{ItemEditor, ListRow},
        render::{builtin_text, resolve_language, RenderOptions, Renderer, SiteOverrides},
        session::{Action, Confirm, EditorSession, Outcome, Preconfirmed, View, LOGOUT_PROMPT},
        settings::Settings,
        site::search_icons,
    },
    error::FolioError,
    types::Document,
};

pub struct AppState {
    pub settings: Settings,
    pub auth: Mutex<AdminAuth>,
    pub editor: Mutex<Option<EditorSession>>,
    pub published: Option<Document>,
}

impl AppState {
    pub fn new(settings: Settings, published: Option<Document>) -> Self {
        let auth = AdminAuth::new(&settings.admin_password_hash.value);
        AppState {
            settings,
            auth: Mutex::new(auth),
            editor: Mutex::new(None),
            published,
        }
    }

    fn authorize(&self, credentials: &BearerAuth) -> std::result::Result<(), FolioError> {
        lock(&self.auth).check_token(credentials.token())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Reply = std::result::Result<HttpResponse, FolioError>;

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
struct ConfirmRequest {
    #[serde(default)]
    confirm: bool,
}

#[derive(Deserialize)]
struct SiteQuery {
    lang: Option<String>,
}

#[derive(Deserialize)]
struct IconQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditorSnapshot<'a> {
    view: View,
    form: &'a FormState,
    rows: Vec<ListRow>,
    editor: Option<&'a ItemEditor>,
    dragging: Option<usize>,
    last_export_size: Option<usize>,
    text_view: &'a str,
}

impl<'a> EditorSnapshot<'a> {
    fn of(session: &'a EditorSession) -> Self {
        EditorSnapshot {
            view: session.view(),
            form: session.form(),
            rows: session.list_rows(),
            editor: session.editor(),
            dragging: session.drag().source(),
            last_export_size: session.last_export().map(|file| file.bytes.len()),
            text_view: session.text_view(),
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        scope("/v1")
            .service(resource("/folio").route(web::get().to(status_handler)))
            .service(resource("/login").route(web::post().to(login_handler)))
            .service(resource("/logout").route(web::post().to(logout_handler)))
            .service(resource("/load").route(web::post().to(load_handler)))
            .service(resource("/document").route(web::get().to(document_handler)))
            .service(
                resource("/editor")
                    .route(web::get().to(editor_handler))
                    .route(web::post().to(action_handler)),
            )
            .service(resource("/export").route(web::get().to(export_handler)))
            .service(resource("/icons").route(web::get().to(icons_handler)))
            .service(resource("/site").route(web::get().to(site_handler))),
    );
}

pub async fn start_server(state: web::Data<AppState>, addr: SocketAddr) -> Result<()> {
    info!("Server starting at {}", addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allow_any_method(),
            )
    })
    .bind(addr)?
    .run()
    .await
}

async fn status_handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "running",
        "authenticated": lock(&state.auth).is_authenticated(),
    }))
}

async fn login_handler(state: web::Data<AppState>, request: Json<LoginRequest>) -> HttpResponse {
    match lock(&state.auth).login(&request.password) {
        LoginOutcome::Accepted { token } => HttpResponse::Ok().json(serde_json::json!({ "token": token })),
        LoginOutcome::Rejected { message } => {
            HttpResponse::Unauthorized().json(serde_json::json!({ "error": message }))
        }
    }
}

async fn logout_handler(
    state: web::Data<AppState>,
    credentials: BearerAuth,
    body: Option<Json<ConfirmRequest>>,
) -> Reply {
    state.authorize(&credentials)?;
    let mut answer = Preconfirmed(body.map_or(false, |body| body.confirm));
    if !answer.confirm(LOGOUT_PROMPT) {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "result": Outcome::Declined })));
    }
    lock(&state.auth).logout();
    *lock(&state.editor) = None;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": Outcome::Applied })))
}

async fn load_handler(state: web::Data<AppState>, credentials: BearerAuth) -> Reply {
    state.authorize(&credentials)?;
    let source = state.settings.document_source.value.clone();
    let document = load_document(&source).await?;
    let session = EditorSession::new(document)?;
    let reply = HttpResponse::Ok().json(EditorSnapshot::of(&session));
    *lock(&state.editor) = Some(session);
    info!("Loaded document from {}", source);
    Ok(reply)
}

async fn document_handler(state: web::Data<AppState>, credentials: BearerAuth) -> Reply {
    state.authorize(&credentials)?;
    let editor = lock(&state.editor);
    let session = editor.as_ref().ok_or(FolioError::NotLoaded)?;
    Ok(HttpResponse::Ok().json(session.document()))
}

async fn editor_handler(state: web::Data<AppState>, credentials: BearerAuth) -> Reply {
    state.authorize(&credentials)?;
    let editor = lock(&state.editor);
    let session = editor.as_ref().ok_or(FolioError::NotLoaded)?;
    Ok(HttpResponse::Ok().json(EditorSnapshot::of(session)))
}

/// Body is an action object; an optional `confirm` flag answers any
/// confirmation the action asks for.
async fn action_handler(
    state: web::Data<AppState>,
    credentials: BearerAuth,
    body: Json<Value>,
) -> Reply {
    state.authorize(&credentials)?;
    let mut body = body.into_inner();
    let confirmed = body
        .as_object_mut()
        .and_then(|object| object.remove("confirm"))
        .and_then(|value| value.as_bool())
        .unwrap_or(false);
    let action: Action = serde_json::from_value(body)?;
    let mut editor = lock(&state.editor);
    let session = editor.as_mut().ok_or(FolioError::NotLoaded)?;
    let outcome = session.dispatch(action, &mut Preconfirmed(confirmed))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": outcome,
        "editor": EditorSnapshot::of(session),
    })))
}

async fn export_handler(state: web::Data<AppState>, credentials: BearerAuth) -> Reply {
    state.authorize(&credentials)?;
    let mut editor = lock(&state.editor);
    let session = editor.as_mut().ok_or(FolioError::NotLoaded)?;
    let file = session.save()?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name.to_string())],
        })
        .body(file.bytes))
}

async fn icons_handler(
    state: web::Data<AppState>,
    credentials: BearerAuth,
    query: Query<IconQuery>,
) -> Reply {
    state.authorize(&credentials)?;
    Ok(HttpResponse::Ok().json(search_icons(&query.q)))
}

async fn site_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    query: Query<SiteQuery>,
) -> HttpResponse {
    let saved = query
        .lang
        .clone()
        .or_else(|| request.cookie("language").map(|cookie| cookie.value().to_string()));
    let browser = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let lang = resolve_language(
        saved.as_deref(),
        browser.as_deref(),
        &state.settings.default_language.value,
    );

    let Some(document) = state.published.as_ref() else {
        let message = builtin_text(&lang, "error").unwrap_or("Failed to load data.");
        return HttpResponse::BadGateway()
            .content_type("text/html; charset=utf-8")
            .body(format!("<div class=\"error\">{}</div>", message));
    };

    let overrides = request
        .cookie("siteSettings")
        .and_then(|cookie| match serde_json::from_str::<SiteOverrides>(cookie.value()) {
            Ok(overrides) => Some(overrides),
            Err(error) => {
                warn!("Ignoring malformed site settings override: {}", error);
                None
            }
        })
        .unwrap_or_default();

    let settings = &state.settings;
    let options = RenderOptions {
        site_name: settings.site_name.value.clone(),
        twitter_site: settings.twitter_site.value.clone(),
        base_url: settings.site_base_url.value.clone(),
        page_url: format!(
            "{}{}",
            settings.site_base_url.value.trim_end_matches('/'),
            request.uri()
        ),
    };
    let page = Renderer::new(document, &lang, &options).render(&overrides);
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page.to_html())
}
