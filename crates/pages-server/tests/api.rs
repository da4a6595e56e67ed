//! Router-level tests driven in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use regex::Regex;
use serde_json::{Value, json};
use tower::ServiceExt;

use pages_core::{ColorPalette, LandingPageRecord, UserId, UserIdentity};
use pages_publish::{MemoryObjectStore, MemoryRecordStore, SimulatedNotifier, StaticSessions};
use pages_server::config::DEFAULT_MAX_UPLOAD_BYTES;
use pages_server::state::Backends;
use pages_server::{AppState, build_router};

const TOKEN: &str = "dev-token";
const STORE_ROOT: &str = "http://localhost:3000";
const BOUNDARY: &str = "----pages-test-boundary";

struct TestApp {
    router: Router,
    records: MemoryRecordStore,
}

fn app() -> TestApp {
    let objects = Arc::new(MemoryObjectStore::new());
    let records = MemoryRecordStore::new();
    let sessions = StaticSessions::new().with_user(TOKEN, UserIdentity::new("owner-1"));

    let backends = Backends {
        objects: objects.clone(),
        records: Arc::new(records.clone()),
        sessions: Arc::new(sessions),
    };
    let assets = pages_core::AssetUrlBase::from_prefix(&format!("{STORE_ROOT}/assets"));
    let state = AppState::new(backends, assets, Arc::new(SimulatedNotifier::new(Duration::ZERO)))
        .serving_assets(objects);

    TestApp {
        router: build_router(state, "static", DEFAULT_MAX_UPLOAD_BYTES),
        records,
    }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                let disposition =
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n");
                body.extend_from_slice(disposition.as_bytes());
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                let disposition = format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
                );
                body.extend_from_slice(disposition.as_bytes());
                body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn create_request(parts: &[Part<'_>], token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/pages")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn jpeg(name: &'static str, size: usize) -> Part<'static> {
    Part::File {
        field: "images",
        file_name: name,
        content_type: "image/jpeg",
        bytes: vec![0xFF; size],
    }
}

async fn create_simple_page(router: &Router, title: &str) -> String {
    let parts = [
        Part::Text("title", title),
        Part::Text("description", "Espaço amplo."),
    ];
    let (status, body) = send_json(router, create_request(&parts, Some(TOKEN))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["slug"].as_str().unwrap().to_string()
}

fn seeded_record(slug: &str, is_public: bool) -> LandingPageRecord {
    LandingPageRecord {
        id: uuid::Uuid::nil(),
        user_id: UserId::new("owner-2"),
        title: "Rascunho".into(),
        description: None,
        description_professional_ai: None,
        slug: slug.into(),
        images_gallery: None,
        video_embed_url: None,
        video_storage_path: None,
        benefits_features: None,
        cta_button_text: None,
        cta_contact_form_enabled: true,
        is_public,
        color_palette: None,
        calendly_link: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send_json(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_session_requires_token() {
    let app = app();

    let (status, body) = send_json(&app.router, get("/api/session")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "NOT_AUTHENTICATED");

    let request = Request::builder()
        .uri("/api/session")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "owner-1");
}

#[tokio::test]
async fn test_create_requires_session() {
    let app = app();
    let parts = [Part::Text("title", "Loja")];
    let (status, _) = send(&app.router, create_request(&parts, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app.router, create_request(&parts, Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.records.all().await.is_empty());
}

#[tokio::test]
async fn test_create_page_end_to_end() {
    let app = app();
    let benefits = json!([{ "icon": "🏠", "text": "Três quartos" }, { "text": "" }]).to_string();
    let parts = [
        Part::Text("title", "Apartamento T3"),
        Part::Text("description", "apartamento   luminoso ,com vista"),
        Part::Text("video_choice", "url"),
        Part::Text("video_url", "https://youtu.be/abc123"),
        Part::Text("benefits", &benefits),
        Part::Text("color_accent", "#10B981"),
        jpeg("sala.jpg", 1024),
        jpeg("enorme.jpg", 4 * 1024 * 1024),
        jpeg("cozinha.jpg", 2048),
    ];

    let (status, body) = send_json(&app.router, create_request(&parts, Some(TOKEN))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let slug = body["slug"].as_str().unwrap();
    assert!(Regex::new(r"^apartamento-t3-[0-9a-z]{6}$").unwrap().is_match(slug));
    assert_eq!(body["url"], format!("/lp/{slug}"));

    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["file_name"], "enorme.jpg");
    assert_eq!(warnings[0]["reason"], "too_large");

    let records = app.records.all().await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.user_id.as_str(), "owner-1");
    assert_eq!(record.video_embed_url.as_deref(), Some("https://youtu.be/abc123"));
    assert_eq!(record.benefits_features.as_ref().map(Vec::len), Some(1));
    assert_eq!(record.color_palette.as_ref().map(|p| p.accent.as_str()), Some("#10B981"));

    let gallery = record.images_gallery.as_ref().unwrap();
    let names: Vec<_> = gallery.iter().map(|img| (img.name.as_str(), img.order)).collect();
    assert_eq!(names, vec![("sala.jpg", 0), ("cozinha.jpg", 1)]);

    // Public JSON view resolves asset URLs against this server
    let (status, page) = send_json(&app.router, get(&format!("/api/pages/{slug}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["video"]["kind"], "embed");
    assert_eq!(page["video"]["url"], "https://youtube.com/embed/abc123");

    let first = page["gallery"][0]["url"].as_str().unwrap();
    let asset_path = first.strip_prefix(STORE_ROOT).unwrap();
    assert!(asset_path.starts_with("/assets/owner-1/images/"));

    let (status, bytes) = send(&app.router, get(asset_path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes.len(), 1024);

    // Server-rendered page
    let (status, html) = send(&app.router, get(&format!("/lp/{slug}"))).await;
    let html = String::from_utf8(html).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Apartamento T3</h1>"));
    assert!(html.contains("Galeria de Imagens"));
    assert!(html.contains("Três quartos"));
}

#[tokio::test]
async fn test_create_without_title_is_rejected() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        create_request(&[Part::Text("title", "   "), jpeg("sala.jpg", 10)], Some(TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
    assert!(app.records.all().await.is_empty());
}

#[tokio::test]
async fn test_create_with_bad_video_url_is_rejected() {
    let app = app();
    let parts = [
        Part::Text("title", "Loja"),
        Part::Text("video_choice", "url"),
        Part::Text("video_url", "https://example.com/clip"),
    ];
    let (status, body) = send_json(&app.router, create_request(&parts, Some(TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_create_with_script_booking_link_is_rejected() {
    let app = app();
    let parts = [
        Part::Text("title", "Loja"),
        Part::Text("calendly_link", "javascript:alert(document.cookie)"),
    ];
    let (status, body) = send_json(&app.router, create_request(&parts, Some(TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
    assert!(app.records.all().await.is_empty());
}

#[tokio::test]
async fn test_stored_script_booking_link_is_not_rendered() {
    let app = app();
    let mut record = seeded_record("antiga-000001", true);
    record.calendly_link = Some("javascript:alert(document.cookie)".into());
    app.records.put(record).await;

    let (status, html) = send(&app.router, get("/lp/antiga-000001")).await;
    let html = String::from_utf8(html).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("javascript:alert"));
    assert!(!html.contains("Agendar Agora"));
}

#[tokio::test]
async fn test_list_pages_for_owner() {
    let app = app();
    create_simple_page(&app.router, "Primeira").await;
    app.records.put(seeded_record("alheia-000001", true)).await;

    let request = Request::builder()
        .uri("/api/pages")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    let pages = body.as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["title"], "Primeira");
}

#[tokio::test]
async fn test_private_and_unknown_pages_are_not_found() {
    let app = app();
    app.records.put(seeded_record("rascunho-000001", false)).await;

    let (status, body) = send_json(&app.router, get("/api/pages/rascunho-000001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, html) = send(&app.router, get("/lp/rascunho-000001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8(html).unwrap().contains("Página não encontrada"));

    let (status, _) = send(&app.router, get("/lp/nao-existe")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_json_contact() {
    let app = app();
    let slug = create_simple_page(&app.router, "Loja").await;
    let uri = format!("/api/pages/{slug}/contact");

    let invalid = json!({ "name": "Ana", "email": "ana@", "message": "Olá" });
    let (status, body) = send_json(&app.router, post_json(&uri, &invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION");

    let valid = json!({ "name": "Ana", "email": "ana@exemplo.pt", "message": "Olá" });
    let (status, body) = send_json(&app.router, post_json(&uri, &valid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], true);

    let (status, _) = send(&app.router, post_json("/api/pages/nao-existe/contact", &valid)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_html_contact_form() {
    let app = app();
    let slug = create_simple_page(&app.router, "Loja").await;

    let form = |body: &str| {
        Request::builder()
            .method("POST")
            .uri(format!("/lp/{slug}/contact"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app
        .router
        .clone()
        .oneshot(form("name=Ana&email=ana%40exemplo.pt&phone=&message=Ol%C3%A1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/lp/{slug}?contact=sent").as_str()
    );

    let missing_name = form("name=&email=ana%40exemplo.pt&phone=&message=x");
    let (status, html) = send(&app.router, missing_name).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(html).unwrap().contains("notice error"));

    let (status, html) = send(&app.router, get(&format!("/lp/{slug}?contact=sent"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(html).unwrap().contains("enviada com sucesso"));
}

#[tokio::test]
async fn test_html_contact_on_disabled_page_shows_notice() {
    let app = app();
    let mut record = seeded_record("sem-contacto-000001", true);
    record.cta_contact_form_enabled = false;
    app.records.put(record).await;

    let request = Request::builder()
        .method("POST")
        .uri("/lp/sem-contacto-000001/contact")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=Ana&email=ana%40exemplo.pt&phone=&message=Ol%C3%A1"))
        .unwrap();
    let (status, html) = send(&app.router, request).await;
    let html = String::from_utf8(html).unwrap();

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(html.contains("notice error"));
    assert!(html.contains("Esta página não aceita mensagens."));
}

#[tokio::test]
async fn test_improve_description() {
    let app = app();

    let text = "  loja   de bairro ,aberta todos os dias com produtos frescos e locais";
    let (status, body) = send_json(
        &app.router,
        post_json("/api/description/improve", &json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let improved = body["improved"].as_str().unwrap();
    assert!(improved.starts_with("Loja de bairro,"));
    assert!(improved.ends_with('.'));

    let blank = post_json("/api/description/improve", &json!({ "text": "   " }));
    let (status, _) = send(&app.router, blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_palette() {
    let app = app();
    let (status, body) = send_json(&app.router, get("/api/palette/generate")).await;

    assert_eq!(status, StatusCode::OK);
    let palette: ColorPalette = serde_json::from_value(body).unwrap();
    let hex = Regex::new(r"^#[0-9a-f]{6}$").unwrap();
    assert!(hex.is_match(&palette.primary));
    assert!(hex.is_match(&palette.secondary));
    assert!(hex.is_match(&palette.accent));
}
