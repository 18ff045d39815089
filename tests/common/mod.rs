#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const VALID_CODE: &str = "123456";
pub const ADMIN_PASSWORD: &str = "letmein";

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub email: String,
    pub date: NaiveDate,
    pub casual: f64,
    pub casual_note: Option<String>,
    pub serious: f64,
    pub serious_note: Option<String>,
    pub project: f64,
    pub project_note: Option<String>,
}

impl MockEntry {
    pub fn new(email: &str, date: NaiveDate, casual: f64, serious: f64, project: f64) -> Self {
        Self {
            email: email.to_string(),
            date,
            casual,
            casual_note: None,
            serious,
            serious_note: None,
            project,
            project_note: None,
        }
    }

    fn total(&self) -> f64 {
        self.casual + self.serious + self.project
    }

    fn notes(&self) -> [Option<&str>; 3] {
        [
            self.casual_note.as_deref(),
            self.serious_note.as_deref(),
            self.project_note.as_deref(),
        ]
    }

    fn to_json(&self) -> Value {
        json!({
            "id": format!("{}-{}", self.email, self.date),
            "entry_date": self.date.to_string(),
            "casual_leisure_hours": self.casual,
            "casual_leisure_note": self.casual_note,
            "serious_leisure_hours": self.serious,
            "serious_leisure_note": self.serious_note,
            "project_leisure_hours": self.project,
            "project_leisure_note": self.project_note,
            "total_hours": self.total(),
            "created_at": format!("{}T12:00:00Z", self.date)
        })
    }
}

struct MockData {
    today: NaiveDate,
    tokens: HashMap<String, String>,
    users: Vec<String>,
    entries: Vec<MockEntry>,
    otp_requests: Vec<String>,
}

/// In-process stand-in for the leisure-tracking REST API.
#[derive(Clone)]
pub struct MockApi {
    data: Arc<Mutex<MockData>>,
}

impl MockApi {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            data: Arc::new(Mutex::new(MockData {
                today,
                tokens: HashMap::new(),
                users: Vec::new(),
                entries: Vec::new(),
                otp_requests: Vec::new(),
            })),
        }
    }

    pub async fn issue_token(&self, email: &str) -> String {
        let mut data = self.data.lock().await;
        register(&mut data, email)
    }

    pub async fn revoke(&self, token: &str) {
        self.data.lock().await.tokens.remove(token);
    }

    pub async fn add_entry(&self, entry: MockEntry) {
        self.data.lock().await.entries.push(entry);
    }

    /// Adds `count` one-hour entries on consecutive days ending at `last`.
    pub async fn seed_days(&self, email: &str, last: NaiveDate, count: i64) {
        let mut data = self.data.lock().await;
        for offset in 0..count {
            let date = last - Duration::days(offset);
            data.entries.push(MockEntry::new(email, date, 1.0, 0.0, 0.0));
        }
    }

    pub async fn otp_requests(&self) -> Vec<String> {
        self.data.lock().await.otp_requests.clone()
    }

    pub async fn entry_count(&self, email: &str) -> usize {
        let data = self.data.lock().await;
        data.entries.iter().filter(|e| e.email == email).count()
    }
}

fn register(data: &mut MockData, email: &str) -> String {
    let token = format!("token-{email}");
    data.tokens.insert(token.clone(), email.to_string());
    if !data.users.iter().any(|user| user == email) {
        data.users.push(email.to_string());
    }
    token
}

pub fn router(api: MockApi) -> Router {
    let v1 = Router::new()
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/me", get(me))
        .route("/entries/can-submit", get(can_submit))
        .route("/entries/today", post(submit_today))
        .route("/entries/history", get(history))
        .route("/statistics/overview", get(overview))
        .route("/statistics/reset", delete(reset))
        .route("/admin/users-stats", get(users_stats))
        .route("/admin/word-cloud-data", get(word_cloud_data));
    Router::new().nest("/api/v1", v1).with_state(api)
}

/// Serves the mock on a random local port and returns its API base URL.
pub async fn spawn(api: MockApi) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(api)).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn caller(api: &MockApi, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Err(detail(StatusCode::UNAUTHORIZED, "Missing authorization header"));
    };
    let data = api.data.lock().await;
    data.tokens
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

fn admin_allowed(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("x-admin-password").and_then(|v| v.to_str().ok()) {
        Some(ADMIN_PASSWORD) => Ok(()),
        _ => Err(detail(StatusCode::FORBIDDEN, "Invalid admin password")),
    }
}

#[derive(Deserialize)]
struct EmailBody {
    email: String,
}

async fn send_otp(State(api): State<MockApi>, Json(body): Json<EmailBody>) -> Response {
    if !body.email.contains('@') {
        return detail(StatusCode::BAD_REQUEST, "Invalid email address");
    }
    api.data.lock().await.otp_requests.push(body.email);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct VerifyBody {
    email: String,
    otp: String,
}

async fn verify_otp(State(api): State<MockApi>, Json(body): Json<VerifyBody>) -> Response {
    if body.otp != VALID_CODE {
        return detail(
            StatusCode::UNAUTHORIZED,
            "OTP verification failed: Token has expired or is invalid",
        );
    }
    let mut data = api.data.lock().await;
    let token = register(&mut data, &body.email);
    Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": { "id": format!("id-{}", body.email), "email": body.email }
    }))
    .into_response()
}

async fn me(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    match caller(&api, &headers).await {
        Ok(email) => Json(json!({ "id": format!("id-{email}"), "email": email })).into_response(),
        Err(response) => response,
    }
}

async fn can_submit(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    let email = match caller(&api, &headers).await {
        Ok(email) => email,
        Err(response) => return response,
    };
    let data = api.data.lock().await;
    match data
        .entries
        .iter()
        .find(|e| e.email == email && e.date == data.today)
    {
        Some(entry) => Json(json!({
            "can_submit": false,
            "reason": "You have already submitted an entry for today.",
            "existing_entry": entry.to_json()
        }))
        .into_response(),
        None => Json(json!({ "can_submit": true, "reason": null, "existing_entry": null }))
            .into_response(),
    }
}

#[derive(Deserialize)]
struct EntryBody {
    entry_date: Option<NaiveDate>,
    casual_leisure_hours: f64,
    casual_leisure_note: Option<String>,
    serious_leisure_hours: f64,
    serious_leisure_note: Option<String>,
    project_leisure_hours: f64,
    project_leisure_note: Option<String>,
}

async fn submit_today(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<EntryBody>,
) -> Response {
    let email = match caller(&api, &headers).await {
        Ok(email) => email,
        Err(response) => return response,
    };
    let total = body.casual_leisure_hours + body.serious_leisure_hours + body.project_leisure_hours;
    if total <= 0.0 {
        return detail(StatusCode::BAD_REQUEST, "Total hours must be greater than 0");
    }

    let mut data = api.data.lock().await;
    let date = body.entry_date.unwrap_or(data.today);
    if data.entries.iter().any(|e| e.email == email && e.date == date) {
        return detail(
            StatusCode::CONFLICT,
            &format!("You have already submitted an entry for {date}. Only one entry per day is allowed."),
        );
    }
    data.entries.push(MockEntry {
        email,
        date,
        casual: body.casual_leisure_hours,
        casual_note: body.casual_leisure_note,
        serious: body.serious_leisure_hours,
        serious_note: body.serious_leisure_note,
        project: body.project_leisure_hours,
        project_note: body.project_leisure_note,
    });
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct HistoryQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

async fn history(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let email = match caller(&api, &headers).await {
        Ok(email) => email,
        Err(response) => return response,
    };
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);
    if page < 1 || page_size < 1 {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "page must be >= 1");
    }

    let data = api.data.lock().await;
    let mut mine: Vec<&MockEntry> = data.entries.iter().filter(|e| e.email == email).collect();
    mine.sort_by(|a, b| b.date.cmp(&a.date));
    let total = mine.len() as u32;
    let total_pages = total.div_ceil(page_size);
    let entries: Vec<Value> = mine
        .iter()
        .skip(((page - 1) * page_size) as usize)
        .take(page_size as usize)
        .map(|e| e.to_json())
        .collect();

    Json(json!({
        "entries": entries,
        "total": total,
        "page": page,
        "page_size": page_size,
        "total_pages": total_pages
    }))
    .into_response()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn overview(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    let email = match caller(&api, &headers).await {
        Ok(email) => email,
        Err(response) => return response,
    };
    let data = api.data.lock().await;
    let mine: Vec<&MockEntry> = data.entries.iter().filter(|e| e.email == email).collect();
    let count = mine.len() as f64;
    let avg = |total: f64| if count > 0.0 { round2(total / count) } else { 0.0 };
    let casual: f64 = mine.iter().map(|e| e.casual).sum();
    let serious: f64 = mine.iter().map(|e| e.serious).sum();
    let project: f64 = mine.iter().map(|e| e.project).sum();
    let total = casual + serious + project;
    let category = |hours: f64| {
        json!({ "total_hours": hours, "average_hours": avg(hours), "entry_count": mine.len() })
    };

    Json(json!({
        "casual_leisure": category(casual),
        "serious_leisure": category(serious),
        "project_leisure": category(project),
        "total_entries": mine.len(),
        "total_hours": total,
        "average_total_hours": avg(total),
        "period": null
    }))
    .into_response()
}

async fn reset(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    let email = match caller(&api, &headers).await {
        Ok(email) => email,
        Err(response) => return response,
    };
    api.data.lock().await.entries.retain(|e| e.email != email);
    StatusCode::NO_CONTENT.into_response()
}

async fn users_stats(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(response) = admin_allowed(&headers) {
        return response;
    }
    let data = api.data.lock().await;
    let stats: Vec<Value> = data
        .users
        .iter()
        .rev()
        .map(|email| {
            let mine: Vec<&MockEntry> = data.entries.iter().filter(|e| &e.email == email).collect();
            let casual: f64 = mine.iter().map(|e| e.casual).sum();
            let serious: f64 = mine.iter().map(|e| e.serious).sum();
            let project: f64 = mine.iter().map(|e| e.project).sum();
            json!({
                "user_id": format!("id-{email}"),
                "email": email,
                "created_at": "2024-01-01T08:00:00.000000+00:00",
                "entry_count": mine.len(),
                "casual_total": casual,
                "serious_total": serious,
                "project_total": project,
                "total_hours": casual + serious + project,
                "leisure_distribution": { "casual": casual, "serious": serious, "project": project }
            })
        })
        .collect();
    Json(stats).into_response()
}

async fn word_cloud_data(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(response) = admin_allowed(&headers) {
        return response;
    }
    let data = api.data.lock().await;
    let mut notes: [Vec<&str>; 3] = Default::default();
    for entry in &data.entries {
        for (slot, note) in entry.notes().into_iter().enumerate() {
            if let Some(note) = note {
                notes[slot].push(note);
            }
        }
    }
    let [casual, serious, project] = notes;

    Json(json!({
        "casual_text": casual.join(" "),
        "serious_text": serious.join(" "),
        "project_text": project.join(" "),
        "total_entries": data.entries.len(),
        "casual_notes_count": casual.len(),
        "serious_notes_count": serious.len(),
        "project_notes_count": project.len()
    }))
    .into_response()
}
