use actix_web::{get, web, HttpResponse};
use serde_json::json;
use tokio::sync::Mutex;

use crate::{domain::session::SessionState, services::report};

#[get("/summary")]
pub async fn summary(session: web::Data<Mutex<SessionState>>) -> HttpResponse {
    let session = session.lock().await;
    let summary = report::summarize(&session.table);

    HttpResponse::Ok().json(json!({
        "total": summary.total,
        "with_website": summary.with_website,
        "mentions": summary.mentions,
        "last_updated": session.last_updated.to_rfc3339(),
    }))
}
