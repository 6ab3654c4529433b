use actix_web::{http::header, post, web, HttpResponse};
use tokio::sync::Mutex;

use crate::{
    configuration::ScraperSettings,
    dal::company_store::CompanyStore,
    domain::session::SessionState,
    services::{next_session, refresh_with_droid},
};

/// Runs the whole scrape while holding the session, so the dashboard waits
/// for it and a second refresh queues behind the first.
#[post("/refresh")]
pub async fn refresh(
    session: web::Data<Mutex<SessionState>>,
    store: web::Data<CompanyStore>,
    settings: web::Data<ScraperSettings>,
) -> HttpResponse {
    let mut session = session.lock().await;
    log::info!("Refresh requested");

    let result = refresh_with_droid(&store, &settings).await;
    *session = next_session(session.clone(), result);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
