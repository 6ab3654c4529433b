use actix_web::{
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use tokio::sync::Mutex;

use crate::{
    domain::session::SessionState,
    services::report::{self, EXPORT_FILE_NAME, EXPORT_MIME},
};

#[get("/export")]
pub async fn export(session: web::Data<Mutex<SessionState>>) -> HttpResponse {
    let session = session.lock().await;

    match report::export_csv(&session.table) {
        Ok(body) => HttpResponse::Ok()
            .content_type(EXPORT_MIME)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
            })
            .body(body),
        Err(e) => {
            log::error!("Failed to export companies: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
