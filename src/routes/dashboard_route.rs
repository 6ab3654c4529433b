use actix_web::{get, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    domain::{
        company::CompanyRecord,
        session::{RefreshNotice, SessionState},
    },
    services::{
        report::{self, CloudWord, PieSlice, Summary},
        SkippedCompany,
    },
};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    last_updated: String,
    notice: Option<NoticeView>,
    companies: Vec<CompanyRow>,
    summary: Summary,
    slices: Vec<PieSlice>,
    chart_size: f64,
    search: String,
    search_results: Option<Vec<CompanyRow>>,
    cloud: Vec<CloudWord>,
    cloud_width: u32,
    cloud_height: u32,
    export_file_name: &'static str,
}

struct CompanyRow {
    name: String,
    description: String,
    yc_page: String,
    website: String,
    linkedin_url: String,
    mentions: &'static str,
}

impl From<&CompanyRecord> for CompanyRow {
    fn from(value: &CompanyRecord) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone().unwrap_or_default(),
            yc_page: value.yc_page.clone(),
            website: value.website.clone().unwrap_or_default(),
            linkedin_url: value.linkedin_url.clone().unwrap_or_default(),
            mentions: if value.mentions_batch { "Yes" } else { "No" },
        }
    }
}

struct NoticeView {
    success: bool,
    message: String,
    skipped: Vec<SkippedCompany>,
}

impl From<RefreshNotice> for NoticeView {
    fn from(value: RefreshNotice) -> Self {
        match value {
            RefreshNotice::Succeeded(report) => {
                let mut message = format!(
                    "Updated successfully! {} listed, {} new, {} added.",
                    report.listed, report.candidates, report.enriched
                );
                if !report.listing_complete {
                    message.push_str(" The listing kept growing while scrolling and may be incomplete.");
                }
                NoticeView {
                    success: true,
                    message,
                    skipped: report.skipped,
                }
            }
            RefreshNotice::Failed(reason) => NoticeView {
                success: false,
                message: format!("Update failed: {}", reason),
                skipped: vec![],
            },
        }
    }
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
}

#[get("/")]
pub async fn dashboard(
    session: web::Data<Mutex<SessionState>>,
    query: web::Query<DashboardQuery>,
) -> HttpResponse {
    let mut session = session.lock().await;
    // Shown once, like a flash message.
    let notice = session.last_refresh.take().map(NoticeView::from);

    let table = &session.table;
    let search = query.search.clone().unwrap_or_default();
    let search_results = report::search_by_name(table, &search)
        .map(|rows| rows.into_iter().map(CompanyRow::from).collect());
    let frequencies = report::word_frequencies(table);

    let template = DashboardTemplate {
        last_updated: session.last_updated_caption(),
        notice,
        companies: table.iter().map(CompanyRow::from).collect(),
        summary: report::summarize(table),
        slices: report::mention_split(table),
        chart_size: report::CHART_SIZE,
        search,
        search_results,
        cloud: report::word_cloud(&frequencies),
        cloud_width: report::CLOUD_WIDTH,
        cloud_height: report::CLOUD_HEIGHT,
        export_file_name: report::EXPORT_FILE_NAME,
    };

    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render dashboard: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
