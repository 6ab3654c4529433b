use std::net::TcpListener;

use actix_files::Files;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use tokio::sync::Mutex;

use crate::{
    configuration::ScraperSettings,
    dal::company_store::CompanyStore,
    domain::session::SessionState,
    routes::{api_route, dashboard_route, default_route, export_route, refresh_route},
};

pub fn run(
    listener: TcpListener,
    store: CompanyStore,
    scraper_settings: ScraperSettings,
    session: SessionState,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let scraper_settings = web::Data::new(scraper_settings);
    let session = web::Data::new(Mutex::new(session));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(default_route::health_check)
            .service(dashboard_route::dashboard)
            .service(refresh_route::refresh)
            .service(export_route::export)
            .service(web::scope("/api").service(api_route::summary))
            .app_data(store.clone())
            .app_data(scraper_settings.clone())
            .app_data(session.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
