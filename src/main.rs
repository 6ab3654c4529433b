use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use yc_tracker::{
    configuration::get_configuration, dal::company_store::CompanyStore,
    domain::session::SessionState, startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let store = CompanyStore::new(configuration.store.csv_path.clone());
    let session = SessionState::load(&store)
        .with_context(|| format!("Failed to load {}", store.path().display()))?;
    log::info!(
        "Dashboard starting with {} companies from {}",
        session.table.len(),
        store.path().display()
    );

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    log::info!("Listening on http://{}", address);

    run(listener, store, configuration.scraper, session)?.await?;
    Ok(())
}
