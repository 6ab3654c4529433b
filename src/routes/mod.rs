pub mod api_route;
pub mod dashboard_route;
pub mod default_route;
pub mod export_route;
pub mod refresh_route;
