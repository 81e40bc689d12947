// Route exports
pub mod proposals;

use actix_web::web;

pub use proposals::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(proposals::configure);
}
