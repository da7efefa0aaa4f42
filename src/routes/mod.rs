pub mod check;
pub mod health;
pub mod subscriptions;

use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::init))
        .service(web::scope("/subscriptions").configure(subscriptions::init))
        .service(web::scope("/check").configure(check::init));
}
