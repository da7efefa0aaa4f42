use crate::router::{Invocation, ModeRouter};
use actix_web::{Responder, post, web};

/// Runs a timer tick on demand, for deployments driven by an external cron
#[post("")]
async fn check(router: web::Data<ModeRouter>) -> impl Responder {
    router
        .dispatch(Invocation::TimerTick)
        .await
        .into_response(router.cors_allowed_origin())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(check);
}
