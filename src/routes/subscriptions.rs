use crate::router::{Invocation, ModeRouter};
use actix_web::{HttpResponse, Responder, post, route, web};

#[post("")]
async fn subscriptions(router: web::Data<ModeRouter>, body: web::Bytes) -> impl Responder {
    router
        .dispatch(Invocation::Subscription(body.to_vec()))
        .await
        .into_response(router.cors_allowed_origin())
}

#[route("", method = "OPTIONS")]
async fn preflight(router: web::Data<ModeRouter>) -> HttpResponse {
    router
        .dispatch(Invocation::Preflight)
        .await
        .into_response(router.cors_allowed_origin())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(subscriptions).service(preflight);
}
