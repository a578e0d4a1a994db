pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Registers every `/api` route. The caller wraps the scope in `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::login)
        .service(auth::me)
        .service(auth::change_password)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::complete_task)
        .service(tasks::delete_task);
}
