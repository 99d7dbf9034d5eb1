//! App Router

use salvo::Router;

use crate::{auth, sales, scheduler};

pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("scheduler/tick").post(scheduler::tick::handler))
        .push(
            Router::with_path("sales")
                .get(sales::index::handler)
                .post(sales::create::handler)
                .push(
                    Router::with_path("{sale}")
                        .get(sales::get::handler)
                        .put(sales::update::handler)
                        .delete(sales::delete::handler)
                        .push(Router::with_path("activate").post(sales::activate::handler))
                        .push(Router::with_path("deactivate").post(sales::deactivate::handler)),
                ),
        )
}
