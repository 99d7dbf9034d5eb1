//! Auth middleware.

use std::sync::Arc;

use pricedrop_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use crate::{extensions::*, state::State};

/// Resolve the bearer token to a shop and expose it to downstream handlers.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let shop = match state.app.auth.authenticate_bearer(token).await {
        Ok(shop) => shop,
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_shop_uuid(shop);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
