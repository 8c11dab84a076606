use actix_web::{web, HttpResponse};

use crate::dto::SearchParams;
use crate::AppState;

pub async fn search_products(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> crate::Result<HttpResponse> {
    let query = params
        .into_inner()
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(crate::error::missing_query)?;

    let limit = state.config.search.result_limit;
    let products = web::block(move || state.catalog.search(&query, limit))
        .await
        .unwrap_or_else(|err| {
            log::error!("Search task failed: {}", err);
            Vec::new()
        });

    Ok(HttpResponse::Ok().json(products))
}
