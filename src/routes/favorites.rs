use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, FavoritesResponse, RestaurantView, ToggleFavoriteResponse};
use crate::routes::restaurants::{bad_request, not_found, records_unavailable, AppState};
use crate::services::StoreError;

/// Configure favorites routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/favorites/{client_id}", web::get().to(list_favorites))
        .route(
            "/favorites/{client_id}/{restaurant_id}",
            web::post().to(toggle_favorite),
        );
}

fn store_failed(client_id: &str, e: &StoreError) -> HttpResponse {
    tracing::error!("Favorites store failed for {}: {}", client_id, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Favorites unavailable".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

fn check_client_id(client_id: &str) -> Result<(), HttpResponse> {
    if client_id.trim().is_empty() || client_id.len() > 64 {
        return Err(bad_request(
            "Validation failed",
            "client_id must be 1 to 64 characters".to_string(),
        ));
    }
    Ok(())
}

/// List a client's favorites
///
/// GET /api/v1/favorites/{client_id}
async fn list_favorites(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let client_id = path.into_inner();
    if let Err(response) = check_client_id(&client_id) {
        return response;
    }

    let snapshot = match state.records.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return records_unavailable(&e),
    };

    let records = match state.favorites.favorite_records(&client_id, &snapshot).await {
        Ok(records) => records,
        Err(e) => return store_failed(&client_id, &e),
    };

    let favorites: Vec<RestaurantView> = records
        .iter()
        .map(|record| RestaurantView {
            is_favorite: Some(true),
            ..RestaurantView::from(&**record)
        })
        .collect();

    HttpResponse::Ok().json(FavoritesResponse {
        count: favorites.len(),
        client_id,
        favorites,
    })
}

/// Toggle a restaurant in a client's favorites
///
/// POST /api/v1/favorites/{client_id}/{restaurant_id}
async fn toggle_favorite(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (client_id, restaurant_id) = path.into_inner();
    if let Err(response) = check_client_id(&client_id) {
        return response;
    }

    match state.records.find(&restaurant_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(&restaurant_id),
        Err(e) => return records_unavailable(&e),
    }

    let is_favorite = match state.favorites.toggle(&client_id, &restaurant_id).await {
        Ok(is_favorite) => is_favorite,
        Err(e) => return store_failed(&client_id, &e),
    };

    tracing::info!(
        "Client {} {} restaurant {}",
        client_id,
        if is_favorite { "added" } else { "removed" },
        restaurant_id
    );

    HttpResponse::Ok().json(ToggleFavoriteResponse {
        restaurant_id,
        is_favorite,
    })
}
