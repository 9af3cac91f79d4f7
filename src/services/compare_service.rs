use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::compare::{AddCompareRequest, ComparisonView},
    engine::compare::{self, CompareAdd, ComparisonSet, MAX_COMPARED},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_comparison(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<ComparisonView>> {
    let set = state.sessions.comparison(session.as_str());
    let products: Vec<Product> = set
        .ids()
        .iter()
        .filter_map(|id| state.catalog.get(*id))
        .collect();
    let rows = compare::comparison_table(&products);

    Ok(ApiResponse::success(
        "Comparison",
        ComparisonView { products, rows },
        Some(Meta::empty()),
    ))
}

pub async fn add_to_comparison(
    state: &AppState,
    session: &SessionId,
    payload: AddCompareRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = state
        .catalog
        .get(payload.product_id)
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::BadRequest("Product not found".into()))?;

    let outcome = state
        .sessions
        .with_comparison(session.as_str(), |set| set.add(product.id));

    let message = match outcome {
        CompareAdd::Added => {
            log_audit(
                session.as_str(),
                "compare_add",
                Some("comparison"),
                Some(serde_json::json!({ "product_id": product.id })),
            );
            "Added to comparison"
        }
        CompareAdd::AlreadyPresent => "Product is already in comparison",
        CompareAdd::Full => {
            return Err(AppError::BadRequest(format!(
                "You can only compare up to {MAX_COMPARED} products at once"
            )));
        }
    };

    Ok(ApiResponse::success(
        message,
        serde_json::json!({ "product_id": product.id }),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_comparison(
    state: &AppState,
    session: &SessionId,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state
        .sessions
        .with_comparison(session.as_str(), |set| set.remove(product_id));

    if !removed {
        return Err(AppError::NotFound);
    }

    log_audit(
        session.as_str(),
        "compare_remove",
        Some("comparison"),
        Some(serde_json::json!({ "product_id": product_id })),
    );

    Ok(ApiResponse::success(
        "Removed from comparison",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_comparison(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .sessions
        .with_comparison(session.as_str(), ComparisonSet::clear);

    log_audit(session.as_str(), "compare_clear", Some("comparison"), None);

    Ok(ApiResponse::success(
        "Comparison cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
