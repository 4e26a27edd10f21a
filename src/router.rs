use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, auth, categories, expenses, incomes, piggy_banks, reports};

async fn root() -> &'static str {
    "Cofrinho API ready"
}

/// Every API route. CORS is applied only when a layer is supplied.
pub fn build_router(app_state: AppState, cors: Option<CorsLayer>) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/incomes",
            get(incomes::list_incomes).post(incomes::create_income),
        )
        .route(
            "/incomes/{id}",
            put(incomes::update_income).delete(incomes::delete_income),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            put(expenses::update_expense).delete(expenses::delete_expense),
        )
        .route(
            "/piggy-banks",
            get(piggy_banks::list_piggy_banks).post(piggy_banks::create_piggy_bank),
        )
        .route(
            "/piggy-banks/transactions",
            post(piggy_banks::create_transaction),
        )
        .route(
            "/piggy-banks/{id}",
            put(piggy_banks::update_piggy_bank).delete(piggy_banks::delete_piggy_bank),
        )
        .route(
            "/piggy-banks/{id}/transactions",
            get(piggy_banks::list_transactions),
        )
        .route("/reports/yearly-comparison", get(reports::yearly_comparison))
        .route(
            "/reports/expenses-by-category",
            get(reports::expenses_by_category),
        )
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(app_state)
}
