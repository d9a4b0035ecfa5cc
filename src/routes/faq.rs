use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use crate::{
    AppState,
    models::{SearchQuery, SearchResponse},
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/faq/search", get(search_faq))
}

async fn search_faq(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let response = state.faq.search(&query.q);
    tracing::debug!(
        term = %response.term,
        visible = response.faq.iter().filter(|f| f.visible).count(),
        "FAQ search served"
    );
    Json(SearchResponse::clone(&response))
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::test_app;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn search(uri: &str) -> serde_json::Value {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_query_prompts() {
        let json = search("/faq/search").await;
        assert_eq!(json["term"], "");
        assert_eq!(json["articles"]["status"], "prompt");
        assert!(json["faq"]
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f["visible"] == true));
    }

    #[tokio::test]
    async fn keyword_query_returns_matching_articles() {
        let json = search("/faq/search?q=%20Register%20").await;
        assert_eq!(json["term"], "Register");
        assert_eq!(json["articles"]["status"], "matches");
        assert_eq!(
            json["articles"]["items"][0]["url"],
            "how-to-register.html"
        );
    }

    #[tokio::test]
    async fn unmatched_query_reports_no_matches() {
        let json = search("/faq/search?q=quasar").await;
        assert_eq!(json["articles"]["status"], "no_matches");
        assert_eq!(
            json["articles"]["message"],
            "No related guides found. Try different keywords."
        );
        assert!(json["faq"]
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f["visible"] == false));
    }
}
