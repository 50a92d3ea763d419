use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::views::FeedResponse;
use crate::models::FeedFilter;
use crate::services::FeedService;

/// Query string of `GET /v1/post`.
///
/// `offset` is a page index, not a row offset. Tags may be given as repeated
/// `searchTag` or `searchTag[]` keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedQueryParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    pub search_tags: Vec<String>,
}

pub(crate) fn parse_count(key: &str, raw: &str) -> Result<Option<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", key)))
}

impl FeedQueryParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut params = FeedQueryParams::default();

        for (key, value) in pairs {
            match key.as_str() {
                "limit" => params.limit = parse_count("limit", &value)?,
                "offset" => params.offset = parse_count("offset", &value)?,
                "search" => params.search = Some(value),
                "searchTag" | "searchTag[]" => {
                    if !value.is_empty() {
                        params.search_tags.push(value);
                    }
                }
                _ => {}
            }
        }

        Ok(params)
    }

    pub fn into_filter(self, max_page_size: u32) -> Result<FeedFilter> {
        let page_size = self.limit.unwrap_or(0);
        if page_size > max_page_size {
            return Err(AppError::BadRequest(format!(
                "limit must not exceed {}",
                max_page_size
            )));
        }

        Ok(FeedFilter {
            search: self.search,
            tags: self.search_tags,
            page_size,
            page_index: self.offset.unwrap_or(0),
        })
    }
}

pub struct FeedHandlerState {
    pub feed: Arc<FeedService>,
    pub max_page_size: u32,
}

pub async fn get_feed(
    query: web::Query<Vec<(String, String)>>,
    user: UserId,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let filter = FeedQueryParams::from_pairs(query.into_inner())?.into_filter(state.max_page_size)?;

    debug!(
        user_id = %user.0,
        limit = filter.page_size,
        page = filter.page_index,
        tags = filter.tags.len(),
        "Feed request"
    );

    let feed = state.feed.get_feed(&user.0, &filter).await?;

    Ok(HttpResponse::Ok().json(FeedResponse::from(feed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::feed_store::{FeedQuery, MockFeedStore};
    use crate::error::FeedError;
    use crate::middleware::jwt_auth::{sign_token, JwtAuthMiddleware};
    use crate::services::FeedSettings;
    use actix_web::{http::StatusCode, test as actix_test, App};

    const SECRET: &str = "handler-secret";

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_tags_and_page_index() {
        let params = FeedQueryParams::from_pairs(pairs(&[
            ("limit", "10"),
            ("offset", "2"),
            ("search", "rust"),
            ("searchTag", "a"),
            ("searchTag[]", "b"),
            ("searchTag", ""),
            ("unknown", "x"),
        ]))
        .unwrap();

        assert_eq!(params.limit, Some(10));
        assert_eq!(params.offset, Some(2));
        assert_eq!(params.search.as_deref(), Some("rust"));
        assert_eq!(params.search_tags, vec!["a", "b"]);

        let filter = params.into_filter(100).unwrap();
        assert_eq!(filter.page_size, 10);
        assert_eq!(filter.page_index, 2);
    }

    #[test]
    fn test_invalid_numbers_are_bad_requests() {
        for bad in ["-1", "abc", "1.5"] {
            let err = FeedQueryParams::from_pairs(pairs(&[("limit", bad)])).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
        let err = FeedQueryParams::from_pairs(pairs(&[("offset", "x")])).unwrap_err();
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn test_limit_above_cap_is_rejected() {
        let params = FeedQueryParams::from_pairs(pairs(&[("limit", "101")])).unwrap();
        assert!(matches!(
            params.into_filter(100),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_absent_values_use_defaults() {
        let filter = FeedQueryParams::from_pairs(pairs(&[("limit", "")]))
            .unwrap()
            .into_filter(100)
            .unwrap();
        assert_eq!(filter, FeedFilter::default());
    }

    async fn call(store: MockFeedStore, uri: &str) -> (StatusCode, serde_json::Value) {
        let state = web::Data::new(FeedHandlerState {
            feed: Arc::new(FeedService::new(Arc::new(store), FeedSettings::default())),
            max_page_size: 100,
        });
        let app = actix_test::init_service(
            App::new().app_data(state).service(
                web::scope("/v1")
                    .wrap(JwtAuthMiddleware::new(SECRET))
                    .route("/post", web::get().to(get_feed)),
            ),
        )
        .await;

        let token = sign_token(SECRET, "u1", 60).unwrap();
        let req = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        let status = resp.status();
        (status, actix_test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_empty_feed_returns_ok_with_zero_total() {
        let mut store = MockFeedStore::new();
        store
            .expect_fetch_page()
            .withf(|q: &FeedQuery| q.page.limit == 5 && q.page.offset == 5)
            .returning(|_| Ok(vec![]));
        store.expect_count_matching().returning(|_| Ok(0));

        let (status, body) = call(store, "/v1/post?offset=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "ok");
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["meta"]["limit"], 5);
        assert_eq!(body["meta"]["offset"], 5);
        assert_eq!(body["meta"]["total"], 0);
    }

    #[actix_web::test]
    async fn test_transient_failure_is_service_unavailable() {
        let mut store = MockFeedStore::new();
        store
            .expect_fetch_page()
            .returning(|_| Err(FeedError::Transient("pool timed out".into())));
        store.expect_count_matching().returning(|_| Ok(0));

        let (status, body) = call(store, "/v1/post").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], 503);
        assert!(!body["error"].as_str().unwrap().contains("pool"));
    }

    #[actix_web::test]
    async fn test_bad_limit_never_reaches_store() {
        let store = MockFeedStore::new();
        let (status, body) = call(store, "/v1/post?limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }
}
