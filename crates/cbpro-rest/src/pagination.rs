//! Cursor pagination for list endpoints
//!
//! List endpoints return newest items first and put the cursor for the
//! next (older) page in the `CB-AFTER` header. Requesting again with
//! `after=<cursor>` continues from there.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{RestError, RestResult};
use crate::transport::{Params, Transport};

/// Follow `CB-AFTER` cursors and collect the items of every page
///
/// Stops when the cursor is missing or repeats, a page comes back empty,
/// or `limit` items have been collected (the result is truncated to
/// `limit`).
#[instrument(skip(transport, params))]
pub async fn paginate(
    transport: &dyn Transport,
    path: &str,
    params: &Params,
    limit: Option<usize>,
) -> RestResult<Vec<Value>> {
    let mut params = params.clone();
    let mut items = Vec::new();
    let mut pages = 0usize;

    loop {
        let page = transport.get_page(path, &params).await?;
        pages += 1;

        let batch = match page.body {
            Value::Array(batch) => batch,
            other => {
                return Err(RestError::Parse(format!(
                    "{path}: expected a JSON array page, got {other}"
                )))
            }
        };
        let exhausted = batch.is_empty();
        items.extend(batch);

        if let Some(limit) = limit {
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }
        }

        match page.after {
            Some(cursor) if !exhausted && params.get("after") != Some(&cursor) => {
                params.insert("after".to_string(), cursor);
            }
            _ => break,
        }
    }

    debug!(pages, items = items.len(), "Pagination complete");
    Ok(items)
}

/// [`paginate`] and decode every item into `R`
pub async fn paginate_as<R: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    params: &Params,
    limit: Option<usize>,
) -> RestResult<Vec<R>> {
    paginate(transport, path, params, limit)
        .await?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| RestError::Parse(format!("{path}: {e}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, Page};
    use serde_json::json;

    const PATH: &str = "/products/BTC-USD/trades";

    #[tokio::test]
    async fn test_follows_cursor_until_missing() {
        let transport = MockTransport::new();
        transport.push_page(Page::new(json!([5, 4])).with_after("4"));
        transport.push_page(Page::new(json!([3, 2])).with_after("2"));
        transport.push_page(Page::new(json!([1])));

        let items = paginate(&transport, PATH, &Params::new(), None).await.unwrap();
        assert_eq!(items, vec![json!(5), json!(4), json!(3), json!(2), json!(1)]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].params.get("after"), None);
        assert_eq!(requests[1].params.get("after").map(String::as_str), Some("4"));
        assert_eq!(requests[2].params.get("after").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_stops_at_limit() {
        let transport = MockTransport::new();
        transport.push_page(Page::new(json!([5, 4])).with_after("4"));
        transport.push_page(Page::new(json!([3, 2])).with_after("2"));

        let items = paginate(&transport, PATH, &Params::new(), Some(3)).await.unwrap();
        assert_eq!(items, vec![json!(5), json!(4), json!(3)]);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page_or_repeated_cursor() {
        let transport = MockTransport::new();
        transport.push_page(Page::new(json!([])).with_after("9"));
        let items = paginate(&transport, PATH, &Params::new(), None).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.request_count(), 1);

        let transport = MockTransport::new();
        transport.push_page(Page::new(json!([2])).with_after("1"));
        transport.push_page(Page::new(json!([1])).with_after("1"));
        let items = paginate(&transport, PATH, &Params::new(), None).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_error_mid_pagination_aborts() {
        let transport = MockTransport::new();
        transport.push_page(Page::new(json!([2])).with_after("2"));
        transport.push_error(RestError::from_status(500, b"oops"));

        let result = paginate(&transport, PATH, &Params::new(), None).await;
        assert_eq!(result.unwrap_err().status(), Some(500));
    }

    #[tokio::test]
    async fn test_non_array_page_is_parse_error() {
        let transport = MockTransport::new();
        transport.push_json(json!({"message": "not a list"}));

        let result = paginate(&transport, PATH, &Params::new(), None).await;
        assert!(matches!(result, Err(RestError::Parse(_))));
    }
}
