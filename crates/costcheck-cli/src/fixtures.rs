//! Backend fixtures served to the frontend during a run.
//!
//! Ten route stubs cover every API call the product page makes on load. The
//! product id is spliced (regex-escaped) into the patterns and into the
//! product body; everything else is fixed.

use costcheck_browser::{RouteResponse, RouteTable};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;

/// The product returned for `/api/products/{id}`.
///
/// Its misc costs are what the "Miscellaneous Costs" panel renders; the
/// flow looks for the input holding the first note.
#[must_use]
pub fn product(product_id: u64) -> Value {
    json!({
        "id": format!("uuid-{product_id}"),
        "wooId": product_id,
        "name": "Test Product",
        "sku": format!("SKU-{product_id}"),
        "price": "100.00",
        "salePrice": "",
        "stockStatus": "instock",
        "cogs": "50.00",
        "miscCosts": [
            {"amount": 5, "note": "Handling"},
            {"amount": 2.50, "note": "Label"}
        ],
        "type": "simple",
        "images": []
    })
}

/// Every stub as `(pattern, body)`, in registration order.
#[must_use]
pub fn stubs(product_id: u64) -> Vec<(String, Value)> {
    let id = regex::escape(&product_id.to_string());
    vec![
        (format!(r".*/api/products/{id}$"), product(product_id)),
        (r".*/api/inventory/suppliers".to_string(), json!([])),
        (
            r".*/api/auth/me".to_string(),
            json!({"id": "user1", "email": "test@example.com", "fullName": "Test User"}),
        ),
        (
            r".*/api/accounts$".to_string(),
            json!([{"id": "acc1", "name": "Test Account"}]),
        ),
        (
            format!(r".*/api/products/{id}/sales-history"),
            json!({"sales": [], "total": 0, "page": 1, "limit": 15, "totalPages": 1}),
        ),
        (
            r".*/api/inventory/products/.*/bom".to_string(),
            json!({"items": []}),
        ),
        (format!(r".*/api/audits/PRODUCT/{id}"), json!([])),
        (r".*/api/sync/status".to_string(), json!({"active": false})),
        (r".*/api/notifications".to_string(), json!([])),
        (r".*/api/chat/unread-count".to_string(), json!({"count": 0})),
    ]
}

/// Builds the route table installed on the page before navigation.
///
/// # Errors
///
/// Returns a browser `RouteSetupFailed` error if a pattern fails to compile.
pub fn route_table(product_id: u64) -> Result<RouteTable> {
    let mut routes = RouteTable::new();
    for (pattern, body) in stubs(product_id) {
        routes.route(&pattern, RouteResponse::json(&body))?;
    }
    Ok(routes)
}

/// One row of the `routes` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    /// URL regex
    pub pattern: String,
    /// HTTP status served
    pub status: u16,
    /// Response body
    pub body: Value,
}

/// The stub table in printable form.
#[must_use]
pub fn describe(product_id: u64) -> Vec<RouteRow> {
    stubs(product_id)
        .into_iter()
        .map(|(pattern, body)| RouteRow {
            pattern,
            status: 200,
            body,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "http://localhost:5173";

    fn served(routes: &RouteTable, path: &str) -> Option<Value> {
        routes
            .lookup(&format!("{ORIGIN}{path}"))
            .map(|stub| serde_json::from_str(&stub.response().body).unwrap())
    }

    #[test]
    fn every_page_load_call_is_stubbed() {
        let routes = route_table(123).unwrap();
        assert_eq!(routes.len(), 10);

        for path in [
            "/api/products/123",
            "/api/inventory/suppliers",
            "/api/auth/me",
            "/api/accounts",
            "/api/products/123/sales-history?page=1&limit=15",
            "/api/inventory/products/uuid-123/bom",
            "/api/audits/PRODUCT/123",
            "/api/sync/status",
            "/api/notifications?unread=true",
            "/api/chat/unread-count",
        ] {
            assert!(served(&routes, path).is_some(), "{path} is not stubbed");
        }
    }

    #[test]
    fn product_and_sales_history_do_not_collide() {
        let routes = route_table(123).unwrap();

        let product = served(&routes, "/api/products/123").unwrap();
        assert_eq!(product["miscCosts"][0]["note"], "Handling");
        assert_eq!(product["miscCosts"][1]["amount"], 2.5);

        let history = served(&routes, "/api/products/123/sales-history").unwrap();
        assert_eq!(history["limit"], 15);
        assert_eq!(history["totalPages"], 1);
    }

    #[test]
    fn anchored_patterns_leave_other_paths_to_the_network() {
        let routes = route_table(123).unwrap();
        assert!(served(&routes, "/api/accounts/acc1").is_none());
        assert!(served(&routes, "/api/products/1234").is_none());
        assert!(served(&routes, "/inventory/product/123").is_none());
        assert!(served(&routes, "/src/main.tsx").is_none());
    }

    #[test]
    fn product_id_is_threaded_through() {
        let body = product(42);
        assert_eq!(body["id"], "uuid-42");
        assert_eq!(body["wooId"], 42);
        assert_eq!(body["sku"], "SKU-42");

        let routes = route_table(42).unwrap();
        assert!(served(&routes, "/api/audits/PRODUCT/42").is_some());
        assert!(served(&routes, "/api/audits/PRODUCT/123").is_none());
    }

    #[test]
    fn fixed_bodies_match_the_backend_shapes() {
        let routes = route_table(123).unwrap();
        assert_eq!(
            served(&routes, "/api/auth/me").unwrap(),
            json!({"id": "user1", "email": "test@example.com", "fullName": "Test User"})
        );
        assert_eq!(served(&routes, "/api/sync/status").unwrap(), json!({"active": false}));
        assert_eq!(served(&routes, "/api/chat/unread-count").unwrap(), json!({"count": 0}));
        assert_eq!(served(&routes, "/api/inventory/suppliers").unwrap(), json!([]));

        for stub in routes.iter() {
            assert_eq!(stub.response().status, 200);
            assert_eq!(stub.response().content_type, "application/json");
        }
    }

    #[test]
    fn describe_lists_rows_in_registration_order() {
        let rows = describe(123);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].pattern, r".*/api/products/123$");
        assert_eq!(rows[9].pattern, r".*/api/chat/unread-count");
        assert!(rows.iter().all(|row| row.status == 200));
    }
}
