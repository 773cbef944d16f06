//! End-to-end runs of the verification flow against a local frontend.
//!
//! The frontend is a single HTML page served by axum. Its API calls are
//! answered by the route stubs, so no backend runs. These tests need
//! Chrome: `cargo test -p costcheck-cli -- --ignored`.

use axum::{Router, response::Html, routing::get};
use costcheck_browser::{DevServer, TestBrowser};
use costcheck_cli::config::VerifyConfig;
use costcheck_cli::scenario::{self, Outcome};
use costcheck_cli::{BrowserSession, CliError};
use std::path::Path;
use tokio::net::TcpListener;

/// Product page that loads its product from the API, renders tabs and,
/// once "Pricing & Values" is clicked, the misc cost inputs.
const FRONTEND: &str = r#"<!doctype html>
<html>
<head><title>Inventory</title></head>
<body>
  <div id="app">Loading...</div>
  <script>
    async function boot() {
      const app = document.getElementById('app');
      if (!location.pathname.startsWith('/inventory/product/')) {
        app.textContent = 'Home';
        return;
      }
      if (localStorage.getItem('token') !== 'mock_token') {
        app.textContent = 'Please sign in';
        return;
      }
      const id = location.pathname.split('/').pop();
      const me = await (await fetch('/api/auth/me')).json();
      const product = await (await fetch('/api/products/' + id)).json();
      await fetch('/api/products/' + id + '/sales-history?page=1&limit=15');
      await fetch('/api/notifications?unread=true');

      app.innerHTML = '';
      const header = document.createElement('h1');
      header.textContent = product.name + ' for ' + me.fullName;
      app.appendChild(header);

      const tab = document.createElement('button');
      tab.textContent = 'Pricing & Values';
      app.appendChild(tab);

      const panel = document.createElement('section');
      panel.style.display = 'none';
      const title = document.createElement('h2');
      title.textContent = 'Miscellaneous Costs';
      panel.appendChild(title);
      for (const cost of product.miscCosts) {
        const note = document.createElement('input');
        note.setAttribute('value', cost.note);
        panel.appendChild(note);
        const amount = document.createElement('input');
        amount.setAttribute('value', String(cost.amount));
        panel.appendChild(amount);
      }
      app.appendChild(panel);

      tab.addEventListener('click', () => { panel.style.display = 'block'; });
    }
    boot().catch(e => { console.error(String(e)); });
  </script>
</body>
</html>"#;

async fn frontend() -> Html<&'static str> {
    Html(FRONTEND)
}

/// Serves the frontend on an ephemeral port and returns its base URL.
async fn start_frontend() -> String {
    let app = Router::new()
        .route("/", get(frontend))
        .route("/inventory/product/{id}", get(frontend));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config_for(base_url: String, out_dir: &Path) -> VerifyConfig {
    VerifyConfig {
        base_url,
        out_dir: out_dir.to_path_buf(),
        ..VerifyConfig::default()
    }
}

fn is_png(path: &Path) -> bool {
    std::fs::read(path)
        .map(|bytes| bytes.starts_with(b"\x89PNG"))
        .unwrap_or(false)
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Chrome"]
async fn test_panel_is_verified() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(start_frontend().await, &dir.path().join("verification"));

    let browser = TestBrowser::launch(config.browser_config()).await.unwrap();
    let outcome = scenario::run(browser, &config).await;

    match outcome {
        Outcome::Verified { screenshot } => {
            assert_eq!(screenshot, config.verification_screenshot());
            assert!(is_png(&screenshot));
        }
        Outcome::Failed { error } => panic!("verification failed: {error}"),
    }
    assert!(!config.timeout_screenshot().exists());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Chrome"]
async fn test_missing_note_fails_the_assertion() {
    let dir = tempfile::tempdir().unwrap();
    let config = VerifyConfig {
        expected_note: "Shipping".to_string(),
        expect_timeout_ms: 1000,
        ..config_for(start_frontend().await, dir.path())
    };

    let browser = TestBrowser::launch(config.browser_config()).await.unwrap();
    let outcome = scenario::run(browser, &config).await;

    let Outcome::Failed { error } = outcome else {
        panic!("expected the assertion to fail");
    };
    assert!(matches!(
        error,
        CliError::Browser(costcheck_browser::BrowserError::AssertionFailed { .. })
    ));
    assert!(error.to_string().contains("input[value='Shipping']"));
    assert!(!config.verification_screenshot().exists());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Chrome"]
async fn test_missing_tab_writes_timeout_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = VerifyConfig {
        tab_text: "Shipping & Returns".to_string(),
        tab_timeout_ms: 1500,
        ..config_for(start_frontend().await, dir.path())
    };

    let browser = TestBrowser::launch(config.browser_config()).await.unwrap();
    let page = browser.open_page().await.unwrap();
    let err = scenario::verify_misc_costs(&page, &config)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(is_png(&config.timeout_screenshot()));

    drop(page);
    BrowserSession::close(browser).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Chrome"]
async fn test_stubs_answer_the_page() {
    let config = config_for(start_frontend().await, Path::new("unused"));
    let server = config.server();

    let browser = TestBrowser::launch(config.browser_config()).await.unwrap();
    let page = browser.new_page().await.unwrap();
    let routes = costcheck_cli::fixtures::route_table(config.product_id).unwrap();
    page.install_routes(routes.clone()).await.unwrap();

    page.navigate(&server.url("/")).await.unwrap();
    page.set_local_storage("token", "mock_token").await.unwrap();
    page.navigate(&server.url(&config.product_path())).await.unwrap();
    page.wait_for_selector("text=Pricing & Values", config.tab_wait())
        .await
        .unwrap();

    assert_eq!(routes.hits(r".*/api/products/123$"), 1);
    assert_eq!(routes.hits(r".*/api/auth/me"), 1);
    assert_eq!(routes.hits(r".*/api/products/123/sales-history"), 1);
    assert_eq!(routes.hits(r".*/api/notifications"), 1);
    assert_eq!(routes.hits(r".*/api/accounts$"), 0);
    assert_eq!(page.console().error_count(), 0);

    drop(page);
    browser.close().await.unwrap();
}
