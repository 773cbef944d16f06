//! Run command implementation.

use costcheck_browser::TestBrowser;
use tracing::{debug, info};

use crate::cli::RunArgs;
use crate::config::VerifyConfig;
use crate::error::{CliError, Result};
use crate::scenario;

/// Execute the run command.
///
/// # Steps
///
/// 1. Merge defaults, config file, environment and flags
/// 2. Launch Chrome
/// 3. Run the verification flow, which always closes the browser
///
/// # Errors
///
/// Returns configuration errors and launch failures. A failed verification
/// is reported by the flow and only returned when `failOnError` is set.
pub async fn execute(args: RunArgs) -> Result<()> {
    let config = VerifyConfig::load(args.config.as_deref(), &args.overrides())?;
    debug!(?config, "resolved configuration");
    check_chrome_path(&config)?;

    info!(
        base_url = %config.base_url,
        product_id = config.product_id,
        headless = config.headless,
        "launching browser"
    );
    let browser = TestBrowser::launch(config.browser_config()).await?;

    scenario::run(browser, &config)
        .await
        .into_result(config.fail_on_error)
}

fn check_chrome_path(config: &VerifyConfig) -> Result<()> {
    match &config.chrome_path {
        Some(path) if !path.exists() => Err(CliError::FileNotFound(path.clone())),
        _ => Ok(()),
    }
}
