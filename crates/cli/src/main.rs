use anyhow::Context;
use clap::Parser;
use sift_core::config::QueryConfig;
use sift_core::filter::FilterCriteria;
use sift_db::repositories::ProductRepo;
use sift_db::DbConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run one filtered product search and print the page as JSON.
///
/// Connection and paging defaults come from the environment (or `.env`):
/// `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `DEFAULT_PAGE_SIZE`, `MAX_PAGE_SIZE`.
#[derive(Debug, Parser)]
#[command(name = "sift", version)]
struct Args {
    /// Filter criteria as a JSON object, e.g. '{"status":"ACTIVE","page":1,"size":2}'.
    /// Omit to list every live product.
    criteria: Option<String>,
}

impl Args {
    fn criteria(&self) -> anyhow::Result<FilterCriteria> {
        match self.criteria.as_deref() {
            Some(raw) => serde_json::from_str(raw).context("criteria must be a JSON object"),
            None => Ok(FilterCriteria::default()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sift_cli=info,sift_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let criteria = args.criteria()?;
    let db_config = DbConfig::from_env()?;
    let query_config = QueryConfig::from_env()?;

    let pool = sift_db::create_pool(&db_config)
        .await
        .context("failed to connect to database")?;
    sift_db::health_check(&pool).await?;
    tracing::info!(
        max_connections = db_config.max_connections,
        default_page_size = query_config.default_page_size,
        "Connected"
    );

    let page = ProductRepo::search(&pool, &criteria, &query_config).await?;
    tracing::info!(
        page = page.page,
        total = page.total_elements,
        "Search complete"
    );

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
