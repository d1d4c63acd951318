use inkwell_infra::AppConfig;
use inkwell_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = std::env::var("INKWELL_LOG_FORMAT").unwrap_or_default();
    inkwell_observability::init_with(LogFormat::from_name(&format));

    let config = AppConfig::from_env()?;
    inkwell_api::server::run(config).await
}
