use std::env;

use anyhow::{bail, Context};
use project_admin::{
    db::postgres::{create_pool, run_migrations},
    settings::AppConfig,
    telemetry::init_tracing,
    use_cases::admin::TrashFilter,
    utils::valid_uuid::valid_uuids,
    AppState,
};

const USAGE: &str = "usage: project_admin list [all|active|deleted] [search] | restore <id>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to create database connection pool")?;
    run_migrations(&pool).await?;

    let state = AppState::new(&config, pool);
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("list") => {
            let filter = match args.get(1) {
                Some(value) => value.parse::<TrashFilter>()?,
                None => TrashFilter::default(),
            };
            let projects = state
                .project_admin
                .list_projects(filter, args.get(2).map(String::as_str))
                .await?;

            for project in &projects {
                println!("{}", serde_json::to_string(project)?);
            }
            tracing::info!("Listed {} projects ({})", projects.len(), filter);
        }
        Some("restore") if args.len() > 1 => {
            let ids = valid_uuids(&args[1..])?;
            let restored = state.project_admin.restore_projects(&ids).await?;
            println!("{}", serde_json::json!({ "restored": restored }));
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
