use axum_storefront_api::{config::AppConfig, db::create_orm_conn, migration::Migrator};
use sea_orm_migration::MigratorTrait;

/// `migrate [up|down|fresh]`, defaulting to `up`. `down` reverts the latest migration.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;

    match command.as_str() {
        "up" => Migrator::up(&orm, None).await?,
        "down" => Migrator::down(&orm, Some(1)).await?,
        "fresh" => Migrator::fresh(&orm).await?,
        other => anyhow::bail!("unknown command `{other}`, expected up, down or fresh"),
    }
    println!("Migration `{command}` done");
    Ok(())
}
