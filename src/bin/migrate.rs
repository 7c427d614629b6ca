use sea_orm_migration::MigratorTrait;
use skillzio_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    migration::Migrator,
};

/// `migrate` applies pending migrations, `migrate down` rolls back the last
/// one and `migrate status` lists what is still pending.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;

    match std::env::args().nth(1).as_deref() {
        None | Some("up") => {
            run_migrations(&orm).await?;
            println!("Migrations applied");
        }
        Some("down") => {
            Migrator::down(&orm, Some(1)).await?;
            println!("Rolled back one migration");
        }
        Some("status") => {
            let pending = Migrator::get_pending_migrations(&orm).await?;
            if pending.is_empty() {
                println!("Schema is up to date");
            }
            for migration in pending {
                println!("pending: {}", migration.name());
            }
        }
        Some(other) => anyhow::bail!("unknown command `{other}`; expected up, down or status"),
    }
    Ok(())
}
