use std::sync::Arc;

use anyhow::Result;
use dcg_config::definition::DefinitionConfig;
use dcg_data::{DataDriver, DefaultDriver};
use dcg_db_sqlite::db::SqliteDb;
use dcg_environment::{DataDefinition, DataProviderInformation, Environment};

mod config_path;

fn data_definition(config: &DefinitionConfig) -> DataDefinition {
    let mut definition = DataDefinition::new(config.name());
    for provider in config.data_providers() {
        let mut information = DataProviderInformation::new(provider.name(), provider.table());
        if let Some(data) = provider.initialization_data() {
            information.set_initialization_data(data.clone());
        }
        definition.add_data_provider(information);
    }
    definition
}

async fn report(db: &SqliteDb, environment: &Environment<DefaultDriver>) -> Result<()> {
    for name in environment.data_driver_names() {
        let Some(driver) = environment.data_driver(Some(name)) else {
            continue;
        };
        let table = driver.source()?;

        if !db.check_table_existence(table).await? {
            dcg_log::warn(
                None,
                format!("[DcGeneral] Data provider {name}: table {table} does not exist"),
            );
            continue;
        }

        let count = driver.count(&driver.empty_config()).await?;
        dcg_log::info(
            Some("📦"),
            format!("[DcGeneral] Data provider {name}: table {table} holds {count} row(s)"),
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path::get()?;
    let config = dcg_config::from_path(&config_path)?;

    dcg_log::init(config.log().display_level(), config.log().level_filter())?;

    dcg_log::info(Some("🚀"), "[DcGeneral] Starting");

    let db = Arc::new(
        SqliteDb::new(
            config.db().sqlite().path(),
            config.db().sqlite().max_connections(),
        )
        .await?,
    );

    let mut environment = Environment::<DefaultDriver>::new();
    environment.set_data_definition(data_definition(config.definition()));
    if let Err(err) = environment.register_providers(&db, config.user().id()) {
        dcg_log::error(None, format!("[DcGeneral] Registering data providers failed: {err}"));
        return Err(err.into());
    }

    dcg_log::info(
        Some("👤"),
        format!(
            "[DcGeneral] Acting as {} (id {})",
            config.user().username(),
            config.user().id()
        ),
    );

    report(&db, &environment).await?;

    dcg_log::info(Some("👋"), "[DcGeneral] Done");

    Ok(())
}
