use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rostersync_core::{RosterRow, RosterStore, SettingsStore};
use rostersync_entities::{roster, settings};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Schema, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::convert;

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("already exists")
}

/// Settings and roster tables behind one connection.
pub struct RosterDatabase {
    db: DatabaseConnection,
}

impl RosterDatabase {
    /// Connect to `database_url` (SQLite or Postgres) and create missing tables.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect_with(ConnectOptions::new(database_url)).await
    }

    pub async fn connect_with(options: ConnectOptions) -> anyhow::Result<Self> {
        info!("Connecting to database");
        let db = Database::connect(options)
            .await
            .context("Failed to connect to database")?;
        Self::from_connection(db).await
    }

    pub async fn from_connection(db: DatabaseConnection) -> anyhow::Result<Self> {
        create_table(&db, settings::Entity).await?;
        create_table(&db, roster::Entity).await?;
        info!("RosterDatabase initialized");
        Ok(Self { db })
    }

    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let stmt = schema.create_table_from_entity(entity);
    match db
        .execute_unprepared(&backend.build(&stmt).to_string())
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if is_table_already_exists_error(&e) => {
            debug!("Table {} already exists, skipping creation", entity.table_name());
            Ok(())
        }
        Err(e) => Err(e).context(format!("Failed to create table {}", entity.table_name())),
    }
}

#[async_trait]
impl SettingsStore for RosterDatabase {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let model = settings::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .with_context(|| format!("Failed to read setting '{key}'"))?;

        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now = Utc::now();
        let exists = settings::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await?
            .is_some();

        let model = settings::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            updated_at: Set(now),
        };

        if exists {
            settings::Entity::update(model).exec(&self.db).await?;
        } else {
            model.insert(&self.db).await?;
        }

        info!("Stored setting: {}", key);
        Ok(())
    }
}

#[async_trait]
impl RosterStore for RosterDatabase {
    async fn replace_all(&self, rows: &[RosterRow]) -> anyhow::Result<()> {
        let txn = self.db.begin().await.context("Failed to begin transaction")?;

        let deleted = roster::Entity::delete_many()
            .exec(&txn)
            .await
            .context("Failed to clear roster")?;

        if !rows.is_empty() {
            roster::Entity::insert_many(rows.iter().map(convert::roster_active_model))
                .exec_without_returning(&txn)
                .await
                .context("Failed to insert roster")?;
        }

        txn.commit().await.context("Failed to commit roster")?;

        info!(
            "Replaced roster: {} rows removed, {} inserted",
            deleted.rows_affected,
            rows.len()
        );
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<RosterRow>> {
        let models = roster::Entity::find()
            .order_by_asc(roster::Column::SortIndex)
            .all(&self.db)
            .await
            .context("Failed to load roster")?;

        Ok(models
            .into_iter()
            .map(convert::roster_row_from_model)
            .collect())
    }
}
