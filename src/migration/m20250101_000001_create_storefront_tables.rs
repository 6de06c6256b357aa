use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    AuditLogs, CartLines, Carts, Categories, Customers, Orders, Products, Sessions, Users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children so foreign keys resolve on Postgres.
        manager.create_table(schema.create_table_from_entity(Users)).await?;
        manager.create_table(schema.create_table_from_entity(Customers)).await?;
        manager.create_table(schema.create_table_from_entity(Categories)).await?;
        manager.create_table(schema.create_table_from_entity(Products)).await?;
        manager.create_table(schema.create_table_from_entity(Carts)).await?;
        manager.create_table(schema.create_table_from_entity(CartLines)).await?;
        manager.create_table(schema.create_table_from_entity(Orders)).await?;
        manager.create_table(schema.create_table_from_entity(Sessions)).await?;
        manager.create_table(schema.create_table_from_entity(AuditLogs)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, AuditLogs).await?;
        drop_table(manager, Sessions).await?;
        drop_table(manager, Orders).await?;
        drop_table(manager, CartLines).await?;
        drop_table(manager, Carts).await?;
        drop_table(manager, Products).await?;
        drop_table(manager, Categories).await?;
        drop_table(manager, Customers).await?;
        drop_table(manager, Users).await?;
        Ok(())
    }
}

async fn drop_table<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
