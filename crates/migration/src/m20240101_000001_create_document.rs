//! Create `document` table.
//! Holds groups, tasks and milestones as JSON bodies keyed by an opaque id.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(string_len(Document::Id, 64).primary_key())
                    .col(string_len(Document::Collection, 32).not_null())
                    .col(string_len_null(Document::ParentId, 64))
                    .col(json_binary(Document::Body).not_null())
                    .to_owned(),
            )
            .await?;

        // No foreign key on parent_id: children may outlive their parent
        manager
            .create_index(
                Index::create()
                    .name("idx_document_collection_parent")
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::ParentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Document::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    Collection,
    ParentId,
    Body,
}
