//! Create posts table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Posts::Text).text().not_null())
                    .col(
                        ColumnDef::new(Posts::PubDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Posts::Image).string_len(1024))
                    .col(
                        ColumnDef::new(Posts::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Posts::LocationId).uuid())
                    .col(ColumnDef::new(Posts::CategoryId).uuid())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author_id")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_category_id")
                            .from(Posts::Table, Posts::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_location_id")
                            .from(Posts::Table, Posts::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing order: newest publication first
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_pub_date")
                    .table(Posts::Table)
                    .col(Posts::PubDate)
                    .to_owned(),
            )
            .await?;

        // Profile pages
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_author_id_pub_date")
                    .table(Posts::Table)
                    .col(Posts::AuthorId)
                    .col(Posts::PubDate)
                    .to_owned(),
            )
            .await?;

        // Category pages
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_category_id")
                    .table(Posts::Table)
                    .col(Posts::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_location_id")
                    .table(Posts::Table)
                    .col(Posts::LocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    AuthorId,
    Title,
    Text,
    PubDate,
    Image,
    IsPublished,
    LocationId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
}
