use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    AuditLogs, CartItems, Categories, Certificates, Chapters, Courses, Quizzes, Users,
    WishlistItems, cart_items, certificates, chapters, wishlist_items,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Referenced tables first so foreign keys resolve.
        create_table(manager, &schema, Users).await?;
        create_table(manager, &schema, Categories).await?;
        create_table(manager, &schema, Courses).await?;
        create_table(manager, &schema, Chapters).await?;
        create_table(manager, &schema, Quizzes).await?;
        create_table(manager, &schema, CartItems).await?;
        create_table(manager, &schema, WishlistItems).await?;
        create_table(manager, &schema, Certificates).await?;
        create_table(manager, &schema, AuditLogs).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cart_items_student_course")
                    .table(CartItems)
                    .col(cart_items::Column::StudentId)
                    .col(cart_items::Column::CourseId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_wishlist_items_student_course")
                    .table(WishlistItems)
                    .col(wishlist_items::Column::StudentId)
                    .col(wishlist_items::Column::CourseId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_certificates_student_course")
                    .table(Certificates)
                    .col(certificates::Column::StudentId)
                    .col(certificates::Column::CourseId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_chapters_course_number")
                    .table(Chapters)
                    .col(chapters::Column::CourseId)
                    .col(chapters::Column::ChapterNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, AuditLogs).await?;
        drop_table(manager, Certificates).await?;
        drop_table(manager, WishlistItems).await?;
        drop_table(manager, CartItems).await?;
        drop_table(manager, Quizzes).await?;
        drop_table(manager, Chapters).await?;
        drop_table(manager, Courses).await?;
        drop_table(manager, Categories).await?;
        drop_table(manager, Users).await
    }
}

async fn create_table<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    manager.create_table(stmt).await
}

async fn drop_table<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
