use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::Position).integer().not_null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::DueDate).date().not_null())
                    .col(ColumnDef::new(Tasks::Priority).string().not_null())
                    .col(ColumnDef::new(Tasks::Completed).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issues::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Issues::Position).integer().not_null())
                    .col(ColumnDef::new(Issues::Title).string().not_null())
                    .col(ColumnDef::new(Issues::Status).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CropPlanEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CropPlanEvents::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(CropPlanEvents::Position).integer().not_null())
                    .col(ColumnDef::new(CropPlanEvents::Title).string().not_null().default(""))
                    .col(ColumnDef::new(CropPlanEvents::Date).date().not_null())
                    .to_owned(),
            )
            .await?;

        // All seven plan categories share this table and its id space
        manager
            .create_table(
                Table::create()
                    .table(PlanItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlanItems::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(PlanItems::Position).integer().not_null())
                    .col(ColumnDef::new(PlanItems::PlanType).string_len(32).not_null())
                    .col(ColumnDef::new(PlanItems::Description).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_items_plan_type")
                    .table(PlanItems::Table)
                    .col(PlanItems::PlanType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlanItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CropPlanEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Position,
    Title,
    DueDate,
    Priority,
    Completed,
}

#[derive(DeriveIden)]
enum Issues {
    Table,
    Id,
    Position,
    Title,
    Status,
}

#[derive(DeriveIden)]
enum CropPlanEvents {
    Table,
    Id,
    Position,
    Title,
    Date,
}

#[derive(DeriveIden)]
enum PlanItems {
    Table,
    Id,
    Position,
    PlanType,
    Description,
}
