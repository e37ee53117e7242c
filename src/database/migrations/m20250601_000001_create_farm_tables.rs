use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Farm ids are client-assigned, so no auto_increment
        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farms::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Farms::Position).integer().not_null())
                    .col(ColumnDef::new(Farms::Name).string().not_null())
                    .col(ColumnDef::new(Farms::Size).string().not_null())
                    .col(ColumnDef::new(Farms::Crop).string().not_null())
                    .col(ColumnDef::new(Farms::SoilType).string().not_null().default(""))
                    .col(ColumnDef::new(Farms::SlopeRatio).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WaterHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaterHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WaterHistory::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(WaterHistory::Amount).integer().not_null())
                    .col(ColumnDef::new(WaterHistory::Date).date().not_null())
                    .col(ColumnDef::new(WaterHistory::Efficiency).integer().null())
                    .foreign_key(&mut farm_fk("fk_water_history_farm_id", WaterHistory::Table, WaterHistory::FarmId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FertilizerHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FertilizerHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FertilizerHistory::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(FertilizerHistory::FertilizerType).string().not_null())
                    .col(ColumnDef::new(FertilizerHistory::Amount).integer().not_null())
                    .col(ColumnDef::new(FertilizerHistory::Date).date().not_null())
                    .foreign_key(&mut farm_fk(
                        "fk_fertilizer_history_farm_id",
                        FertilizerHistory::Table,
                        FertilizerHistory::FarmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HarvestHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HarvestHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HarvestHistory::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(HarvestHistory::YieldAmount).integer().not_null())
                    .col(ColumnDef::new(HarvestHistory::Date).date().not_null())
                    .foreign_key(&mut farm_fk(
                        "fk_harvest_history_farm_id",
                        HarvestHistory::Table,
                        HarvestHistory::FarmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FuelRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FuelRecords::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(FuelRecords::Position).integer().not_null())
                    .col(ColumnDef::new(FuelRecords::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(FuelRecords::Date).date().not_null())
                    .col(ColumnDef::new(FuelRecords::EquipmentName).string().not_null())
                    .col(ColumnDef::new(FuelRecords::FuelType).string().not_null())
                    .col(ColumnDef::new(FuelRecords::Gallons).double().not_null())
                    .col(ColumnDef::new(FuelRecords::HoursOperated).double().not_null())
                    .col(ColumnDef::new(FuelRecords::Cost).double().not_null())
                    .col(ColumnDef::new(FuelRecords::Notes).text().not_null().default(""))
                    .foreign_key(&mut farm_fk("fk_fuel_records_farm_id", FuelRecords::Table, FuelRecords::FarmId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SoilRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SoilRecords::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(SoilRecords::Position).integer().not_null())
                    .col(ColumnDef::new(SoilRecords::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(SoilRecords::Date).date().not_null())
                    .col(ColumnDef::new(SoilRecords::Location).string().not_null())
                    .col(ColumnDef::new(SoilRecords::Ph).double().not_null())
                    .col(ColumnDef::new(SoilRecords::OrganicMatter).double().not_null())
                    .col(ColumnDef::new(SoilRecords::Nitrogen).double().not_null())
                    .col(ColumnDef::new(SoilRecords::Phosphorus).double().not_null())
                    .col(ColumnDef::new(SoilRecords::Potassium).double().not_null())
                    .col(ColumnDef::new(SoilRecords::Moisture).double().not_null())
                    .col(ColumnDef::new(SoilRecords::Notes).text().not_null().default(""))
                    .foreign_key(&mut farm_fk("fk_soil_records_farm_id", SoilRecords::Table, SoilRecords::FarmId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmissionSources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EmissionSources::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(EmissionSources::Position).integer().not_null())
                    .col(ColumnDef::new(EmissionSources::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(EmissionSources::Date).date().not_null())
                    .col(ColumnDef::new(EmissionSources::SourceType).string().not_null())
                    .col(ColumnDef::new(EmissionSources::Description).text().not_null().default(""))
                    .col(ColumnDef::new(EmissionSources::Co2Equivalent).double().not_null())
                    .col(ColumnDef::new(EmissionSources::Notes).text().not_null().default(""))
                    .foreign_key(&mut farm_fk(
                        "fk_emission_sources_farm_id",
                        EmissionSources::Table,
                        EmissionSources::FarmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SequestrationActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SequestrationActivities::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SequestrationActivities::Position).integer().not_null())
                    .col(ColumnDef::new(SequestrationActivities::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(SequestrationActivities::Date).date().not_null())
                    .col(ColumnDef::new(SequestrationActivities::ActivityType).string().not_null())
                    .col(
                        ColumnDef::new(SequestrationActivities::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(SequestrationActivities::Co2Sequestered).double().not_null())
                    .col(ColumnDef::new(SequestrationActivities::Area).double().not_null())
                    .col(
                        ColumnDef::new(SequestrationActivities::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(&mut farm_fk(
                        "fk_sequestration_activities_farm_id",
                        SequestrationActivities::Table,
                        SequestrationActivities::FarmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnergyRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EnergyRecords::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(EnergyRecords::Position).integer().not_null())
                    .col(ColumnDef::new(EnergyRecords::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(EnergyRecords::Date).date().not_null())
                    .col(ColumnDef::new(EnergyRecords::EnergyType).string().not_null())
                    .col(ColumnDef::new(EnergyRecords::Amount).double().not_null())
                    .col(ColumnDef::new(EnergyRecords::Unit).string().not_null())
                    .col(ColumnDef::new(EnergyRecords::Renewable).boolean().not_null().default(false))
                    .col(ColumnDef::new(EnergyRecords::Cost).double().not_null())
                    .col(ColumnDef::new(EnergyRecords::Purpose).string().not_null())
                    .col(ColumnDef::new(EnergyRecords::Notes).text().not_null().default(""))
                    .foreign_key(&mut farm_fk(
                        "fk_energy_records_farm_id",
                        EnergyRecords::Table,
                        EnergyRecords::FarmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Livestock::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Livestock::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Livestock::Position).integer().not_null())
                    .col(ColumnDef::new(Livestock::FarmId).big_integer().not_null())
                    .col(ColumnDef::new(Livestock::AnimalType).string().not_null())
                    .col(ColumnDef::new(Livestock::Count).integer().not_null())
                    .foreign_key(&mut farm_fk("fk_livestock_farm_id", Livestock::Table, Livestock::FarmId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before the farms they reference
        manager
            .drop_table(Table::drop().table(Livestock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnergyRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SequestrationActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmissionSources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SoilRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HarvestHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FertilizerHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WaterHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;

        Ok(())
    }
}

fn farm_fk<T, C>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement
where
    T: IntoTableRef,
    C: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Farms::Table, Farms::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Id,
    Position,
    Name,
    Size,
    Crop,
    SoilType,
    SlopeRatio,
}

#[derive(DeriveIden)]
enum WaterHistory {
    Table,
    Id,
    FarmId,
    Amount,
    Date,
    Efficiency,
}

#[derive(DeriveIden)]
enum FertilizerHistory {
    Table,
    Id,
    FarmId,
    FertilizerType,
    Amount,
    Date,
}

#[derive(DeriveIden)]
enum HarvestHistory {
    Table,
    Id,
    FarmId,
    YieldAmount,
    Date,
}

#[derive(DeriveIden)]
enum FuelRecords {
    Table,
    Id,
    Position,
    FarmId,
    Date,
    EquipmentName,
    FuelType,
    Gallons,
    HoursOperated,
    Cost,
    Notes,
}

#[derive(DeriveIden)]
enum SoilRecords {
    Table,
    Id,
    Position,
    FarmId,
    Date,
    Location,
    Ph,
    OrganicMatter,
    Nitrogen,
    Phosphorus,
    Potassium,
    Moisture,
    Notes,
}

#[derive(DeriveIden)]
enum EmissionSources {
    Table,
    Id,
    Position,
    FarmId,
    Date,
    SourceType,
    Description,
    #[sea_orm(iden = "co2_equivalent")]
    Co2Equivalent,
    Notes,
}

#[derive(DeriveIden)]
enum SequestrationActivities {
    Table,
    Id,
    Position,
    FarmId,
    Date,
    ActivityType,
    Description,
    #[sea_orm(iden = "co2_sequestered")]
    Co2Sequestered,
    Area,
    Notes,
}

#[derive(DeriveIden)]
enum EnergyRecords {
    Table,
    Id,
    Position,
    FarmId,
    Date,
    EnergyType,
    Amount,
    Unit,
    Renewable,
    Cost,
    Purpose,
    Notes,
}

#[derive(DeriveIden)]
enum Livestock {
    Table,
    Id,
    Position,
    FarmId,
    AnimalType,
    Count,
}
