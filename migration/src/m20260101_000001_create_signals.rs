use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Signals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Signals::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Signals::Symbol).string().not_null()) // "BTCUSDT"
                    .col(ColumnDef::new(Signals::Signal).string().not_null()) // LONG_FORTE, SHORT_FRACO, NEUTRO...
                    .col(ColumnDef::new(Signals::Score).integer().not_null())
                    .col(ColumnDef::new(Signals::Probability).double().not_null())
                    .col(ColumnDef::new(Signals::Regime).string().not_null()) // BULL, BEAR, CHOP
                    .col(ColumnDef::new(Signals::Rsi).double().null())
                    .col(ColumnDef::new(Signals::VolZ).double().null())
                    .col(ColumnDef::new(Signals::UpperWick).double().null())
                    .col(ColumnDef::new(Signals::Ret15).double().null())
                    .col(ColumnDef::new(Signals::CooldownMin).integer().null())
                    .col(ColumnDef::new(Signals::EntryPrice).double().null())
                    .col(ColumnDef::new(Signals::StopLoss).double().null())
                    .col(ColumnDef::new(Signals::TargetPrice).double().null())
                    .col(ColumnDef::new(Signals::Reasons).json().not_null())
                    .col(ColumnDef::new(Signals::Timestamp).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_signals_timestamp_score")
                    .table(Signals::Table)
                    .col(Signals::Timestamp)
                    .col(Signals::Score)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Signals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Signals {
    Table,
    Id,
    Symbol,
    Signal,
    Score,
    Probability,
    Regime,
    Rsi,
    #[sea_orm(iden = "vol_z")]
    VolZ,
    UpperWick,
    #[sea_orm(iden = "ret_15")]
    Ret15,
    CooldownMin,
    EntryPrice,
    StopLoss,
    TargetPrice,
    Reasons,
    Timestamp,
}
