use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_vendors_table::Migration),
            Box::new(m20240101_000002_create_order_records_table::Migration),
            Box::new(m20240101_000003_create_ledger_entries_table::Migration),
        ]
    }
}

mod m20240101_000001_create_vendors_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vendors::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Vendors::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Vendors::Email).string().not_null())
                        .col(ColumnDef::new(Vendors::Phone).string().not_null())
                        .col(ColumnDef::new(Vendors::Address).string().not_null())
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Vendors {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Address,
        CreatedAt,
    }
}

mod m20240101_000002_create_order_records_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_order_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Aligned with entities::order_record Model
            manager
                .create_table(
                    Table::create()
                        .table(OrderRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderRecords::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OrderRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderRecords::PickupName).string().not_null())
                        .col(
                            ColumnDef::new(OrderRecords::PickupAddress)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderRecords::PickupPhone).string().not_null())
                        .col(ColumnDef::new(OrderRecords::DropName).string().not_null())
                        .col(ColumnDef::new(OrderRecords::DropAddress).string().not_null())
                        .col(ColumnDef::new(OrderRecords::DropPhone).string().not_null())
                        .col(ColumnDef::new(OrderRecords::Vendor).string().null())
                        .col(ColumnDef::new(OrderRecords::Team).string().null())
                        .col(ColumnDef::new(OrderRecords::Pb).string_len(16).not_null())
                        .col(ColumnDef::new(OrderRecords::Dc).string_len(16).not_null())
                        .col(
                            ColumnDef::new(OrderRecords::PbAmt)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderRecords::DcAmt)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(OrderRecords::Tsb).decimal().not_null())
                        .col(ColumnDef::new(OrderRecords::Cid).decimal().not_null())
                        .col(ColumnDef::new(OrderRecords::Status).string_len(32).not_null())
                        .col(
                            ColumnDef::new(OrderRecords::OrderType)
                                .string_len(16)
                                .not_null()
                                .default("delivery"),
                        )
                        .col(ColumnDef::new(OrderRecords::Notes).text().null())
                        .col(ColumnDef::new(OrderRecords::CreatedBy).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_records_vendor_created_at")
                        .table(OrderRecords::Table)
                        .col(OrderRecords::Vendor)
                        .col(OrderRecords::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_records_team_created_at")
                        .table(OrderRecords::Table)
                        .col(OrderRecords::Team)
                        .col(OrderRecords::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_records_status")
                        .table(OrderRecords::Table)
                        .col(OrderRecords::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderRecords {
        Table,
        Id,
        CreatedAt,
        UpdatedAt,
        PickupName,
        PickupAddress,
        PickupPhone,
        DropName,
        DropAddress,
        DropPhone,
        Vendor,
        Team,
        Pb,
        Dc,
        PbAmt,
        DcAmt,
        Tsb,
        Cid,
        Status,
        OrderType,
        Notes,
        CreatedBy,
    }
}

mod m20240101_000003_create_ledger_entries_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_ledger_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LedgerEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LedgerEntries::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(LedgerEntries::Kind).string_len(32).not_null())
                        .col(
                            ColumnDef::new(LedgerEntries::PartitionKind)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::PartitionKey)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerEntries::BucketDate).date().null())
                        .col(ColumnDef::new(LedgerEntries::Amount).decimal().not_null())
                        .col(
                            ColumnDef::new(LedgerEntries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerEntries::CreatedBy).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledger_entries_partition")
                        .table(LedgerEntries::Table)
                        .col(LedgerEntries::Kind)
                        .col(LedgerEntries::PartitionKind)
                        .col(LedgerEntries::PartitionKey)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LedgerEntries {
        Table,
        Id,
        Kind,
        PartitionKind,
        PartitionKey,
        BucketDate,
        Amount,
        CreatedAt,
        CreatedBy,
    }
}
