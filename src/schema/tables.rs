/// One bootstrap-managed table: its name, one idempotent DDL script per
/// dialect, and optionally the bundled reference data for seeding.
pub struct TableDef {
    pub name: &'static str,
    #[cfg(feature = "postgres")]
    pub postgres_ddl: &'static str,
    #[cfg(feature = "sqlite")]
    pub sqlite_ddl: &'static str,
    /// Column-headered reference data, seeded once when the table is empty.
    pub seed_csv: Option<&'static str>,
}

macro_rules! table {
    ($name:literal, seeded) => {
        table!($name, Some(include_str!(concat!("seed/", $name, ".csv"))))
    };
    ($name:literal) => {
        table!($name, None)
    };
    ($name:literal, $seed:expr) => {
        TableDef {
            name: $name,
            #[cfg(feature = "postgres")]
            postgres_ddl: include_str!(concat!("ddl/postgres/", $name, ".sql")),
            #[cfg(feature = "sqlite")]
            sqlite_ddl: include_str!(concat!("ddl/sqlite/", $name, ".sql")),
            seed_csv: $seed,
        }
    };
}

/// Every table the engine bootstraps, in dependency order: tables without
/// foreign keys first, dependents after. The order is load-bearing; DDL
/// runs top to bottom.
pub const TABLES: &[TableDef] = &[
    table!("categories", seeded),
    table!("book_conditions", seeded),
    table!("users"),
    table!("verification_tokens"),
    table!("password_reset_tokens"),
    table!("sessions"),
    table!("listings"),
    table!("listing_images"),
    table!("messages"),
    table!("reports"),
];
