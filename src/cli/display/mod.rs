//! CLI output rendering

pub mod table;

pub use table::{
    format_created, format_raw, get_age_output, render_table, InstanceRow, PackageRow,
    RepositoryRow, ServiceRow, TableRecord, VersionRow,
};
