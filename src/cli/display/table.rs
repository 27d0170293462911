//! Table and raw rendering for CLI output

use chrono::{DateTime, Utc};
use comfy_table::{presets::NOTHING, Cell, CellAlignment, Table};

use crate::infrastructure::constants::{CELL_ELLIPSIS, MAX_CELL_LENGTH};
use crate::shared::error::{KappError, Result};

/// Column metadata emitted alongside each record type, replacing runtime
/// field reflection.
pub trait TableRecord {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Service row for `kappctl get service`
#[derive(Debug, Clone)]
pub struct ServiceRow {
    pub name: String,
    pub cluster: String,
    pub namespace: String,
    pub phase: String,
    pub message: String,
    pub created: String,
}

impl TableRecord for ServiceRow {
    fn headers() -> &'static [&'static str] {
        &["Name", "Cluster", "Namespace", "Phase", "Message", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.cluster.clone(),
            self.namespace.clone(),
            self.phase.clone(),
            self.message.clone(),
            self.created.clone(),
        ]
    }
}

/// Instance row for `kappctl get instance`
#[derive(Debug, Clone)]
pub struct InstanceRow {
    pub instance_name: String,
    pub namespace: String,
    pub service_name: String,
    pub cluster_name: String,
    pub status: String,
    pub created: String,
}

impl TableRecord for InstanceRow {
    fn headers() -> &'static [&'static str] {
        &[
            "InstanceName",
            "Namespace",
            "ServiceName",
            "ClusterName",
            "Status",
            "Created",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.instance_name.clone(),
            self.namespace.clone(),
            self.service_name.clone(),
            self.cluster_name.clone(),
            self.status.clone(),
            self.created.clone(),
        ]
    }
}

/// Repository row, reserved for the repository commands the manager does
/// not ship yet.
#[derive(Debug, Clone)]
pub struct RepositoryRow {
    pub name: String,
    pub url: String,
    pub created: String,
}

impl TableRecord for RepositoryRow {
    fn headers() -> &'static [&'static str] {
        &["Name", "Url", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.url.clone(), self.created.clone()]
    }
}

/// Package row, reserved for the package commands the manager does not
/// ship yet.
#[derive(Debug, Clone)]
pub struct PackageRow {
    pub name: String,
    pub version: String,
    pub repository: String,
    pub created: String,
}

impl TableRecord for PackageRow {
    fn headers() -> &'static [&'static str] {
        &["Name", "Version", "Repository", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.version.clone(),
            self.repository.clone(),
            self.created.clone(),
        ]
    }
}

/// Version row, reserved for the version commands the manager does not
/// ship yet.
#[derive(Debug, Clone)]
pub struct VersionRow {
    pub version: String,
    pub package: String,
    pub created: String,
}

impl TableRecord for VersionRow {
    fn headers() -> &'static [&'static str] {
        &["Version", "Package", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.version.clone(),
            self.package.clone(),
            self.created.clone(),
        ]
    }
}

/// Render records as a left-aligned borderless table with a three-space
/// column gap and no header underline. An empty list renders nothing.
pub fn render_table<R: TableRecord>(records: &[R]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(
        R::headers()
            .iter()
            .map(|h| Cell::new(h).set_alignment(CellAlignment::Left))
            .collect::<Vec<_>>(),
    );

    for record in records {
        table.add_row(
            record
                .cells()
                .into_iter()
                .map(|cell| Cell::new(sanitize_cell(&cell)).set_alignment(CellAlignment::Left))
                .collect::<Vec<_>>(),
        );
    }

    for column in table.column_iter_mut() {
        column.set_padding((0, 3));
    }

    table.to_string()
}

/// Literal `null` and `{}` render empty; anything longer than 64 chars is
/// cut so the last four are ` ...` and the cell is exactly 64.
fn sanitize_cell(cell: &str) -> String {
    if cell == "null" || cell == "{}" {
        return String::new();
    }
    if cell.chars().count() > MAX_CELL_LENGTH {
        let mut cut: String = cell
            .chars()
            .take(MAX_CELL_LENGTH - CELL_ELLIPSIS.len())
            .collect();
        cut.push_str(CELL_ELLIPSIS);
        return cut;
    }
    cell.to_string()
}

/// Render a raw JSON server response in the requested format. `json`
/// passes the buffer through untouched, `yaml` converts it, the empty
/// format renders nothing.
pub fn format_raw(body: &[u8], format: &str) -> Result<Option<String>> {
    match format.to_lowercase().as_str() {
        "json" => Ok(Some(String::from_utf8_lossy(body).into_owned())),
        "yaml" => {
            let value: serde_json::Value = serde_json::from_slice(body)?;
            Ok(Some(serde_yaml::to_string(&value)?))
        }
        "" => Ok(None),
        other => Err(KappError::input(format!(
            "output format [{}] is not supported",
            other
        ))),
    }
}

/// Age of a timestamp in kubectl style: a single unit of hours, minutes,
/// or seconds, suffixed with " ago".
pub fn get_age_output(t: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(t);
    let secs = elapsed.num_seconds().max(0);
    if secs >= 3600 {
        format!("{}h ago", secs / 3600)
    } else if secs >= 60 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}s ago", secs)
    }
}

/// Cell value for a server `createTime`: the age when the timestamp
/// parses, the raw string otherwise.
pub fn format_created(create_time: &str) -> String {
    match DateTime::parse_from_rfc3339(create_time) {
        Ok(t) => get_age_output(t.with_timezone(&Utc)),
        Err(_) => create_time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(name: &str, message: &str) -> ServiceRow {
        ServiceRow {
            name: name.to_string(),
            cluster: "default".to_string(),
            namespace: "default".to_string(),
            phase: "Succeeded".to_string(),
            message: message.to_string(),
            created: "1h ago".to_string(),
        }
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let rows: Vec<ServiceRow> = Vec::new();
        assert!(render_table(&rows).is_empty());
    }

    #[test]
    fn test_render_is_borderless_and_left_aligned() {
        let output = render_table(&[row("foo", "ok")]);
        assert!(output.contains("Name"));
        assert!(output.contains("foo"));
        assert!(!output.contains('|'));
        assert!(!output.contains('+'));
        assert!(!output.contains('─'));
        // Three-space gap between a cell and the next column.
        assert!(output.contains("foo   "));
    }

    #[test]
    fn test_cell_truncation_is_exactly_64() {
        let long = "x".repeat(80);
        let output = render_table(&[row("foo", &long)]);
        let cell = output
            .lines()
            .find(|l| l.contains("foo"))
            .and_then(|l| l.split_whitespace().find(|w| w.starts_with("xxx")))
            .map(|w| w.to_string())
            .unwrap_or_default();
        // The word split strips the " ..." suffix; check the rendered line.
        let line = output.lines().find(|l| l.contains("xxx")).unwrap();
        assert!(line.contains(&format!("{}{}", "x".repeat(60), " ...")));
        assert!(!line.contains(&"x".repeat(61)));
        assert_eq!(cell.chars().count(), 60);
    }

    #[test]
    fn test_null_and_empty_object_render_empty() {
        assert_eq!(sanitize_cell("null"), "");
        assert_eq!(sanitize_cell("{}"), "");
        assert_eq!(sanitize_cell("value"), "value");
    }

    #[test]
    fn test_sanitize_cell_length_law() {
        for len in [65usize, 100, 1000] {
            let cell = sanitize_cell(&"y".repeat(len));
            assert_eq!(cell.chars().count(), 64);
            assert!(cell.ends_with(" ..."));
        }
        assert_eq!(sanitize_cell(&"y".repeat(64)), "y".repeat(64));
    }

    #[test]
    fn test_reserved_record_types_render() {
        let repos = [RepositoryRow {
            name: "stable".to_string(),
            url: "https://repo.kappital.io/stable".to_string(),
            created: "2h ago".to_string(),
        }];
        let output = render_table(&repos);
        assert!(output.contains("Url"));
        assert!(output.contains("stable"));

        let packages = [PackageRow {
            name: "demo".to_string(),
            version: "0.1.0".to_string(),
            repository: "stable".to_string(),
            created: "2h ago".to_string(),
        }];
        assert!(render_table(&packages).contains("Repository"));

        let versions = [VersionRow {
            version: "0.1.0".to_string(),
            package: "demo".to_string(),
            created: "2h ago".to_string(),
        }];
        assert!(render_table(&versions).contains("Package"));
    }

    #[test]
    fn test_format_raw_json_passthrough() {
        let body = br#"{"a":1}"#;
        assert_eq!(format_raw(body, "json").unwrap().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_format_raw_yaml_converts() {
        let body = br#"{"a":1,"b":{"c":"d"}}"#;
        let yaml = format_raw(body, "yaml").unwrap().unwrap();
        assert!(yaml.contains("a: 1"));
        assert!(yaml.contains("c: d"));
    }

    #[test]
    fn test_format_raw_empty_and_invalid() {
        assert!(format_raw(b"{}", "").unwrap().is_none());
        assert!(format_raw(b"{}", "xml").is_err());
    }

    #[test]
    fn test_age_output_units() {
        let age = get_age_output(Utc::now() - Duration::hours(3));
        assert!(age.ends_with(" ago"));
        assert!(age.contains('h') && !age.contains('m') && !age.contains('s'));

        let age = get_age_output(Utc::now() - Duration::minutes(5));
        assert!(age.starts_with("5m"));

        let age = get_age_output(Utc::now() - Duration::seconds(30));
        assert!(age.contains('s') && age.ends_with(" ago"));
    }

    #[test]
    fn test_format_created_falls_back_to_raw() {
        assert_eq!(format_created("not-a-time"), "not-a-time");
        assert!(format_created("2026-01-01T00:00:00Z").ends_with(" ago"));
    }
}
