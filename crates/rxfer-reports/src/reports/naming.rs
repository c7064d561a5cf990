//! Report naming convention.
//!
//! A report file is `<prefix><year><infix><YYYY-MM><extension>`, e.g.
//! `historical_nl_WD_2023_updated_2024-04.parquet`: the data year followed
//! by the month the snapshot was produced for.

use crate::reports::error::ReportError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Wd,
    Bi,
}

impl DataSource {
    pub const ALL: [DataSource; 2] = [DataSource::Wd, DataSource::Bi];

    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Wd => "WD",
            DataSource::Bi => "BI",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WD" => Ok(DataSource::Wd),
            "BI" => Ok(DataSource::Bi),
            _ => Err(ReportError::UnsupportedSource {
                source_name: s.to_string(),
                expected: DataSource::ALL
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNaming {
    pub wd_prefix: String,
    pub bi_prefix: String,
    pub infix: String,
    pub extension: String,
    /// Folder under the remote root holding the reports.
    pub remote_subpath: String,
}

impl Default for ReportNaming {
    fn default() -> Self {
        Self {
            wd_prefix: "historical_nl_WD_".into(),
            bi_prefix: "historical_nl_".into(),
            infix: "_updated_".into(),
            extension: ".parquet".into(),
            remote_subpath: "NL_Reconciliation/Output".into(),
        }
    }
}

impl ReportNaming {
    pub fn prefix(&self, source: DataSource) -> &str {
        match source {
            DataSource::Wd => &self.wd_prefix,
            DataSource::Bi => &self.bi_prefix,
        }
    }

    /// Leading part shared by every snapshot of one data year.
    pub fn year_prefix(&self, source: DataSource, year: i32) -> String {
        format!("{}{}{}", self.prefix(source), year, self.infix)
    }

    /// Exact name of the snapshot of `year` produced for `stamp_year`-`stamp_month`.
    pub fn file_name(&self, source: DataSource, year: i32, stamp_year: i32, stamp_month: &str) -> String {
        format!(
            "{}{}-{}{}",
            self.year_prefix(source, year),
            stamp_year,
            stamp_month,
            self.extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse_is_case_insensitive() {
        assert_eq!("wd".parse::<DataSource>().unwrap(), DataSource::Wd);
        assert_eq!("Bi".parse::<DataSource>().unwrap(), DataSource::Bi);
        assert_eq!(" WD ".parse::<DataSource>().unwrap(), DataSource::Wd);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let err = "sap".parse::<DataSource>().unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedSource { .. }));
        assert!(err.to_string().contains("WD, BI"));
    }

    #[test]
    fn test_default_names() {
        let naming = ReportNaming::default();
        assert_eq!(naming.year_prefix(DataSource::Wd, 2023), "historical_nl_WD_2023_updated_");
        assert_eq!(
            naming.file_name(DataSource::Bi, 2022, 2024, "04"),
            "historical_nl_2022_updated_2024-04.parquet"
        );
    }
}
