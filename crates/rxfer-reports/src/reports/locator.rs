//! Monthly report selection and download.

use crate::reports::dates::{month_with_delta, year_with_delta};
use crate::reports::error::{ReportError, ReportResult};
use crate::reports::naming::{DataSource, ReportNaming};
use crate::reports::timing::timed;
use chrono::{Local, NaiveDate};
use log::{debug, info};
use rxfer_core::paths::resolve;
use rxfer_core::{Credentials, RemoteFileTransfer};
use std::path::{Path, PathBuf};

/// What to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub years: Vec<i32>,
    pub source: DataSource,
    /// Relative to the connector's local root; empty means the root itself.
    pub out_dir: PathBuf,
    /// Require the snapshot produced for the previous month instead of the newest one.
    pub force_current_month: bool,
    pub overwrite: bool,
}

impl ReportRequest {
    pub fn new(years: impl IntoIterator<Item = i32>, source: DataSource) -> Self {
        Self {
            years: years.into_iter().collect(),
            source,
            out_dir: PathBuf::new(),
            force_current_month: false,
            overwrite: false,
        }
    }

    /// Like [`ReportRequest::new`] with the source given by name (`"wd"`, `"BI"`, ...).
    pub fn for_source(years: impl IntoIterator<Item = i32>, source: &str) -> ReportResult<Self> {
        Ok(Self::new(years, source.parse()?))
    }

    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn force_current_month(mut self, force: bool) -> Self {
        self.force_current_month = force;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

pub struct ReportLocator<'a> {
    transfer: &'a dyn RemoteFileTransfer,
    naming: ReportNaming,
}

impl<'a> ReportLocator<'a> {
    pub fn new(transfer: &'a dyn RemoteFileTransfer) -> Self {
        Self {
            transfer,
            naming: ReportNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: ReportNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn naming(&self) -> &ReportNaming {
        &self.naming
    }

    /// Select and download the reports of `request` as of the local date.
    pub fn download(&self, credentials: &Credentials, request: &ReportRequest) -> ReportResult<Vec<String>> {
        timed("report download", || {
            self.download_as_of(credentials, request, Local::now().date_naive())
        })
    }

    /// Returns every selected filename, whether it was downloaded now or was
    /// already present in the output directory.
    pub fn download_as_of(
        &self,
        credentials: &Credentials,
        request: &ReportRequest,
        today: NaiveDate,
    ) -> ReportResult<Vec<String>> {
        let mut years = Vec::with_capacity(request.years.len());
        for year in &request.years {
            if !years.contains(year) {
                years.push(*year);
            }
        }
        if years.is_empty() {
            return Ok(Vec::new());
        }

        let listing: Vec<String> = self
            .transfer
            .list_files(credentials, Some(self.naming.remote_subpath.as_str()))?
            .iter()
            .map(|entry| base_name(entry))
            .collect();

        let files = if request.force_current_month {
            self.previous_month_files(&years, request.source, today, &listing)?
        } else {
            self.latest_files(&years, request.source, &listing)?
        };
        info!("Selected {} {} report file(s): {:?}", files.len(), request.source, files);

        let out_dir = resolve(self.transfer.config().local_root(), &request.out_dir);
        std::fs::create_dir_all(&out_dir)?;

        let to_download: Vec<String> = if request.overwrite {
            files.clone()
        } else {
            files
                .iter()
                .filter(|name| {
                    let present = out_dir.join(name.as_str()).exists();
                    if present {
                        debug!("Report {} already in {}", name, out_dir.display());
                    }
                    !present
                })
                .cloned()
                .collect()
        };

        if !to_download.is_empty() {
            self.transfer.download_file_list(
                credentials,
                &to_download,
                &self.naming.remote_subpath,
                &request.out_dir.to_string_lossy(),
                request.overwrite,
            )?;
        }
        Ok(files)
    }

    fn previous_month_files(
        &self,
        years: &[i32],
        source: DataSource,
        today: NaiveDate,
        listing: &[String],
    ) -> ReportResult<Vec<String>> {
        let stamp_year = year_with_delta(today, -1);
        let stamp_month = month_with_delta(today, -1, 2);
        let files: Vec<String> = years
            .iter()
            .map(|year| self.naming.file_name(source, *year, stamp_year, &stamp_month))
            .collect();
        let missing: Vec<String> = files
            .iter()
            .filter(|f| !listing.contains(f))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::MissingFiles(missing));
        }
        Ok(files)
    }

    /// Per year, the greatest listed name carrying that year's prefix. Snapshot
    /// stamps are `YYYY-MM`, so the greatest name is the newest snapshot.
    fn latest_files(&self, years: &[i32], source: DataSource, listing: &[String]) -> ReportResult<Vec<String>> {
        years
            .iter()
            .map(|year| {
                let prefix = self.naming.year_prefix(source, *year);
                let latest = listing
                    .iter()
                    .filter(|name| name.contains(prefix.as_str()))
                    .max()
                    .cloned();
                latest.ok_or(ReportError::NoMatch(prefix))
            })
            .collect()
    }
}

fn base_name(entry: &str) -> String {
    Path::new(entry)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.to_string())
}
