use chrono::NaiveDate;
use rxfer_core::{ConnectionConfig, Credentials, MemoryBackend, PrimitiveCall};
use rxfer_reports::reports::{DataSource, ReportError, ReportLocator, ReportRequest};
use std::fs;
use tempfile::TempDir;

const OUTPUT: &str = "Apps/HUMAN RESOURCES/NL_Reconciliation/Output";

fn setup() -> (TempDir, MemoryBackend) {
    let tmp = TempDir::new().unwrap();
    let config = ConnectionConfig::new(
        "ftp.example.org",
        21,
        "Apps/HUMAN RESOURCES",
        tmp.path().to_str().unwrap(),
    )
    .unwrap();
    let backend = MemoryBackend::new(config);
    for name in [
        "historical_nl_WD_2022_updated_2024-03.parquet",
        "historical_nl_WD_2022_updated_2024-04.parquet",
        "historical_nl_WD_2023_updated_2024-03.parquet",
        "historical_nl_WD_2023_updated_2024-04.parquet",
        "historical_nl_2023_updated_2024-02.parquet",
        "readme.txt",
    ] {
        backend.add_remote_file(format!("{}/{}", OUTPUT, name), name.as_bytes().to_vec());
    }
    (tmp, backend)
}

fn creds() -> Credentials {
    Credentials::new("alice", "secret")
}

fn may_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

fn remote(name: &str) -> String {
    format!("{}/{}", OUTPUT, name)
}

#[test]
fn latest_snapshot_per_year_is_downloaded() {
    let (tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2023, 2022], DataSource::Wd).out_dir("data");

    let files = locator.download_as_of(&creds(), &request, may_2024()).unwrap();

    assert_eq!(
        files,
        vec![
            "historical_nl_WD_2023_updated_2024-04.parquet",
            "historical_nl_WD_2022_updated_2024-04.parquet",
        ]
    );
    for name in &files {
        assert_eq!(
            fs::read(tmp.path().join("data").join(name)).unwrap(),
            name.as_bytes()
        );
    }
    assert_eq!(
        backend.calls()[0],
        PrimitiveCall::List(OUTPUT.to_string())
    );
}

#[test]
fn bi_source_ignores_wd_files() {
    let (_tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::for_source([2023], "bi").unwrap();

    let files = locator.download_as_of(&creds(), &request, may_2024()).unwrap();

    assert_eq!(files, vec!["historical_nl_2023_updated_2024-02.parquet"]);
}

#[test]
fn year_without_snapshot_is_no_match() {
    let (_tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2019], DataSource::Wd);

    let err = locator.download_as_of(&creds(), &request, may_2024()).unwrap_err();

    assert!(matches!(err, ReportError::NoMatch(ref p) if p == "historical_nl_WD_2019_updated_"));
    assert!(backend.transferred().is_empty());
}

#[test]
fn forced_month_uses_previous_month_stamp() {
    let (_tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2022], DataSource::Wd)
        .out_dir("forced")
        .force_current_month(true);

    let april = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
    let files = locator.download_as_of(&creds(), &request, april).unwrap();

    assert_eq!(files, vec!["historical_nl_WD_2022_updated_2024-03.parquet"]);
    assert_eq!(
        backend.transferred(),
        vec![remote("historical_nl_WD_2022_updated_2024-03.parquet")]
    );
}

#[test]
fn forced_month_reports_every_missing_file() {
    let (_tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2022, 2023, 2024], DataSource::Wd).force_current_month(true);

    let err = locator.download_as_of(&creds(), &request, may_2024()).unwrap_err();

    match err {
        ReportError::MissingFiles(missing) => {
            assert_eq!(missing, vec!["historical_nl_WD_2024_updated_2024-04.parquet"])
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(backend.transferred().is_empty());
}

#[test]
fn forced_month_in_january_looks_at_december() {
    let (_tmp, backend) = setup();
    backend.add_remote_file(remote("historical_nl_WD_2023_updated_2023-12.parquet"), "dec");
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2023], DataSource::Wd).force_current_month(true);

    let january = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let files = locator.download_as_of(&creds(), &request, january).unwrap();

    assert_eq!(files, vec!["historical_nl_WD_2023_updated_2023-12.parquet"]);
}

#[test]
fn files_already_present_are_not_fetched_but_still_returned() {
    let (tmp, backend) = setup();
    fs::create_dir_all(tmp.path().join("data")).unwrap();
    fs::write(
        tmp.path().join("data/historical_nl_WD_2023_updated_2024-04.parquet"),
        "local copy",
    )
    .unwrap();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2023, 2022], DataSource::Wd).out_dir("data");

    let files = locator.download_as_of(&creds(), &request, may_2024()).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(
        backend.transferred(),
        vec![remote("historical_nl_WD_2022_updated_2024-04.parquet")]
    );
    assert_eq!(
        fs::read(tmp.path().join("data/historical_nl_WD_2023_updated_2024-04.parquet")).unwrap(),
        b"local copy"
    );
}

#[test]
fn nothing_missing_means_listing_only() {
    let (tmp, backend) = setup();
    fs::write(tmp.path().join("historical_nl_WD_2023_updated_2024-04.parquet"), "x").unwrap();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2023], DataSource::Wd);

    let files = locator.download_as_of(&creds(), &request, may_2024()).unwrap();

    assert_eq!(files, vec!["historical_nl_WD_2023_updated_2024-04.parquet"]);
    assert_eq!(backend.sessions_opened(), 1);
}

#[test]
fn overwrite_refetches_present_files() {
    let (tmp, backend) = setup();
    let name = "historical_nl_WD_2023_updated_2024-04.parquet";
    fs::write(tmp.path().join(name), "stale").unwrap();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2023], DataSource::Wd).overwrite(true);

    locator.download_as_of(&creds(), &request, may_2024()).unwrap();

    assert_eq!(backend.transferred(), vec![remote(name)]);
    assert_eq!(fs::read(tmp.path().join(name)).unwrap(), name.as_bytes());
}

#[test]
fn empty_year_list_touches_nothing() {
    let (_tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new(Vec::<i32>::new(), DataSource::Wd);

    assert!(locator.download_as_of(&creds(), &request, may_2024()).unwrap().is_empty());
    assert_eq!(backend.sessions_opened(), 0);
}

#[test]
fn download_with_local_date_selects_latest() {
    let (tmp, backend) = setup();
    let locator = ReportLocator::new(&backend);
    let request = ReportRequest::new([2022], DataSource::Wd).out_dir("today");

    let files = locator.download(&creds(), &request).unwrap();

    assert_eq!(files, vec!["historical_nl_WD_2022_updated_2024-04.parquet"]);
    assert!(tmp.path().join("today").join(&files[0]).exists());
}
