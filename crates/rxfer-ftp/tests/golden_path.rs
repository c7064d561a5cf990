//! Live-server round trip. Enabled with `--features docker-e2e`; reads
//! `RXFER_FTP_HOST`, `RXFER_FTP_PORT`, `RXFER_FTP_USER`, `RXFER_FTP_PASSWORD`
//! and optionally `RXFER_FTP_DOMAIN`.
#![cfg(feature = "docker-e2e")]

use rxfer_core::{Credentials, RemoteFileTransfer};
use rxfer_ftp::ftp::FtpTransferConnector;
use std::fs;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} must be set for e2e tests", name))
}

#[test]
fn ftp_upload_list_download_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let port: u16 = env("RXFER_FTP_PORT").parse().unwrap();
    let connector = FtpTransferConnector::connect_to(
        &env("RXFER_FTP_HOST"),
        port,
        "/",
        tmp.path().to_str().unwrap(),
    )
    .unwrap()
    .with_domain(std::env::var("RXFER_FTP_DOMAIN").ok());
    let creds = Credentials::new(env("RXFER_FTP_USER"), env("RXFER_FTP_PASSWORD"));

    let payload = b"rxfer e2e payload\n".repeat(100);
    fs::write(tmp.path().join("e2e.txt"), &payload).unwrap();

    assert!(connector
        .upload_file_list(&creds, &["e2e.txt".to_string()], "", "rxfer-e2e", true)
        .unwrap());
    let listing = connector.list_files(&creds, Some("rxfer-e2e")).unwrap();
    assert!(listing.iter().any(|n| n.ends_with("e2e.txt")));

    fs::remove_file(tmp.path().join("e2e.txt")).unwrap();
    assert!(connector
        .download_file(&creds, "rxfer-e2e/e2e.txt", "back.txt", true)
        .unwrap());
    assert_eq!(fs::read(tmp.path().join("back.txt")).unwrap(), payload);
}
