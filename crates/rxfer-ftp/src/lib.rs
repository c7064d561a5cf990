//! # rxfer – FTP
//!
//! Plain FTP binding of the transfer contract:
//!   • One control connection per primitive call, closed with QUIT on every path
//!   • Domain-qualified login (`<domain>\<user>`)
//!   • Binary RETR / STOR streaming, NLST listings, MKD

pub mod ftp;
