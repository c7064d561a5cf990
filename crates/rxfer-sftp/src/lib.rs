//! # rxfer – SFTP
//!
//! SSH file transfer binding of the transfer contract:
//!   • Transport + SFTP sub-channel per primitive call, released in reverse order
//!   • Agent / key file / password / keyboard-interactive authentication
//!   • POSIX remote paths regardless of the local platform

pub mod sftp;
