//!# Synology File Station API Client
//!
//! A Rust client library for the Synology DSM File Station API. Browse and manage the files
//! on your NAS programmatically with a strongly-typed interface.
//!
//! ## Features
//!
//! - Authentication with Synology API
//! - List shared folders, folder contents and virtual (CIFS/ISO) mount points
//! - Get file information (size, owner, timestamps, permissions, volume status)
//! - Create and rename folders
//! - Background tasks with status polling: copy/move, delete, compress, extract, MD5 checksum,
//!   directory size
//! - Upload and streaming download with progress reporting
//! - QuickConnect relay lookup
//! - Human-readable sizes, bounded progress fractions and timestamp conversion
//!
//! Every call returns [`anyhow::Result`]; the underlying [`client::SynoError`] can be recovered
//! with `downcast_ref`. A failed envelope always becomes [`client::SynoError::Api`] carrying the
//! server's error code.
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use syno_file_station::client::SynoFSBuilder;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let mut synofs = SynoFSBuilder::from_env()?.build()?;
//!
//!     synofs.authorize().await?;
//!
//!     let shares = synofs.list_shares(0, 0).await?;
//!     for share in shares.shares {
//!         println!("share: {}, path: {}", share.to_file().display_name(), share.path);
//!     }
//!
//!     let taskid = synofs.start_md5("/home/notes.txt").await?;
//!     let status = synofs.md5_status(&taskid).await?;
//!     println!("md5 finished: {}, value: {:?}", status.finished, status.md5);
//!
//!     synofs.logout().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codes;
pub mod entities;
pub mod options;
pub mod utils;
