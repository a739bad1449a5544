#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod alerts;
pub mod archive;
pub mod client;
pub mod code_owners;
pub mod config;
pub mod report;
pub mod repos;
pub mod scanner;
pub mod types;

pub use alerts::{
    fetch_alerts, AlertError, PageInfo, RepoVulnerabilityReport, VulnerabilityAlert,
};
pub use archive::{load_archive_targets, run_archive, ArchiveError};
pub use client::build_client;
pub use code_owners::{resolve_code_owners, CodeOwnersError};
pub use config::HammerConfig;
pub use report::{render_repo_report, run_report, ReportError};
pub use repos::{list_repositories, ListError};
pub use scanner::{run_scanner, ScannerError};
pub use types::{RepoInfo, RepoListOptions};
