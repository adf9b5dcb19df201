//! Docket: record curation sessions for machine-extracted records.
//!
//! Docket is the core of an operator workstation for reviewing records
//! pulled out of documents (conveyance parties, title owners, revenue line
//! items) before they are exported. An operator filters a job's entries,
//! removes individual entries from export, applies suggested corrections,
//! and exports exactly what is left.
//!
//! # Core Principles
//!
//! - **One engine, many tools**: filtering, selection, merging and export
//!   are written once over the [`Record`] trait
//! - **Non-destructive**: entry snapshots are never mutated in place
//! - **Explicit state**: a [`CurationSession`] value holds everything an
//!   operator is doing; collaborators sit behind traits in [`service`]
//!
//! # Example
//!
//! ```no_run
//! use docket::entry::Party;
//! use docket::export::ExportFormat;
//! use docket::job::JobId;
//! use docket::{DocketConfig, Workstation};
//!
//! # async fn run() -> docket::Result<()> {
//! let config = DocketConfig::from_env()?;
//! let mut workstation = Workstation::<Party>::from_config("ops@example.com", &config)?;
//!
//! workstation.refresh_history().await?;
//! workstation.select_job(&JobId::new("job-42")).await?;
//! workstation.session_mut().set_flag("hideFlagged", true);
//!
//! let file = workstation.export(ExportFormat::Csv, "parties").await?;
//! println!("{} entries -> {}", file.entry_count, file.filename);
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod config;
pub mod entry;
pub mod error;
pub mod export;
pub mod filter;
pub mod job;
pub mod selection;
pub mod service;
pub mod session;
pub mod store;
pub mod suggestion;
pub mod workstation;

pub use config::DocketConfig;
pub use entry::{Record, ToolKind};
pub use error::{DocketError, FieldError, Result};
pub use filter::{FilterEngine, FilterState, FilterValue};
pub use job::{EntryBatch, Job, JobId, JobStatus};
pub use selection::{Selection, SelectionState};
pub use session::CurationSession;
pub use store::EntryStore;
pub use suggestion::{merge, MergeOutcome, Suggestion};
pub use workstation::{Services, Workstation};
