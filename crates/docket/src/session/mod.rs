//! Curation session: the state of one operator working through one tool's
//! jobs.
//!
//! The session owns the job list, the active job and its entries, the
//! filter values, the export exclusions and any suggestion review. It does
//! no I/O. Remote operations are driven from outside (see
//! [`Workstation`](crate::workstation::Workstation)) in two steps: a
//! `begin_*` call that marks the operation in flight and hands out a
//! ticket, and a completion call that applies the response only if the
//! ticket still matches the session.
//!
//! ```
//! use docket::entry::{EntityType, Party, ToolKind};
//! use docket::filter::names;
//! use docket::job::{EntryBatch, Job, JobId, JobStatus};
//! use docket::session::{CurationSession, Selected};
//!
//! let mut session = CurationSession::<Party>::new("ops@example.com");
//! let job = Job::new(JobId::new("j1"), ToolKind::Extract, "deed.pdf", "ops@example.com")
//!     .with_status(JobStatus::Succeeded);
//! let ticket = session.begin_history_refresh();
//! session.finish_history_refresh(ticket, Ok(vec![job])).unwrap();
//!
//! let Selected::Load(ticket) = session.select(&JobId::new("j1")).unwrap() else {
//!     unreachable!()
//! };
//! let entries = vec![
//!     Party::new("1", "Jane Doe").with_entity_type(EntityType::Individual),
//!     Party::new("2", "Doe Trust").flagged("Missing trustee"),
//! ];
//! session.complete_load(ticket, Ok(EntryBatch::new(entries))).unwrap();
//!
//! session.set_flag(names::HIDE_FLAGGED, true);
//! assert_eq!(session.visible_keys().unwrap(), vec!["1"]);
//! ```

mod activity;
mod curation;

pub use activity::{Activity, Completion, HistoryTicket, LoadTicket, Selected, SuggestionTicket};
pub use curation::{CurationSession, JobSlot, SessionSummary, LOCAL_JOB_PREFIX};
