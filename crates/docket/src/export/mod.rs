//! Export of the exportable set.
//!
//! The [`ExportCoordinator`] turns exportable entries into a
//! [`RenderRequest`] and delegates rendering to a
//! [`RenderService`](crate::service::RenderService). Delimited exports can
//! also be rendered in-process with [`CsvRenderer`].

mod coordinator;
mod csv;
mod format;

pub use self::csv::CsvRenderer;
pub use coordinator::{export_filename, ExportCoordinator, DEFAULT_FILENAME};
pub use format::{ColumnHeader, ExportFormat, ExportedFile, RenderRequest};
