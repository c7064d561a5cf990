//! Report locator: picks the newest monthly report per year from a remote
//! output folder and downloads what is missing locally.

pub mod dates;
pub mod error;
pub mod locator;
pub mod naming;
pub mod pattern;
pub mod timing;

pub use error::{ReportError, ReportResult};
pub use locator::{ReportLocator, ReportRequest};
pub use naming::{DataSource, ReportNaming};
pub use pattern::find_pattern;
pub use timing::timed;
