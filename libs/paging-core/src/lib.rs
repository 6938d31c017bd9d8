//! Offset/limit paging vocabulary shared by query modules.
//!
//! Nothing in here touches a database: requests are validated, totals are
//! resolved through a caller-supplied count query, and pages are assembled
//! from already-fetched content.

pub mod count;
pub mod error;
pub mod page;
pub mod request;

pub use count::{derived_total, resolve_total, CountStrategy};
pub use error::PageError;
pub use page::Page;
pub use request::PageRequest;
