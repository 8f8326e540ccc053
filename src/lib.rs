//! Boolean full-text search over tables of string cells.
//!
//! ```
//! use tablegrep::{Dataset, SearchSession};
//!
//! let dataset = Dataset::from_records(
//!     vec!["Name", "Plan"],
//!     vec![vec![Some("Alice"), Some("Premium")], vec![Some("Bob"), Some("Standard")]],
//! );
//! let session = SearchSession::new(dataset);
//! let rows = session.search("premium AND NOT bob").unwrap().rows.unwrap();
//! assert_eq!(rows[0].index, 0);
//! assert_eq!(rows[0].highlights[1].as_deref(), Some("<mark>Premium</mark>"));
//! ```
mod session;

pub use search_cancel::{CancellationToken, SearchVersion};
pub use search_table::*;
pub use session::*;
