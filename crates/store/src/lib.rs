//! Material price store.
//!
//! Imports monthly construction-material prices from spreadsheets, keeps them
//! deduplicated by (month, name, specification), persists them as a single
//! checksummed blob and answers filter, date-range and history queries.
//!
//! ```no_run
//! use matprice_store::{FileBackend, Store};
//!
//! let mut store = Store::open(FileBackend::new("material_prices.json"));
//! let outcome = store.import("prices.xlsx");
//! println!("{}", outcome.summary);
//!
//! for record in store.search("钢筋", "", "2023") {
//!     println!("{} {} {}", record.year_month(), record.material_name(), record.unit_price());
//! }
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod ingest;
pub mod query;
pub mod record;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod suggest;

pub use backend::{BlobBackend, FileBackend, MemoryBackend};
pub use ingest::{columns, ImportOutcome, ImportStats, Ingestor, RowVerdict};
pub use query::most_recent;
pub use record::{DedupKey, MaterialRecord, YearMonth};
pub use source::{read_rows, Cell, Row, SourceFormat};
pub use store::{LoadStatus, MirrorStatus, SaveReport, Store, StoreStats};
pub use suggest::{Material, Suggestions};
