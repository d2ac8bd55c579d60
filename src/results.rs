pub mod batch;
pub mod cursor;
pub mod row;

pub use batch::{BatchResult, Outcome, StatementOutcome};
pub use cursor::BufferedCursor;
pub use row::{CustomDbRow, FetchedRow};
