mod count;
mod index;
mod record;

pub use count::RecordCount;
pub use index::ReportIndex;
pub use record::ReportRecord;
