pub mod control;
pub mod document;
pub mod evidence;
pub mod gap;
pub mod job;
pub mod user;

pub use control::{CheckType, Control, ControlCatalog, ControlCategories, ControlCategory, ControlList, ControlSummary};
pub use document::{Document, DocumentKind, DocumentList};
pub use evidence::{EvidenceItem, EvidenceList};
pub use gap::{Gap, GapList, Severity};
pub use job::{Job, JobList, ScanType};
pub use user::{Token, User};
