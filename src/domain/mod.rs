pub mod content;
pub mod report;
pub mod types;

pub use content::ContentItem;
pub use report::{PendingReport, ReportAck, ReportRequest};
pub use types::{AnnotatedItem, Annotation, Fingerprint, SpamVerdict, VerdictSource};
