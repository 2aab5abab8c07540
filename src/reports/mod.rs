pub mod buffer;
pub mod flusher;

pub use buffer::ReportBuffer;
pub use flusher::{FlushOutcome, ReportFlusher};
