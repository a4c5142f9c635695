//! Pipeline components: source, counting stage, sink, coordinator, observers.

pub mod context;
pub mod error_handler;
pub mod observer;
pub mod orchestrator;
pub mod sink;
pub mod source;
pub mod transform;

pub use context::{PipelineState, RunState};
pub use error_handler::{BoxError, PipelineError, report_failure};
pub use observer::{ChannelObserver, LogObserver, NullObserver, RunEvent, RunObserver};
pub use orchestrator::{Coordinator, transform_file};
pub use sink::{ChunkSink, FileSink, MemorySink};
pub use source::{ChunkSource, FileSource, MemorySource};
pub use transform::{CountingStage, StageOutput, TextTransform, Uppercase, count_lines};
