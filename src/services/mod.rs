pub mod failure_log;
pub mod stream_recorder;
pub mod translator;

pub use failure_log::FailureLog;
pub use stream_recorder::{PageSink, StreamRecorder};
pub use translator::{clean_translation, Translator};
