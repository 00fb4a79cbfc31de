// Explicit event dispatch - a (job kind, lifecycle phase) registry instead of
// namespace/filter subscription magic

pub mod dispatcher;

pub use dispatcher::{
    DispatchOutcome, EventDispatcher, JobHandler, JobKind, LifecyclePhase, RecordHook,
};
