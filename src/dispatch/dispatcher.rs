use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::events::{EventContext, PlatformEvent};
use crate::records::ImportRecord;

/// The job triggers this listener handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    SpaceConfigure,
    SheetFinalValidation,
    WorkbookSubmit,
}

impl JobKind {
    /// Parse the platform's `<domain>:<operation>` job descriptor.
    pub fn parse(descriptor: &str) -> Option<Self> {
        match descriptor {
            "space:configure" => Some(Self::SpaceConfigure),
            "sheet:finalValidation" => Some(Self::SheetFinalValidation),
            "workbook:submitAction" => Some(Self::WorkbookSubmit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpaceConfigure => "space:configure",
            Self::SheetFinalValidation => "sheet:finalValidation",
            Self::WorkbookSubmit => "workbook:submitAction",
        }
    }
}

/// Job lifecycle phases reported in the event topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Ready,
    Completed,
    Failed,
}

impl LifecyclePhase {
    pub fn parse(topic: &str) -> Option<Self> {
        match topic {
            "job:ready" => Some(Self::Ready),
            "job:completed" => Some(Self::Completed),
            "job:failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A workflow bound to one (job kind, phase) pair.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, event: &PlatformEvent) -> Result<()>;
}

/// A validator applied to batches of newly loaded or edited records.
#[async_trait]
pub trait RecordHook: Send + Sync {
    /// Sheet slug this hook is registered for.
    fn sheet_slug(&self) -> &str;

    /// Process the records of one event, returning them (annotated or not).
    async fn process(
        &self,
        records: Vec<ImportRecord>,
        context: &EventContext,
    ) -> Result<Vec<ImportRecord>>;
}

/// What `dispatch` did with an event.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A job handler ran to completion.
    Job { kind: JobKind },
    /// A record hook processed the event's records.
    Records { records: Vec<ImportRecord> },
    /// No handler was registered for the event.
    Ignored,
}

/// Maps events to registered handlers. Handlers never call each other and
/// share no state through the dispatcher.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<(JobKind, LifecyclePhase), Arc<dyn JobHandler>>,
    hooks: Vec<Arc<dyn RecordHook>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: JobKind,
        phase: LifecyclePhase,
        handler: Arc<dyn JobHandler>,
    ) -> &mut Self {
        self.handlers.insert((kind, phase), handler);
        self
    }

    pub fn register_record_hook(&mut self, hook: Arc<dyn RecordHook>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    /// Route one event to its handler.
    pub async fn dispatch(&self, event: &PlatformEvent) -> Result<DispatchOutcome> {
        if event.is_job_event() {
            return self.dispatch_job(event).await;
        }
        if event.is_record_event() {
            return self.dispatch_records(event).await;
        }

        debug!(topic = %event.topic, "No routing for event topic");
        Ok(DispatchOutcome::Ignored)
    }

    async fn dispatch_job(&self, event: &PlatformEvent) -> Result<DispatchOutcome> {
        let Some(phase) = LifecyclePhase::parse(&event.topic) else {
            debug!(topic = %event.topic, "Unknown job lifecycle topic");
            return Ok(DispatchOutcome::Ignored);
        };
        let Some(kind) = event
            .context
            .job
            .as_deref()
            .and_then(JobKind::parse)
        else {
            warn!(job = ?event.context.job, "Unrecognized job descriptor");
            return Ok(DispatchOutcome::Ignored);
        };

        match self.handlers.get(&(kind, phase)) {
            Some(handler) => {
                debug!(job = kind.as_str(), "Dispatching job event");
                handler.handle(event).await?;
                Ok(DispatchOutcome::Job { kind })
            }
            None => Ok(DispatchOutcome::Ignored),
        }
    }

    async fn dispatch_records(&self, event: &PlatformEvent) -> Result<DispatchOutcome> {
        let records = event.records.clone().unwrap_or_default();

        // Route by sheet slug when the event carries one; an absent slug goes
        // to the first registered hook.
        let hook = self.hooks.iter().find(|hook| {
            event
                .context
                .sheet_slug
                .as_deref()
                .map(|slug| slug == hook.sheet_slug())
                .unwrap_or(true)
        });

        match hook {
            Some(hook) => {
                let processed = hook.process(records, &event.context).await?;
                Ok(DispatchOutcome::Records { records: processed })
            }
            None => Ok(DispatchOutcome::Records { records }),
        }
    }
}
