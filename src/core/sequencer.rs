//! # Sequencer: runs startup hooks in priority order.
//!
//! The [`Sequencer`] owns the hook registry, the shared [`Resources`], the
//! [`Launcher`] handed to hooks, and the event [`Bus`].
//!
//! ## Lifecycle
//! ```text
//! Sequencer::builder(cfg) ──► build()
//!        │
//!        ├─► register(spec) / register_fn(name, priority, f)   (registration phase)
//!        │
//!        └─► run(self)                                          (run phase, consumes)
//!               sort by priority desc (stable)
//!               for each hook:
//!                 ├─► publish HookStarting
//!                 ├─► hook.run(ctx).await
//!                 │      ├─ Ok  ──► publish HookFinished, next hook
//!                 │      └─ Err ──► log, publish HookFailed, return HookFailed
//!                 │                 (remaining hooks are not run)
//!               publish SequenceCompleted
//! ```
//!
//! ## Rules
//! - A hook's own future is awaited; tasks it launches are **not**
//! - `run` takes `self`, so the registry cannot change while hooks execute
//! - Hook errors are returned unchanged inside [`SequenceError::HookFailed`]

use std::borrow::Cow;
use std::future::Future;

use crate::core::builder::SequencerBuilder;
use crate::core::config::SequencerConfig;
use crate::core::context::HookContext;
use crate::core::launcher::Launcher;
use crate::core::registry::Registry;
use crate::error::{HookError, SequenceError};
use crate::events::{Bus, Event, EventKind};
use crate::hooks::{HookFn, HookSpec};
use crate::resources::Resources;

/// Priority-ordered startup sequencer.
///
/// ## Example
/// ```rust
/// use bootvisor::{priority, HookContext, HookError, Sequencer, SequencerConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut seq = Sequencer::builder(SequencerConfig::default()).build();
///
///     seq.register_fn("start_api", priority::LAST, |_ctx: HookContext| async {
///         Ok::<_, HookError>(())
///     })?;
///     seq.register_fn("load_config", priority::FIRST, |ctx: HookContext| async move {
///         ctx.resources().insert(String::from("{}"));
///         Ok::<_, HookError>(())
///     })?;
///
///     assert_eq!(seq.plan(), ["load_config", "start_api"]);
///     seq.run().await?;
///     Ok(())
/// }
/// ```
pub struct Sequencer {
    cfg: SequencerConfig,
    bus: Bus,
    registry: Registry,
    launcher: Launcher,
    resources: Resources,
}

impl Sequencer {
    /// Starts building a sequencer.
    pub fn builder(cfg: SequencerConfig) -> SequencerBuilder {
        SequencerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: SequencerConfig, bus: Bus, resources: Resources) -> Self {
        let launcher = Launcher::new(bus.clone(), cfg.restart_delay);
        Self {
            cfg,
            bus,
            registry: Registry::default(),
            launcher,
            resources,
        }
    }

    /// Registers a hook.
    ///
    /// Fails with [`SequenceError::DuplicateHook`] if the name is already taken.
    pub fn register(&mut self, spec: HookSpec) -> Result<(), SequenceError> {
        tracing::debug!(hook = spec.name(), priority = spec.priority(), "registering startup hook");
        self.registry.register(spec)
    }

    /// Registers a closure as a hook.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        priority: i32,
        f: F,
    ) -> Result<(), SequenceError>
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.register(HookSpec::new(HookFn::arc(name, f), priority))
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Hook names in the order [`run`](Self::run) will execute them.
    pub fn plan(&self) -> Vec<String> {
        self.registry.plan()
    }

    /// Configuration this sequencer was built with.
    pub fn config(&self) -> &SequencerConfig {
        &self.cfg
    }

    /// Event bus shared with hooks and supervisor loops.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Resources handed to hooks.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Launcher handed to hooks.
    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Runs every registered hook, highest priority first.
    ///
    /// Returns once every hook has returned, or with the first hook error.
    pub async fn run(self) -> Result<(), SequenceError> {
        let ctx = HookContext::new(self.launcher, self.resources, self.bus.clone());
        let hooks = self.registry.into_sorted();
        let total = hooks.len();

        tracing::info!(hooks = total, "running startup sequence");

        for spec in hooks {
            let name = spec.name();
            let priority = spec.priority();

            tracing::info!(hook = name, priority, "running startup hook");
            self.bus.publish(
                Event::now(EventKind::HookStarting)
                    .with_task(name)
                    .with_priority(priority),
            );

            if let Err(source) = spec.hook().run(ctx.clone()).await {
                tracing::error!(hook = name, priority, error = %source, "startup hook failed; aborting sequence");
                self.bus.publish(
                    Event::now(EventKind::HookFailed)
                        .with_task(name)
                        .with_priority(priority)
                        .with_error(source.to_string()),
                );
                return Err(SequenceError::HookFailed {
                    hook: name.to_string(),
                    source,
                });
            }

            self.bus.publish(
                Event::now(EventKind::HookFinished)
                    .with_task(name)
                    .with_priority(priority),
            );
        }

        tracing::info!(hooks = total, "startup sequence completed");
        self.bus.publish(
            Event::now(EventKind::SequenceCompleted)
                .with_attempt(u32::try_from(total).unwrap_or(u32::MAX)),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::hooks::priority;
    use crate::tasks::TaskFn;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Journal = Arc<Mutex<Vec<&'static str>>>;

    fn sequencer() -> Sequencer {
        Sequencer::builder(SequencerConfig::default()).build()
    }

    fn record(
        seq: &mut Sequencer,
        journal: &Journal,
        name: &'static str,
        priority: i32,
    ) -> Result<(), SequenceError> {
        let journal = Arc::clone(journal);
        seq.register_fn(name, priority, move |_ctx: HookContext| {
            let journal = Arc::clone(&journal);
            async move {
                journal.lock().unwrap().push(name);
                Ok(())
            }
        })
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("invalid literal: {0}")]
    struct ValueError(&'static str);

    #[tokio::test]
    async fn runs_by_descending_priority_stable_on_ties() {
        let journal = Journal::default();
        let mut seq = sequencer();
        record(&mut seq, &journal, "D", priority::LAST).unwrap();
        record(&mut seq, &journal, "C", 5).unwrap();
        record(&mut seq, &journal, "A", 10).unwrap();
        record(&mut seq, &journal, "B", 10).unwrap();

        seq.run().await.unwrap();
        assert_eq!(*journal.lock().unwrap(), ["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn last_runs_after_hooks_registered_later() {
        let journal = Journal::default();
        let mut seq = sequencer();
        record(&mut seq, &journal, "start_api", priority::LAST).unwrap();
        record(&mut seq, &journal, "plugin_a", -1_000_000).unwrap();
        record(&mut seq, &journal, "init_mongo", priority::FIRST - 3).unwrap();
        record(&mut seq, &journal, "plugin_b", i32::MIN + 1).unwrap();

        seq.run().await.unwrap();
        assert_eq!(
            *journal.lock().unwrap(),
            ["init_mongo", "plugin_a", "plugin_b", "start_api"]
        );
    }

    #[tokio::test]
    async fn failing_hook_aborts_sequence_with_same_error() {
        let journal = Journal::default();
        let mut seq = sequencer();
        let mut rx = seq.bus().subscribe();
        record(&mut seq, &journal, "before", 20).unwrap();
        seq.register_fn("E", 10, |_ctx: HookContext| async {
            Err(HookError::new(ValueError("abc")))
        })
        .unwrap();
        record(&mut seq, &journal, "after", 5).unwrap();
        record(&mut seq, &journal, "start_api", priority::LAST).unwrap();

        let err = seq.run().await.unwrap_err();
        assert_eq!(err.hook_name(), "E");
        assert_eq!(err.as_label(), "sequence_hook_failed");
        let source = err.into_hook_error().expect("hook error");
        assert_eq!(source.downcast_ref::<ValueError>(), Some(&ValueError("abc")));
        assert_eq!(*journal.lock().unwrap(), ["before"]);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                EventKind::HookStarting,
                EventKind::HookFinished,
                EventKind::HookStarting,
                EventKind::HookFailed,
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let journal = Journal::default();
        let mut seq = sequencer();
        record(&mut seq, &journal, "init_redis", 3).unwrap();
        let err = record(&mut seq, &journal, "init_redis", 4).unwrap_err();

        assert!(matches!(err, SequenceError::DuplicateHook { .. }));
        assert_eq!(seq.len(), 1);
    }

    #[tokio::test]
    async fn later_hooks_read_what_earlier_hooks_wrote() {
        struct SupportEmail(Option<String>);

        let seen = Arc::new(Mutex::new(None));
        let mut seq = sequencer();
        let sink = Arc::clone(&seen);
        seq.register_fn("warn_on_missing_support_email", 1, move |ctx: HookContext| {
            let sink = Arc::clone(&sink);
            async move {
                let email = ctx.resources().require::<SupportEmail>()?;
                *sink.lock().unwrap() = Some(email.0.is_none());
                Ok::<(), HookError>(())
            }
        })
        .unwrap();
        seq.register_fn("load_config", priority::FIRST, |ctx: HookContext| async move {
            ctx.resources().insert(SupportEmail(None));
            Ok(())
        })
        .unwrap();

        seq.run().await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn run_does_not_wait_for_launched_work() {
        let mut seq = sequencer();
        let mut rx = seq.bus().subscribe();
        seq.register_fn("expire_stale_prefs", 2, |ctx: HookContext| async move {
            let _detached = ctx.spawn(TaskFn::arc("expire_stale_prefs", || async {
                std::future::pending::<()>().await;
                Ok::<(), TaskError>(())
            }));
            Ok(())
        })
        .unwrap();
        seq.register_fn("start_cp_blockfeed", 3, |ctx: HookContext| async move {
            ctx.supervise(TaskFn::arc("blockfeed", || async {
                std::future::pending::<()>().await;
                Ok::<(), TaskError>(())
            }))?;
            Ok::<(), HookError>(())
        })
        .unwrap();

        tokio::time::timeout(Duration::from_secs(5), seq.run())
            .await
            .expect("run returned without waiting on launched tasks")
            .unwrap();

        let completed = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|ev| ev.kind == EventKind::SequenceCompleted)
            .expect("completion event");
        assert_eq!(completed.attempt, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn supervised_hook_failure_never_reaches_run() {
        let launches = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&launches);
        let mut seq = Sequencer::builder(SequencerConfig {
            restart_delay: Duration::from_secs(2),
            ..SequencerConfig::default()
        })
        .build();
        let mut rx = seq.bus().subscribe();

        seq.register_fn("start_cp_blockfeed", priority::FIRST - 6, move |ctx: HookContext| {
            let counter = Arc::clone(&counter);
            async move {
                ctx.supervise(TaskFn::arc("blockfeed", move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if n <= 3 {
                            return Err(TaskError::fail("zmq feed dropped"));
                        }
                        std::future::pending::<()>().await;
                        Ok(())
                    }
                }))?;
                Ok::<(), HookError>(())
            }
        })
        .unwrap();

        seq.run().await.unwrap();

        let mut failures = 0;
        loop {
            let ev = rx.recv().await.expect("bus open");
            match ev.kind {
                EventKind::TaskFailed => failures += 1,
                EventKind::TaskStarting if ev.attempt == Some(4) => break,
                _ => {}
            }
        }
        assert_eq!(failures, 3);
        tokio::task::yield_now().await;
        assert_eq!(launches.load(Ordering::SeqCst), 4);
    }
}
