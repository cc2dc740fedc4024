use std::sync::Arc;

use crate::{
    core::SequencerConfig,
    events::Bus,
    resources::Resources,
    subscribers::{Subscribe, SubscriberSet},
};
use super::sequencer::Sequencer;

/// Builder for constructing a [`Sequencer`] with optional observers and pre-seeded resources.
pub struct SequencerBuilder {
    cfg: SequencerConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    resources: Resources,
}

impl SequencerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SequencerConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            resources: Resources::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive every event published on the bus (hook progress,
    /// launches, supervised failures and restarts) through dedicated workers
    /// with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Uses an existing resource store instead of an empty one.
    ///
    /// Lets the caller seed values (command line settings, say) that the first
    /// hooks build upon.
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    /// Builds the sequencer.
    ///
    /// With subscribers configured, this spawns their workers and the bus
    /// listener, so it must then be called from within a tokio runtime.
    pub fn build(self) -> Sequencer {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(&bus, subs);
        }

        Sequencer::new_internal(self.cfg, bus, self.resources)
    }
}

/// Forwards bus events to the subscriber set until the bus closes.
fn subscriber_listener(bus: &Bus, subs: SubscriberSet) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subs.emit(&ev),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber listener lagged behind the event bus");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
        subs.shutdown().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookContext;
    use crate::error::HookError;
    use crate::events::{Event, EventKind};

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct Forward(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Subscribe for Forward {
        async fn on_event(&self, event: &Event) {
            let _ = self.0.send(event.kind);
        }

        fn name(&self) -> &'static str {
            "forward"
        }
    }

    #[tokio::test]
    async fn subscribers_observe_the_sequence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut seq = Sequencer::builder(SequencerConfig::default())
            .with_subscribers(vec![Arc::new(Forward(tx))])
            .build();
        seq.register_fn("init_siofeeds", 1, |_ctx: HookContext| async {
            Ok::<(), HookError>(())
        })
        .unwrap();

        seq.run().await.unwrap();

        let mut kinds = Vec::new();
        while let Some(kind) = rx.recv().await {
            kinds.push(kind);
            if kind == EventKind::SequenceCompleted {
                break;
            }
        }
        assert_eq!(
            kinds,
            [
                EventKind::HookStarting,
                EventKind::HookFinished,
                EventKind::SequenceCompleted
            ]
        );
    }

    #[tokio::test]
    async fn seeded_resources_reach_hooks() {
        let resources = Resources::new();
        resources.insert(8u16);
        let mut seq = Sequencer::builder(SequencerConfig::default())
            .with_resources(resources.clone())
            .build();
        seq.register_fn("double", 1, |ctx: HookContext| async move {
            let n = ctx.resources().require::<u16>()?;
            ctx.resources().insert(u32::from(*n) * 2);
            Ok::<(), HookError>(())
        })
        .unwrap();

        seq.run().await.unwrap();
        assert_eq!(resources.get::<u32>().as_deref(), Some(&16));
    }
}
