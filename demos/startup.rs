//! # Example: service startup
//!
//! A block-explorer style service boots through ordered hooks:
//!
//! ```text
//! load_config ─► init_geoip ─► init_mongo ─► init_redis ─► init_siofeeds
//!   ─► start_cp_blockfeed (supervised) ─► periodic maintenance (4 spawns)
//!   ─► warn_on_missing_support_email ─► start_api (last, blocks until signal)
//! ```
//!
//! Collaborators are stubs. The block feed crashes every few seconds to show the
//! supervisor relaunching it after the restart delay.
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run --example startup
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use bootvisor::{
    Event, EventKind, HookContext, HookError, Sequencer, SequencerConfig, Subscribe, TaskError,
    TaskFn, TaskRef, priority, wait_for_shutdown_signal,
};

/// Raw configuration text; `{}` when nothing could be loaded.
struct AppConfig {
    raw: String,
    support_email: Option<String>,
}

struct MongoPool {
    url: String,
}

struct RedisClient {
    url: String,
}

/// Prints supervision events; everything else goes through tracing.
struct Console;

#[async_trait]
impl Subscribe for Console {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::TaskFailed => println!(
                "[console] {} failed (attempt {}): {}",
                ev.task.as_deref().unwrap_or("?"),
                ev.attempt.unwrap_or(0),
                ev.error.as_deref().unwrap_or("")
            ),
            EventKind::RestartScheduled => println!(
                "[console] {} restarting in {}ms",
                ev.task.as_deref().unwrap_or("?"),
                ev.delay_ms.unwrap_or(0)
            ),
            EventKind::SequenceCompleted => println!("[console] startup complete"),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

async fn tick_forever(name: &'static str, every: Duration) -> Result<(), TaskError> {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        tracing::debug!(task = name, "periodic run");
    }
}

fn periodic(name: &'static str, every: Duration) -> TaskRef {
    TaskFn::arc(name, move || tick_forever(name, every))
}

fn register_hooks(seq: &mut Sequencer) -> Result<(), bootvisor::SequenceError> {
    seq.register_fn("load_config", priority::FIRST, |ctx: HookContext| async move {
        let path = std::env::var("BOOTVISOR_CONFIG").unwrap_or_else(|_| "config.json".into());
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%path, error = %e, "config not loaded, using defaults");
                String::from("{}")
            }
        };
        let support_email = std::env::var("SUPPORT_EMAIL").ok();
        ctx.resources().insert(AppConfig { raw, support_email });
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("init_geoip", priority::FIRST - 1, |_ctx: HookContext| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tracing::info!("geoip database up to date");
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("init_mongo", priority::FIRST - 2, |ctx: HookContext| async move {
        let cfg = ctx.resources().require::<AppConfig>()?;
        tracing::debug!(config_len = cfg.raw.len(), "connecting to mongo");
        ctx.resources().insert(MongoPool {
            url: String::from("mongodb://127.0.0.1:27017"),
        });
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("init_redis", priority::FIRST - 3, |ctx: HookContext| async move {
        ctx.resources().insert(RedisClient {
            url: String::from("redis://127.0.0.1:6379"),
        });
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("init_siofeeds", priority::FIRST - 4, |ctx: HookContext| async move {
        let redis = ctx.resources().require::<RedisClient>()?;
        tracing::info!(redis = %redis.url, "real-time feeds ready");
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("start_cp_blockfeed", priority::FIRST - 5, |ctx: HookContext| async move {
        let mongo = ctx.resources().require::<MongoPool>()?;
        let runs = Arc::new(AtomicU32::new(0));
        ctx.supervise(TaskFn::arc("cp_blockfeed", move || {
            let mongo = Arc::clone(&mongo);
            let runs = Arc::clone(&runs);
            async move {
                let run = runs.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::info!(run, db = %mongo.url, "block feed processing");
                tokio::time::sleep(Duration::from_secs(3)).await;
                Err::<(), TaskError>(TaskError::fail("lost connection to backend"))
            }
        }))?;
        Ok::<_, HookError>(())
    })?;

    seq.register_fn("start_maintenance", priority::FIRST - 6, |ctx: HookContext| async move {
        let _ = ctx.spawn(periodic("expire_stale_sessions", Duration::from_secs(60)));
        let _ = ctx.spawn(periodic("prune_asset_cache", Duration::from_secs(300)));
        let _ = ctx.spawn(periodic("refresh_market_info", Duration::from_secs(30)));
        let _ = ctx.spawn(periodic("compact_history", Duration::from_secs(3600)));
        Ok::<_, HookError>(())
    })?;

    seq.register_fn(
        "warn_on_missing_support_email",
        priority::FIRST - 7,
        |ctx: HookContext| async move {
            let cfg = ctx.resources().require::<AppConfig>()?;
            if cfg.support_email.is_none() {
                tracing::warn!("support email not set, unhandled errors will not be mailed");
            }
            Ok::<_, HookError>(())
        },
    )?;

    seq.register_fn("start_api", priority::LAST, |_ctx: HookContext| async {
        tracing::info!("api serving, waiting for shutdown signal");
        wait_for_shutdown_signal().await.map_err(HookError::new)?;
        Ok::<_, HookError>(())
    })?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = SequencerConfig {
        restart_delay: Duration::from_secs(2),
        ..SequencerConfig::default()
    };
    let mut seq = Sequencer::builder(cfg)
        .with_subscribers(vec![Arc::new(Console)])
        .build();

    register_hooks(&mut seq)?;
    println!("startup plan: {:?}", seq.plan());

    seq.run().await?;
    Ok(())
}
