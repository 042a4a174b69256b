//! Load environment-specific YAML configuration into environment variables.
//!
//! A config file maps environment names (`development`, `production`, ...)
//! to key/value pairs. `Yaml2Env` detects the application root and active
//! environment, selects that environment's pairs, and exports the ones named
//! by a [`KeySpec`] as environment variables:
//!
//! ```no_run
//! use yaml2env::{KeySpec, Yaml2Env};
//!
//! let mut yaml2env = Yaml2Env::new();
//! yaml2env.configure(|s| {
//!     s.set_root(Some("/srv/app".into()));
//!     s.set_env(Some("production".into()));
//! });
//! yaml2env.load(
//!     "config/s3.yml",
//!     &KeySpec::new()
//!         .require("S3_KEY", "api_key")
//!         .require("S3_SECRET", "api_secret"),
//! )?;
//! # Ok::<(), yaml2env::Yaml2EnvError>(())
//! ```

pub mod assertions;
pub mod constants;
pub mod detect;
pub mod document;
mod error;
mod keys;
mod ledger;
mod logger;
pub mod projector;
mod session;
mod settings;
pub mod store;

pub use detect::Detector;
pub use document::{ConfigDocument, EnvSubtree, load_config, load_config_for_env};
pub use error::{Result, Yaml2EnvError};
pub use keys::KeySpec;
pub use ledger::Ledger;
pub use logger::{LogSink, TracingSink};
pub use session::Yaml2Env;
pub use settings::Settings;
pub use store::{EnvStore, MemoryEnv, ProcessEnv};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicU64, Ordering},
    };

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    /// Minimal in-test tracing subscriber that records event messages.
    #[derive(Clone, Default)]
    struct CapturingSubscriber {
        events: Arc<Mutex<Vec<String>>>,
        next_id: Arc<AtomicU64>,
    }

    impl CapturingSubscriber {
        fn take_messages(&self) -> Vec<String> {
            std::mem::take(&mut *self.events.lock().expect("lock poisoned"))
        }
    }

    #[derive(Default)]
    struct MessageVisitor {
        message: Option<String>,
    }

    impl tracing::field::Visit for MessageVisitor {
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.message = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.message = Some(format!("{value:?}"));
            }
        }
    }

    impl tracing::Subscriber for CapturingSubscriber {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            tracing::span::Id::from_u64(id)
        }

        fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            // Only yaml2env sink output; detector debug events are skipped.
            if event.metadata().target() != "yaml2env" {
                return;
            }
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            if let Some(msg) = visitor.message {
                self.events.lock().expect("lock poisoned").push(msg);
            }
        }

        fn enter(&self, _span: &tracing::span::Id) {}

        fn exit(&self, _span: &tracing::span::Id) {}
    }

    /// Run `f` with a capturing subscriber and return the messages logged
    /// through `TracingSink`.
    pub fn capture_messages<F: FnOnce()>(f: F) -> Vec<String> {
        let _guard = global_test_lock()
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let subscriber = CapturingSubscriber {
            events: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        };

        let dispatch = tracing::Dispatch::new(subscriber.clone());
        tracing::dispatcher::with_default(&dispatch, f);
        subscriber.take_messages()
    }
}
