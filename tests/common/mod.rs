use portico::body::{DecodeError, PayloadSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// JSON payload source that counts how often the bridge decode runs.
pub struct CountingJsonSource {
    calls: Arc<AtomicUsize>,
    payload: String,
}

impl CountingJsonSource {
    /// Build the source plus a handle on its decode counter.
    pub fn new(payload: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingJsonSource {
                calls: Arc::clone(&calls),
                payload: payload.to_string(),
            },
            calls,
        )
    }
}

impl PayloadSource for CountingJsonSource {
    fn kind_tag(&self) -> &str {
        "json"
    }

    fn read_json(&self) -> Result<Vec<u8>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone().into_bytes())
    }
}
