//! # External Transliteration Backend
//!
//! An optional third-party transliteration capability, loaded lazily once per
//! process and shared by every caller.
//!
//! ## Load State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NotLoaded ──first caller──► Loading ──ok──► Loaded (cached)           │
//! │                                  │                                      │
//! │                                  └──err──► Failed (terminal)            │
//! │                                                                         │
//! │  Loading holds ONE shared future. Callers arriving while it runs clone  │
//! │  it instead of starting a second load.                                  │
//! │                                                                         │
//! │   caller A ──┐                                                          │
//! │   caller B ──┼──► timeout(load_timeout, shared) ──► fallback on timeout │
//! │   caller C ──┘          │                                               │
//! │                         └── the load itself is a spawned task; it keeps │
//! │                             running after callers give up, and writes   │
//! │                             Loaded/Failed when it finishes              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Best Attempt
//! For each word the service tries every configured input scheme, with and
//! without nativize, and keeps the output with the most Devanagari code
//! points. The output is accepted only if it differs from the input and
//! contains at least one Devanagari code point.

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use patrak_core::numerals::count_devanagari;

use crate::config::{BackendSettings, LipiConfig};
use crate::error::{LipiError, LipiResult};
use crate::http::HttpBackendLoader;

// =============================================================================
// Capability Traits
// =============================================================================

/// Options passed with each transliteration call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransliterateOptions {
    /// Normalize the output to native script conventions.
    pub nativize: bool,
}

/// A loaded transliteration capability.
#[async_trait]
pub trait TransliterationBackend: Send + Sync {
    /// Transliterates `text` read as `scheme` into the `target` script.
    async fn transliterate(
        &self,
        scheme: &str,
        target: &str,
        text: &str,
        options: TransliterateOptions,
    ) -> LipiResult<String>;
}

/// Produces a backend. Called at most once per [`BackendService`].
#[async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self) -> LipiResult<Arc<dyn TransliterationBackend>>;
}

// =============================================================================
// Load State
// =============================================================================

type LoadOutcome = LipiResult<Arc<dyn TransliterationBackend>>;
type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

enum BackendState {
    NotLoaded,
    Loading(SharedLoad),
    Loaded(Arc<dyn TransliterationBackend>),
    Failed(String),
}

/// Observable phase of the backend load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// No backend is configured.
    Disabled,
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Disabled => write!(f, "disabled"),
            BackendStatus::NotLoaded => write!(f, "not loaded"),
            BackendStatus::Loading => write!(f, "loading"),
            BackendStatus::Loaded => write!(f, "loaded"),
            BackendStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

// =============================================================================
// Backend Service
// =============================================================================

/// Lazily loaded, process-wide handle on the external backend.
///
/// Cloning is cheap; clones share the same load state.
#[derive(Clone)]
pub struct BackendService {
    loader: Option<Arc<dyn BackendLoader>>,
    state: Arc<Mutex<BackendState>>,
    load_timeout: Duration,
    call_timeout: Duration,
    schemes: Arc<[String]>,
    target: Arc<str>,
    nativize: &'static [bool],
}

impl fmt::Debug for BackendService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendService")
            .field("enabled", &self.is_enabled())
            .field("load_timeout", &self.load_timeout)
            .field("call_timeout", &self.call_timeout)
            .field("schemes", &self.schemes)
            .finish()
    }
}

impl BackendService {
    /// Service backed by `loader`, tuned by `settings`.
    pub fn new(loader: Arc<dyn BackendLoader>, settings: &BackendSettings) -> Self {
        BackendService {
            loader: Some(loader),
            ..Self::with_settings(settings)
        }
    }

    /// Service with no backend at all. Every lookup falls back.
    pub fn disabled() -> Self {
        Self::with_settings(&BackendSettings::default())
    }

    fn with_settings(settings: &BackendSettings) -> Self {
        BackendService {
            loader: None,
            state: Arc::new(Mutex::new(BackendState::NotLoaded)),
            load_timeout: settings.load_timeout(),
            call_timeout: settings.call_timeout(),
            schemes: settings.schemes.clone().into(),
            target: settings.target.as_str().into(),
            nativize: settings.nativize_options(),
        }
    }

    /// Builds the HTTP-backed service described by `config`, or a disabled
    /// one when the backend is off or its client cannot be built.
    pub fn from_config(config: &LipiConfig) -> Self {
        let Some(url) = config.backend_url().filter(|_| config.backend_enabled()) else {
            debug!("Transliteration backend disabled by config");
            return Self::disabled();
        };

        match HttpBackendLoader::new(url, config.backend.call_timeout()) {
            Ok(loader) => {
                info!(url = %url, "Transliteration backend configured");
                Self::new(Arc::new(loader), &config.backend)
            }
            Err(e) => {
                warn!(error = %e, "Could not build backend client, backend disabled");
                Self::disabled()
            }
        }
    }

    /// Returns true if a loader is configured.
    pub fn is_enabled(&self) -> bool {
        self.loader.is_some()
    }

    /// Current phase of the load.
    pub async fn status(&self) -> BackendStatus {
        if self.loader.is_none() {
            return BackendStatus::Disabled;
        }
        match &*self.state.lock().await {
            BackendState::NotLoaded => BackendStatus::NotLoaded,
            BackendState::Loading(_) => BackendStatus::Loading,
            BackendState::Loaded(_) => BackendStatus::Loaded,
            BackendState::Failed(reason) => BackendStatus::Failed(reason.clone()),
        }
    }

    /// Returns the loaded backend, starting or joining the shared load.
    ///
    /// Waits at most `load_timeout`. A caller that times out does not cancel
    /// the load; a later caller may find it `Loaded`.
    ///
    /// ## Errors
    /// - [`LipiError::BackendDisabled`]: no loader, or no tokio runtime
    /// - [`LipiError::LoadFailed`]: the load failed (now or earlier)
    /// - [`LipiError::LoadTimeout`]: the load is still running
    pub async fn backend(&self) -> LipiResult<Arc<dyn TransliterationBackend>> {
        let Some(loader) = &self.loader else {
            return Err(LipiError::BackendDisabled);
        };

        let shared = {
            let mut state = self.state.lock().await;
            match &*state {
                BackendState::Loaded(backend) => return Ok(backend.clone()),
                BackendState::Failed(reason) => return Err(LipiError::LoadFailed(reason.clone())),
                BackendState::Loading(shared) => shared.clone(),
                BackendState::NotLoaded => {
                    let Ok(handle) = Handle::try_current() else {
                        debug!("No tokio runtime, skipping transliteration backend");
                        return Err(LipiError::BackendDisabled);
                    };
                    let shared = self.start_load(&handle, loader.clone());
                    *state = BackendState::Loading(shared.clone());
                    shared
                }
            }
        };

        match tokio::time::timeout(self.load_timeout, shared).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(
                    timeout_ms = self.load_timeout.as_millis() as u64,
                    "Backend still loading, falling back"
                );
                Err(LipiError::LoadTimeout(self.load_timeout.as_millis() as u64))
            }
        }
    }

    /// Spawns the one load task and wraps its handle in a shared future.
    ///
    /// The caller must hold the state lock and store the result as
    /// `Loading`; the task cannot write its outcome until that lock is
    /// released.
    fn start_load(&self, handle: &Handle, loader: Arc<dyn BackendLoader>) -> SharedLoad {
        info!("Loading transliteration backend");

        let state = self.state.clone();
        let task = handle.spawn(async move {
            let outcome = loader.load().await;
            let mut guard = state.lock().await;
            *guard = match &outcome {
                Ok(backend) => {
                    info!("Transliteration backend loaded");
                    BackendState::Loaded(backend.clone())
                }
                Err(e) => {
                    warn!(error = %e, "Transliteration backend failed to load");
                    BackendState::Failed(e.to_string())
                }
            };
            outcome
        });

        let state = self.state.clone();
        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let reason = join_err.to_string();
                    warn!(error = %reason, "Transliteration backend load task died");
                    *state.lock().await = BackendState::Failed(reason.clone());
                    Err(LipiError::LoadFailed(reason))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Runs every scheme × nativize attempt and returns the best output.
    ///
    /// Returns `Ok(None)` when the backend answered but nothing beat the
    /// input. Individual call failures are skipped.
    pub async fn best_attempt(&self, text: &str) -> LipiResult<Option<String>> {
        let backend = self.backend().await?;
        let mut best: Option<(usize, String)> = None;

        for scheme in self.schemes.iter() {
            for &nativize in self.nativize {
                let call = backend.transliterate(
                    scheme,
                    &self.target,
                    text,
                    TransliterateOptions { nativize },
                );
                let outcome = tokio::time::timeout(self.call_timeout, call)
                    .await
                    .unwrap_or_else(|_| {
                        Err(LipiError::CallTimeout(self.call_timeout.as_millis() as u64))
                    });
                match outcome {
                    Ok(output) => {
                        let score = count_devanagari(&output);
                        if best.as_ref().map_or(true, |(top, _)| score > *top) {
                            best = Some((score, output));
                        }
                    }
                    Err(e) => debug!(scheme = %scheme, nativize, error = %e, "Backend attempt failed"),
                }
            }
        }

        Ok(best
            .filter(|(score, output)| *score > 0 && output != text)
            .map(|(_, output)| output))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a fixed table keyed by (scheme, nativize).
    struct TableBackend {
        answers: Vec<(&'static str, bool, &'static str)>,
    }

    #[async_trait]
    impl TransliterationBackend for TableBackend {
        async fn transliterate(
            &self,
            scheme: &str,
            _target: &str,
            text: &str,
            options: TransliterateOptions,
        ) -> LipiResult<String> {
            self.answers
                .iter()
                .find(|(s, n, _)| *s == scheme && *n == options.nativize)
                .map(|(_, _, out)| out.to_string())
                .ok_or_else(|| LipiError::Http(format!("no answer for {}", text)))
        }
    }

    struct StubLoader {
        loads: Arc<AtomicUsize>,
        delay: Duration,
        fail: bool,
        answers: Vec<(&'static str, bool, &'static str)>,
    }

    impl StubLoader {
        fn new(delay: Duration) -> Self {
            StubLoader {
                loads: Arc::new(AtomicUsize::new(0)),
                delay,
                fail: false,
                answers: vec![("itrans", false, "मुम्बै")],
            }
        }
    }

    #[async_trait]
    impl BackendLoader for StubLoader {
        async fn load(&self) -> LipiResult<Arc<dyn TransliterationBackend>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(LipiError::LoadFailed("script blocked".into()));
            }
            Ok(Arc::new(TableBackend {
                answers: self.answers.clone(),
            }))
        }
    }

    fn settings() -> BackendSettings {
        BackendSettings {
            enabled: true,
            url: Some("http://stub".into()),
            load_timeout_ms: 800,
            ..BackendSettings::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_service() {
        let service = BackendService::disabled();
        assert!(!service.is_enabled());
        assert_eq!(service.status().await, BackendStatus::Disabled);
        assert!(matches!(
            service.backend().await,
            Err(LipiError::BackendDisabled)
        ));
    }

    #[tokio::test]
    async fn test_loads_once_and_caches() {
        let loader = StubLoader::new(Duration::from_millis(10));
        let loads = loader.loads.clone();
        let service = BackendService::new(Arc::new(loader), &settings());

        assert_eq!(service.status().await, BackendStatus::NotLoaded);
        assert!(service.backend().await.is_ok());
        assert!(service.backend().await.is_ok());
        assert_eq!(service.status().await, BackendStatus::Loaded);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let loader = StubLoader::new(Duration::from_millis(50));
        let loads = loader.loads.clone();
        let service = BackendService::new(Arc::new(loader), &settings());

        let (a, b, c) = tokio::join!(service.backend(), service.backend(), service.backend());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_caller_does_not_cancel_load() {
        let loader = StubLoader::new(Duration::from_secs(5));
        let loads = loader.loads.clone();
        let service = BackendService::new(Arc::new(loader), &settings());

        assert!(matches!(
            service.backend().await,
            Err(LipiError::LoadTimeout(800))
        ));
        assert_eq!(service.status().await, BackendStatus::Loading);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(service.status().await, BackendStatus::Loaded);
        assert!(service.backend().await.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_terminal() {
        let mut loader = StubLoader::new(Duration::ZERO);
        loader.fail = true;
        let loads = loader.loads.clone();
        let service = BackendService::new(Arc::new(loader), &settings());

        assert!(matches!(service.backend().await, Err(LipiError::LoadFailed(_))));
        assert!(matches!(service.backend().await, Err(LipiError::LoadFailed(_))));
        assert!(matches!(service.status().await, BackendStatus::Failed(_)));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_best_attempt_prefers_most_devanagari() {
        let mut loader = StubLoader::new(Duration::ZERO);
        loader.answers = vec![
            ("itrans", false, "मुम्बै"),
            ("itrans", true, "मुंबई"),
            ("optitrans", false, "मुम्बaई"),
            ("hk", true, "Mumbai"),
        ];
        let service = BackendService::new(Arc::new(loader), &settings());

        let best = service.best_attempt("Mumbai").await.unwrap();
        assert_eq!(best.as_deref(), Some("मुम्बै"));
    }

    #[tokio::test]
    async fn test_best_attempt_rejects_unchanged_or_latin_output() {
        let mut loader = StubLoader::new(Duration::ZERO);
        loader.answers = vec![("itrans", false, "Mumbai"), ("hk", false, "MUMBAI")];
        let service = BackendService::new(Arc::new(loader), &settings());

        assert_eq!(service.best_attempt("Mumbai").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_from_config_disabled() {
        let service = BackendService::from_config(&LipiConfig::default());
        assert!(!service.is_enabled());
    }
}
