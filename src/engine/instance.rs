// src/engine/instance.rs

//! One mounted assessment widget.
//!
//! Wraps a [`Session`] with its render-time configuration and submits the
//! finished attempt exactly once, in the background. The outcome of that call
//! only updates an advisory [`SaveNotice`]; results and exports keep working
//! regardless.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

use crate::engine::client::SubmissionTransport;
use crate::engine::export::{self, CsvExport, ExportError, CSV_FILE_NAME};
use crate::engine::registry::{InstanceRegistry, Registration};
use crate::engine::scoring::ScoreCard;
use crate::engine::session::{PresentedQuestion, Progress, Session, Step};
use crate::engine::{EngineError, PAYLOAD_VERSION};
use crate::models::client_config::ClientConfig;

/// Advisory state of the background save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveNotice {
    Idle,
    Pending,
    Saved(i64),
    Failed(String),
    NotConfigured,
}

impl SaveNotice {
    /// Text shown to the user when the attempt was not durably saved.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            SaveNotice::Failed(_) => {
                Some("We could not save your attempt. Please screenshot this and contact admin.")
            }
            SaveNotice::NotConfigured => Some("Saving is not configured; your attempt was not stored."),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, SaveNotice::Idle | SaveNotice::Pending)
    }
}

/// What the results view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub candidate: String,
    pub scores: ScoreCard,
    pub band_description: &'static str,
    pub duration_ms: u128,
}

pub struct AssessmentInstance {
    id: Uuid,
    session: Session,
    config: ClientConfig,
    transport: Arc<dyn SubmissionTransport>,
    notice: Arc<watch::Sender<SaveNotice>>,
    rng: StdRng,
    /// Bumped on reset so a late save result cannot overwrite a fresh notice.
    generation: Arc<AtomicU64>,
    /// `None` for instances built outside a registry.
    registration: Option<Registration>,
}

impl AssessmentInstance {
    pub fn new(id: Uuid, config: ClientConfig, transport: Arc<dyn SubmissionTransport>) -> Self {
        Self::with_rng(id, config, transport, StdRng::from_entropy())
    }

    /// Mounts a new instance if the registry admits it. The slot is released
    /// when the instance is dropped.
    pub fn mount(
        registry: &InstanceRegistry,
        allow_multiple: bool,
        config: ClientConfig,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Option<Self> {
        let registration = registry.admit(allow_multiple)?;
        Some(Self::registered(registration, config, transport))
    }

    /// Mounts an instance unconditionally, as a late arrival. A later sweep
    /// may deactivate it.
    pub fn attach(
        registry: &InstanceRegistry,
        allow_multiple: bool,
        config: ClientConfig,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Self {
        Self::registered(registry.attach(allow_multiple), config, transport)
    }

    fn registered(
        registration: Registration,
        config: ClientConfig,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Self {
        let mut instance = Self::new(registration.id(), config, transport);
        instance.registration = Some(registration);
        instance
    }

    pub fn with_rng(
        id: Uuid,
        config: ClientConfig,
        transport: Arc<dyn SubmissionTransport>,
        mut rng: StdRng,
    ) -> Self {
        let session = Session::new(&mut rng);
        let (notice, _) = watch::channel(SaveNotice::Idle);
        AssessmentInstance {
            id,
            session,
            config,
            transport,
            notice: Arc::new(notice),
            rng,
            generation: Arc::new(AtomicU64::new(0)),
            registration: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// `false` once a sweep removed this instance from its registry.
    pub fn is_active(&self) -> bool {
        self.registration.as_ref().is_none_or(Registration::is_active)
    }

    fn ensure_active(&self) -> Result<(), EngineError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(EngineError::Removed)
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current(&self) -> Option<PresentedQuestion> {
        self.session.current()
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    pub fn select(&mut self, position: usize) -> Result<(), EngineError> {
        self.ensure_active()?;
        self.session.select(position)
    }

    pub fn prev(&mut self) -> Result<(), EngineError> {
        self.ensure_active()?;
        self.session.prev()
    }

    /// Advances the session. The completing step also starts the background
    /// save; the returned handle is `Some` only when a call was actually made.
    pub fn next(&mut self) -> Result<(Step, Option<JoinHandle<()>>), EngineError> {
        self.ensure_active()?;
        let step = self.session.next()?;
        let handle = match step {
            Step::Completed => self.submit(),
            Step::Advanced(_) => None,
        };
        Ok((step, handle))
    }

    /// Clears the attempt and reshuffles. Any in-flight save is ignored.
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.session.reset(&mut self.rng);
        self.notice.send_replace(SaveNotice::Idle);
    }

    pub fn notice(&self) -> SaveNotice {
        self.notice.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveNotice> {
        self.notice.subscribe()
    }

    pub fn results(&self) -> Option<ResultsView> {
        let done = self.session.completion()?;
        Some(ResultsView {
            candidate: self.config.user.summary(),
            scores: done.scores.clone(),
            band_description: done.scores.band.description(),
            duration_ms: done.elapsed.as_millis(),
        })
    }

    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        let contents = export::export_csv(
            &self.session.scores(),
            self.session.sheet(),
            &self.config.user,
            Utc::now(),
        )?;
        Ok(CsvExport {
            file_name: CSV_FILE_NAME,
            contents,
        })
    }

    pub fn raw_answer_summary(&self) -> String {
        export::raw_answer_summary(self.session.sheet(), &self.config.user)
    }

    fn submit(&self) -> Option<JoinHandle<()>> {
        let endpoint = match Url::parse(&self.config.endpoint) {
            Ok(url) if !self.config.token.trim().is_empty() => url,
            _ => {
                tracing::warn!("Assessment {} has no submit endpoint or token; not saving", self.id);
                self.notice.send_replace(SaveNotice::NotConfigured);
                return None;
            }
        };

        let payload = match self.session.payload(PAYLOAD_VERSION) {
            Ok(payload) => payload,
            Err(e) => {
                self.notice.send_replace(SaveNotice::Failed(e.to_string()));
                return None;
            }
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("No runtime to submit assessment {}: {}", self.id, e);
                self.notice.send_replace(SaveNotice::Failed(e.to_string()));
                return None;
            }
        };

        self.notice.send_replace(SaveNotice::Pending);

        let id = self.id;
        let token = self.config.token.clone();
        let transport = Arc::clone(&self.transport);
        let notice = Arc::clone(&self.notice);
        let generation = Arc::clone(&self.generation);
        let started_in = generation.load(Ordering::SeqCst);

        Some(runtime.spawn(async move {
            let outcome = match transport.submit(&endpoint, &token, &payload).await {
                Ok(response) => {
                    tracing::info!("Saved assessment {} as attempt {}", id, response.attempt_id);
                    SaveNotice::Saved(response.attempt_id)
                }
                Err(e) => {
                    tracing::error!("Submitting assessment {} failed: {}", id, e);
                    SaveNotice::Failed(e.to_string())
                }
            };
            if generation.load(Ordering::SeqCst) == started_in {
                notice.send_replace(outcome);
            }
        }))
    }
}
