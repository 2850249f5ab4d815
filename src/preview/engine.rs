use std::mem;
use std::path::Path;

use crate::error::{PreviewError, Result};
use crate::pdf::create_pdf;

use super::config::{PreviewConfig, Viewport, ZOOM_STEP};
use super::decode::extract_pdf_text;
use super::document::{PageEdit, PreviewDocument};
use super::handle::HandleRegistry;
use super::kind::FileKind;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Where a preview slot is in its lifecycle.
///
/// Documents move between states by value; only `Ready`, `Editing` and
/// `Saving` hold one.
#[derive(Debug, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading {
        token: u64,
        name: String,
    },
    Ready(PreviewDocument),
    Editing(PreviewDocument),
    Saving(PreviewDocument),
    Error {
        message: String,
    },
}

impl PreviewState {
    pub fn name(&self) -> &'static str {
        match self {
            PreviewState::Idle => "idle",
            PreviewState::Loading { .. } => "loading",
            PreviewState::Ready(_) => "ready",
            PreviewState::Editing(_) => "editing",
            PreviewState::Saving(_) => "saving",
            PreviewState::Error { .. } => "error",
        }
    }

    pub fn document(&self) -> Option<&PreviewDocument> {
        match self {
            PreviewState::Ready(doc) | PreviewState::Editing(doc) | PreviewState::Saving(doc) => {
                Some(doc)
            }
            _ => None,
        }
    }
}

/// Inputs to [`PreviewEngine::apply`].
#[derive(Debug)]
pub enum PreviewEvent {
    /// A new file was picked; its bytes are on the way
    Open { name: String },
    /// Result of decoding the file opened under `token`
    Decoded {
        token: u64,
        outcome: Result<PreviewDocument>,
    },
    /// Go to a page index; out-of-range values are clamped
    Navigate(isize),
    SetZoom(f64),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Resize(Viewport),
    BeginEdit,
    EndEdit,
    EditPage { index: usize, edit: PageEdit },
    Save,
    /// The bytes of a [`SaveJob`] were stored, or failed to be
    SaveFinished(Result<()>),
    Close,
}

impl PreviewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PreviewEvent::Open { .. } => "open",
            PreviewEvent::Decoded { .. } => "decode",
            PreviewEvent::Navigate(_) => "navigate",
            PreviewEvent::SetZoom(_) => "set zoom",
            PreviewEvent::ZoomIn => "zoom in",
            PreviewEvent::ZoomOut => "zoom out",
            PreviewEvent::ResetZoom => "reset zoom",
            PreviewEvent::Resize(_) => "resize",
            PreviewEvent::BeginEdit => "begin edit",
            PreviewEvent::EndEdit => "end edit",
            PreviewEvent::EditPage { .. } => "edit page",
            PreviewEvent::Save => "save",
            PreviewEvent::SaveFinished(_) => "finish save",
            PreviewEvent::Close => "close",
        }
    }
}

/// Re-encoded file waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveJob {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Loading started; the decode result must carry this token
    Loading { token: u64 },
    /// A decode result arrived for a request that is no longer current
    Discarded,
    Save(SaveJob),
}

fn invalid(event: &str, state: &str) -> PreviewError {
    PreviewError::InvalidState(format!("cannot {} while {}", event, state))
}

/// The preview state machine.
///
/// All transitions go through [`apply`](Self::apply). A rejected event
/// leaves the state as it was.
#[derive(Debug, Default)]
pub struct PreviewEngine {
    state: PreviewState,
    token: u64,
    config: PreviewConfig,
    registry: HandleRegistry,
}

impl PreviewEngine {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Use an existing registry, e.g. to observe handle counts.
    pub fn with_registry(mut self, registry: HandleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn document(&self) -> Option<&PreviewDocument> {
        self.state.document()
    }

    /// Token of the most recent `Open`.
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn apply(&mut self, event: PreviewEvent) -> Result<Outcome> {
        let state = mem::take(&mut self.state);
        let from = state.name();
        let event_name = event.name();

        let (state, result) = self.transition(state, event);
        log::debug!("{}: {} -> {}", event_name, from, state.name());
        self.state = state;

        if let Err(e) = &result {
            log::debug!("{} rejected: {}", event_name, e);
        }
        result
    }

    fn transition(
        &mut self,
        state: PreviewState,
        event: PreviewEvent,
    ) -> (PreviewState, Result<Outcome>) {
        use PreviewEvent as E;
        use PreviewState as S;

        match (state, event) {
            // Whatever was shown is dropped here
            (_, E::Open { name }) => {
                self.token += 1;
                let token = self.token;
                log::info!("loading {} (request {})", name, token);
                (S::Loading { token, name }, Ok(Outcome::Loading { token }))
            }
            (_, E::Close) => (S::Idle, Ok(Outcome::Applied)),

            (S::Loading { token, name }, E::Decoded { token: t, outcome }) if t == token => {
                match outcome {
                    Ok(doc) => {
                        log::info!("{}: {} page(s) of {}", name, doc.page_count(), doc.kind);
                        (S::Ready(doc), Ok(Outcome::Applied))
                    }
                    Err(e) => {
                        let message = format!("Unable to preview {}: {}", name, e);
                        log::warn!("{}", message);
                        (S::Error { message }, Ok(Outcome::Applied))
                    }
                }
            }
            (state, E::Decoded { token, .. }) => {
                log::warn!(
                    "discarding result of request {} (current {})",
                    token,
                    self.token
                );
                (state, Ok(Outcome::Discarded))
            }

            (mut state, E::Resize(viewport)) => {
                self.config.viewport = viewport;
                if let S::Ready(doc) | S::Editing(doc) | S::Saving(doc) = &mut state {
                    doc.refit(viewport);
                }
                (state, Ok(Outcome::Applied))
            }

            (
                mut state,
                event @ (E::Navigate(_) | E::SetZoom(_) | E::ZoomIn | E::ZoomOut | E::ResetZoom),
            ) => {
                let result = match &mut state {
                    S::Ready(doc) | S::Editing(doc) => self.view(doc, event),
                    other => Err(invalid(event.name(), other.name())),
                };
                (state, result)
            }

            (S::Ready(mut doc), E::BeginEdit) => {
                if !doc.editable {
                    let err =
                        PreviewError::UnsupportedOperation(format!("editing {} files", doc.kind));
                    return (S::Ready(doc), Err(err));
                }
                extract_pdf_text(&mut doc, &self.config);
                (S::Editing(doc), Ok(Outcome::Applied))
            }
            (S::Editing(doc), E::EndEdit) => (S::Ready(doc), Ok(Outcome::Applied)),
            (S::Editing(mut doc), E::EditPage { index, edit }) => {
                let result = doc.edit_page(index, edit).map(|_| Outcome::Applied);
                (S::Editing(doc), result)
            }

            (S::Ready(doc), E::Save) => self.encode(doc, S::Ready),
            (S::Editing(doc), E::Save) => self.encode(doc, S::Editing),
            (S::Saving(mut doc), E::SaveFinished(result)) => match result {
                Ok(()) => {
                    doc.commit_edits();
                    log::info!("saved {}", doc.file.name);
                    (S::Ready(doc), Ok(Outcome::Applied))
                }
                Err(e) => {
                    let message = format!("Unable to save {}: {}", doc.file.name, e);
                    log::warn!("{}", message);
                    doc.warnings.push(message);
                    (S::Ready(doc), Err(e))
                }
            },

            (state, event) => {
                let err = invalid(event.name(), state.name());
                (state, Err(err))
            }
        }
    }

    /// Page and zoom changes on a shown document.
    fn view(&self, doc: &mut PreviewDocument, event: PreviewEvent) -> Result<Outcome> {
        match event {
            PreviewEvent::Navigate(index) => doc.navigate(index, self.config.viewport),
            PreviewEvent::SetZoom(zoom) => doc.set_zoom(zoom)?,
            PreviewEvent::ZoomIn => doc.set_zoom(doc.effective_zoom() + ZOOM_STEP)?,
            PreviewEvent::ZoomOut => doc.set_zoom(doc.effective_zoom() - ZOOM_STEP)?,
            PreviewEvent::ResetZoom => doc.reset_zoom(),
            other => return Err(invalid(other.name(), "viewing")),
        }
        Ok(Outcome::Applied)
    }

    /// Re-encode `doc`. Only pdf has a writer; other kinds go back to
    /// `restore` untouched.
    fn encode(
        &self,
        mut doc: PreviewDocument,
        restore: fn(PreviewDocument) -> PreviewState,
    ) -> (PreviewState, Result<Outcome>) {
        if doc.kind != FileKind::Pdf {
            let err = PreviewError::UnsupportedOperation(format!("saving {} files", doc.kind));
            return (restore(doc), Err(err));
        }

        extract_pdf_text(&mut doc, &self.config);
        let bytes = create_pdf(&doc.pdf_texts());
        let file_name = Path::new(&doc.file.name)
            .with_extension("pdf")
            .to_string_lossy()
            .into_owned();
        log::info!("encoded {} ({} bytes)", file_name, bytes.len());

        let job = SaveJob {
            file_name,
            content_type: PDF_CONTENT_TYPE,
            bytes,
        };
        (PreviewState::Saving(doc), Ok(Outcome::Save(job)))
    }

    /// Start loading `name`; returns the token its decode result must carry.
    pub fn open(&mut self, name: impl Into<String>) -> u64 {
        // Accepted in every state
        let _ = self.apply(PreviewEvent::Open { name: name.into() });
        self.token
    }

    pub fn complete(&mut self, token: u64, outcome: Result<PreviewDocument>) -> Result<Outcome> {
        self.apply(PreviewEvent::Decoded { token, outcome })
    }

    pub fn navigate(&mut self, index: isize) -> Result<Outcome> {
        self.apply(PreviewEvent::Navigate(index))
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<Outcome> {
        self.apply(PreviewEvent::SetZoom(zoom))
    }

    pub fn zoom_in(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::ZoomIn)
    }

    pub fn zoom_out(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::ZoomOut)
    }

    pub fn reset_zoom(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::ResetZoom)
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<Outcome> {
        self.apply(PreviewEvent::Resize(viewport))
    }

    pub fn begin_edit(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::BeginEdit)
    }

    pub fn end_edit(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::EndEdit)
    }

    pub fn edit_page(&mut self, index: usize, edit: PageEdit) -> Result<Outcome> {
        self.apply(PreviewEvent::EditPage { index, edit })
    }

    /// Re-encode the document and move to `Saving`.
    ///
    /// # Errors
    ///
    /// [`PreviewError::UnsupportedOperation`] for kinds without a writer
    /// (everything but pdf), [`PreviewError::InvalidState`] when no document
    /// is shown.
    pub fn save(&mut self) -> Result<SaveJob> {
        match self.apply(PreviewEvent::Save)? {
            Outcome::Save(job) => Ok(job),
            other => Err(PreviewError::InvalidState(format!(
                "save produced {:?}",
                other
            ))),
        }
    }

    pub fn finish_save(&mut self, result: Result<()>) -> Result<Outcome> {
        self.apply(PreviewEvent::SaveFinished(result))
    }

    pub fn close(&mut self) -> Result<Outcome> {
        self.apply(PreviewEvent::Close)
    }
}
