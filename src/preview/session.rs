use tokio::sync::Mutex;

use crate::error::{PreviewError, Result};
use crate::io::{ByteSink, ByteSource};

use super::config::PreviewConfig;
use super::decode::decode_document;
use super::document::{DocumentSummary, FileInfo};
use super::engine::{Outcome, PreviewEngine, PreviewEvent};

/// Where a saved file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub name: String,
    pub content_type: &'static str,
    pub size: usize,
}

/// Async front end for one preview slot.
///
/// Fetching runs without holding the engine lock, so a newer `open` can
/// start while an older one is still downloading; the request token decides
/// which result is shown.
#[derive(Debug, Default)]
pub struct PreviewSession {
    engine: Mutex<PreviewEngine>,
}

impl PreviewSession {
    pub fn new(config: PreviewConfig) -> Self {
        Self::from_engine(PreviewEngine::new(config))
    }

    pub fn from_engine(engine: PreviewEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Fetch and decode a file, then hand the result to the engine.
    ///
    /// Returns [`Outcome::Discarded`] when another `open` started in the
    /// meantime. Fetch and decode failures leave the engine in its error
    /// state rather than failing the call.
    pub async fn open(&self, source: &dyn ByteSource) -> Result<Outcome> {
        let (token, config, registry) = {
            let mut engine = self.engine.lock().await;
            let token = engine.open(source.name());
            (token, engine.config().clone(), engine.registry().clone())
        };

        let outcome = match source.fetch().await {
            Ok(fetched) => {
                // Let other tasks run before the synchronous decode
                tokio::task::yield_now().await;
                let file = FileInfo {
                    name: fetched.name,
                    content_type: fetched.content_type,
                    size: fetched.bytes.len(),
                };
                decode_document(file, fetched.bytes, &config, &registry)
            }
            Err(e) => Err(PreviewError::Source(format!("{:#}", e))),
        };

        self.engine.lock().await.complete(token, outcome)
    }

    /// Re-encode the current document and store it through `sink`.
    ///
    /// # Errors
    ///
    /// Anything [`PreviewEngine::save`] rejects, or the sink's failure as
    /// [`PreviewError::Source`]. Either way the engine ends up `Ready` again
    /// once the sink has been tried.
    pub async fn save_to(&self, sink: &dyn ByteSink) -> Result<SavedFile> {
        let job = self.engine.lock().await.save()?;

        let stored = sink
            .store(&job.file_name, job.content_type, &job.bytes)
            .await
            .map_err(|e| PreviewError::Source(format!("{:#}", e)));
        self.engine
            .lock()
            .await
            .apply(PreviewEvent::SaveFinished(stored))?;

        Ok(SavedFile {
            name: job.file_name,
            content_type: job.content_type,
            size: job.bytes.len(),
        })
    }

    pub async fn apply(&self, event: PreviewEvent) -> Result<Outcome> {
        self.engine.lock().await.apply(event)
    }

    /// Run `f` with exclusive access to the engine.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut PreviewEngine) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }

    pub async fn summary(&self) -> Option<DocumentSummary> {
        self.engine.lock().await.document().map(|doc| doc.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::pdf::create_pdf;

    #[tokio::test]
    async fn test_open_from_memory() {
        let session = PreviewSession::default();
        let source = MemorySource::new("notes.txt", Some("text/plain"), b"hi".to_vec());

        assert_eq!(session.open(&source).await, Ok(Outcome::Applied));
        let summary = session.summary().await.unwrap();
        assert_eq!(summary.file.name, "notes.txt");
        assert_eq!(summary.file.size, 2);
        assert_eq!(summary.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_with_engine() {
        let session = PreviewSession::default();
        let source = MemorySource::new("memo.pdf", None, create_pdf(&["x"]));
        session.open(&source).await.unwrap();

        let state = session
            .with_engine(|engine| {
                engine.begin_edit().unwrap();
                engine.state().name()
            })
            .await;
        assert_eq!(state, "editing");
    }
}
