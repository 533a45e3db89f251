use std::rc::Rc;

use tokio::sync::mpsc;

use crate::inpaint::{InpaintBackend, SubmissionRequest};
use crate::session::{EditMsg, EditSession, handle_edit_msg};

/// Capacity of the message queue feeding the session
const CHANNEL_CAPACITY: usize = 32;

/// Owns the edit session and runs submissions against a backend
///
/// Every state change goes through [`App::update`]. Submissions run as local
/// tasks and report back through the app's own channel, so the session only
/// ever has one writer. Must be driven from inside a `tokio::task::LocalSet`.
pub struct App<B: InpaintBackend + 'static> {
    session: EditSession,
    backend: Rc<B>,
    tx: mpsc::Sender<EditMsg>,
    rx: mpsc::Receiver<EditMsg>,
}

impl<B: InpaintBackend + 'static> App<B> {
    pub fn new(session: EditSession, backend: B) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            session,
            backend: Rc::new(backend),
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Apply a message, dispatching a submission if it started one
    pub fn update(&mut self, msg: EditMsg) {
        if let Some(request) = handle_edit_msg(&mut self.session, msg) {
            self.dispatch(request);
        }
    }

    fn dispatch(&self, request: SubmissionRequest) {
        let backend = Rc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            let outcome = backend.inpaint(request).await;
            if tx.send(EditMsg::SubmissionResolved(outcome)).await.is_err() {
                log::warn!("Session closed before the submission resolved");
            }
        });
    }

    /// Wait for the next queued message and apply it
    pub async fn process_next(&mut self) {
        // The app holds a sender, so the channel never closes underneath it
        if let Some(msg) = self.rx.recv().await {
            self.update(msg);
        }
    }

    /// Apply queued messages until no submission is in flight
    pub async fn run_until_settled(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.update(msg);
        }
        while self.session.is_submitting() {
            self.process_next().await;
        }
    }
}
