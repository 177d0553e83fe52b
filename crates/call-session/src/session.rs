use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use ems_transcript::{KeywordSet, Speaker, TranscriptAnnotator, TranscriptFrame};

use crate::config::SessionParams;
use crate::error::{Error, Result};
use crate::events::SessionEvent;
use crate::responder::ReplySelector;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 64;

fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("session", session_id = %session_id)
}

enum SessionCommand {
    Fragment {
        speaker: Speaker,
        text: String,
        is_final: bool,
    },
    SetListening(bool),
    SpeechUnavailable {
        reason: String,
    },
    Snapshot {
        reply: tokio::sync::oneshot::Sender<TranscriptFrame>,
    },
    End,
}

/// Cloneable command surface of a running session. Every method returns
/// [`Error::SessionClosed`] once the session has ended.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: tokio::sync::mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Feed one speech fragment. Dropped (with a warning) while the session
    /// is not listening; whitespace is always a silent no-op.
    pub async fn ingest(
        &self,
        speaker: Speaker,
        text: impl Into<String>,
        is_final: bool,
    ) -> Result<()> {
        self.send(SessionCommand::Fragment {
            speaker,
            text: text.into(),
            is_final,
        })
        .await
    }

    /// Moves the session between idle and listening, driven by the speech
    /// source. Repeated calls with the same value emit nothing.
    pub async fn set_listening(&self, listening: bool) -> Result<()> {
        self.send(SessionCommand::SetListening(listening)).await
    }

    /// Surface an unrecoverable speech-source failure (missing device,
    /// denied permission). Forces Idle; the transcript is untouched.
    pub async fn report_speech_unavailable(&self, reason: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::SpeechUnavailable {
            reason: reason.into(),
        })
        .await
    }

    /// Current log plus transient partial, as one owned frame.
    pub async fn snapshot(&self) -> Result<TranscriptFrame> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.send(SessionCommand::Snapshot { reply: tx }).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    /// Graceful teardown: cancels pending dispatcher replies, emits `Ended`.
    pub async fn end(&self) -> Result<()> {
        self.send(SessionCommand::End).await
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

/// One emergency call: a spawned event loop owning the transcript, plus the
/// event stream consumers read.
///
/// The session is the single mutator of its annotator, so fragment ingestion
/// is serialized by construction no matter how many handles exist. Dropping
/// the session cancels the loop and every pending dispatcher reply.
pub struct CallSession {
    session_id: String,
    handle: SessionHandle,
    inner: ReceiverStream<SessionEvent>,
    cancellation_token: CancellationToken,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl CallSession {
    pub fn spawn(params: SessionParams, selector: impl ReplySelector + 'static) -> Self {
        let (command_tx, command_rx) = tokio::sync::mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(EVENT_BUFFER);
        let (reply_tx, reply_rx) = tokio::sync::mpsc::channel(COMMAND_BUFFER);
        let cancellation_token = CancellationToken::new();

        let session_id = params.session_id.clone();
        let span = session_span(&session_id);
        let (min_delay, max_delay) = params.config.reply_delay_bounds();

        let worker = SessionWorker {
            annotator: TranscriptAnnotator::with_config(
                KeywordSet::new(&params.config.keywords),
                ems_transcript::EpochIdGen::new(),
            ),
            greeting: params.config.greeting,
            responses: params.config.responses,
            min_delay,
            max_delay,
            selector: Box::new(selector),
            listening: false,
            command_rx,
            event_tx,
            reply_tx,
            reply_rx,
            cancellation_token: cancellation_token.clone(),
            next_reply_id: 0,
            pending_replies: HashMap::new(),
        };
        let join = tokio::spawn(worker.run().instrument(span));

        Self {
            session_id,
            handle: SessionHandle { command_tx },
            inner: ReceiverStream::new(event_rx),
            cancellation_token,
            join: Some(join),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Ends the session and waits for the loop to finish. Prefer this over
    /// plain drop when the caller wants the `Ended` event delivered first.
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.handle.end().await;
        if let Some(join) = self.join.take() {
            join.await?;
        }
        Ok(())
    }
}

impl Stream for CallSession {
    type Item = SessionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
        // detach; the loop exits on the cancelled token
        self.join.take();
    }
}

enum LoopAction {
    Continue,
    Break,
}

struct SessionWorker {
    annotator: TranscriptAnnotator,
    greeting: Option<String>,
    responses: Vec<String>,
    min_delay: std::time::Duration,
    max_delay: std::time::Duration,
    selector: Box<dyn ReplySelector>,
    listening: bool,
    command_rx: tokio::sync::mpsc::Receiver<SessionCommand>,
    event_tx: tokio::sync::mpsc::Sender<SessionEvent>,
    reply_tx: tokio::sync::mpsc::Sender<u64>,
    reply_rx: tokio::sync::mpsc::Receiver<u64>,
    cancellation_token: CancellationToken,
    next_reply_id: u64,
    // scheduled but not yet fired, by reply id; drained on teardown
    pending_replies: HashMap<u64, String>,
}

impl SessionWorker {
    async fn run(mut self) {
        if let Some(greeting) = self.greeting.take() {
            self.append_scripted(Speaker::Dispatcher, &greeting).await;
        }
        tracing::info!("session_started");

        loop {
            let action = tokio::select! {
                _ = self.cancellation_token.cancelled() => LoopAction::Break,
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => LoopAction::Break,
                },
                reply_id = self.reply_rx.recv() => match reply_id {
                    Some(id) => self.fire_reply(id).await,
                    None => LoopAction::Continue,
                },
            };
            if matches!(action, LoopAction::Break) {
                break;
            }
        }

        self.finish().await;
    }

    async fn handle_command(&mut self, command: SessionCommand) -> LoopAction {
        match command {
            SessionCommand::Fragment {
                speaker,
                text,
                is_final,
            } => {
                self.handle_fragment(speaker, &text, is_final).await;
                LoopAction::Continue
            }
            SessionCommand::SetListening(listening) => {
                if listening != self.listening {
                    self.listening = listening;
                    tracing::info!(listening, "listening_changed");
                    self.emit(SessionEvent::ListeningChanged { listening }).await;
                }
                LoopAction::Continue
            }
            SessionCommand::SpeechUnavailable { reason } => {
                tracing::warn!(%reason, "speech_unavailable");
                if self.listening {
                    self.listening = false;
                    self.emit(SessionEvent::ListeningChanged { listening: false })
                        .await;
                }
                self.emit(SessionEvent::SpeechUnavailable { reason }).await;
                LoopAction::Continue
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.annotator.frame());
                LoopAction::Continue
            }
            SessionCommand::End => LoopAction::Break,
        }
    }

    async fn handle_fragment(&mut self, speaker: Speaker, text: &str, is_final: bool) {
        if !self.listening {
            tracing::warn!(%speaker, "fragment_dropped_while_idle");
            return;
        }

        let had_partial = self.annotator.partial().is_some();
        let Some(update) = self.annotator.ingest(speaker, text, is_final) else {
            return;
        };

        match update.appended {
            Some(entry) => {
                let from_user = entry.speaker == Speaker::User;
                tracing::info!(
                    %speaker,
                    flagged = entry.contains_emergency_keyword,
                    "entry_added"
                );
                self.emit(SessionEvent::EntryAdded { entry }).await;
                if had_partial {
                    self.emit(SessionEvent::PartialUpdated { partial: None })
                        .await;
                }
                if from_user {
                    self.schedule_reply();
                }
            }
            None => {
                self.emit(SessionEvent::PartialUpdated {
                    partial: update.partial,
                })
                .await;
            }
        }
    }

    /// Picks text and delay now, then lets an independent timer task send the
    /// reply id back to the loop. Timers do not serialize each other; firing
    /// order alone decides append order.
    fn schedule_reply(&mut self) {
        let Some(text) = self.selector.pick_reply(&self.responses) else {
            tracing::debug!("reply_skipped_empty_pool");
            return;
        };
        let delay = self.selector.pick_delay(self.min_delay, self.max_delay);

        let id = self.next_reply_id;
        self.next_reply_id += 1;
        self.pending_replies.insert(id, text);
        tracing::debug!(reply_id = id, delay_ms = delay.as_millis() as u64, "reply_scheduled");

        let token = self.cancellation_token.clone();
        let reply_tx = self.reply_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = reply_tx.send(id).await;
                }
            }
        });
    }

    async fn fire_reply(&mut self, id: u64) -> LoopAction {
        let Some(text) = self.pending_replies.remove(&id) else {
            return LoopAction::Continue;
        };
        tracing::debug!(reply_id = id, "reply_fired");
        self.append_scripted(Speaker::Dispatcher, &text).await;
        LoopAction::Continue
    }

    /// Greeting and simulated replies: appended regardless of listening
    /// state, never scheduling further replies, never touching the partial.
    async fn append_scripted(&mut self, speaker: Speaker, text: &str) {
        if let Some(entry) = self.annotator.append(speaker, text) {
            tracing::info!(
                %speaker,
                flagged = entry.contains_emergency_keyword,
                "entry_added"
            );
            self.emit(SessionEvent::EntryAdded { entry }).await;
        }
    }

    async fn emit(&self, event: SessionEvent) {
        // consumer may have dropped the stream while keeping a handle
        let _ = self.event_tx.send(event).await;
    }

    async fn finish(&mut self) {
        self.cancellation_token.cancel();
        if !self.pending_replies.is_empty() {
            tracing::debug!(count = self.pending_replies.len(), "replies_cancelled");
        }
        self.emit(SessionEvent::Ended {
            frame: self.annotator.frame(),
        })
        .await;
        tracing::info!(entries = self.annotator.entries().len(), "session_ended");
    }
}
