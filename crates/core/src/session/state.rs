use std::mem;

use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::{SessionSnapshot, SessionStrings};
use crate::answer_client::AnswerClient;
use crate::error::StreamError;
use crate::transcript::{MessageId, Transcript};
use crate::validation::validate;

#[derive(Debug)]
pub enum Command {
    SetDraft(String),
    // Carries a sender for the answer, so that a submission accepted by
    // a handle is still answered after that handle is dropped.
    Submit(mpsc::UnboundedSender<Command>),
    AppendChunk {
        id: MessageId,
        chunk: String,
    },
    StreamFinished {
        id: MessageId,
        result: Result<(), StreamError>,
    },
}

/// The write capability handed to a streaming answer. It can append to
/// its own placeholder and nothing else.
struct AssistantWriter {
    id: MessageId,
    commands: mpsc::UnboundedSender<Command>,
}

impl AssistantWriter {
    #[inline]
    fn append(&self, chunk: String) {
        self.commands
            .send(Command::AppendChunk { id: self.id, chunk })
            .ok();
    }
}

pub struct SessionState {
    client: AnswerClient,
    strings: SessionStrings,
    transcript: Transcript,
    draft: String,
    is_streaming: bool,
    error: Option<String>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    on_chunk: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl SessionState {
    pub fn new(
        client: AnswerClient,
        strings: SessionStrings,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        on_idle: Option<Box<dyn Fn() + Send + Sync>>,
        on_chunk: Option<Box<dyn Fn(&str) + Send + Sync>>,
    ) -> Self {
        Self {
            client,
            strings,
            transcript: Transcript::default(),
            draft: String::new(),
            is_streaming: false,
            error: None,
            snapshot_tx,
            on_idle,
            on_chunk,
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SetDraft(draft) => {
                self.draft = draft;
                self.error = None;
                self.publish();
            }
            Command::Submit(commands) => self.submit(commands),
            Command::AppendChunk { id, chunk } => self.apply_chunk(id, chunk),
            Command::StreamFinished { id, result } => {
                self.finish_stream(id, result)
            }
        }
    }

    fn submit(&mut self, commands: mpsc::UnboundedSender<Command>) {
        if self.is_streaming {
            debug!("an answer is still streaming, ignore the submission");
            return;
        }

        if let Err(err) = validate(&self.draft) {
            debug!("refused the draft: {err}");
            self.error = Some(self.strings.too_short.clone());
            self.publish();
            self.notify_idle();
            return;
        }

        self.error = None;
        let question = mem::take(&mut self.draft);
        self.transcript.append_user(question.clone());
        let id = self.transcript.append_assistant_placeholder();
        self.is_streaming = true;
        self.publish();

        let client = self.client.clone();
        let writer = AssistantWriter {
            id,
            commands: commands.clone(),
        };
        tokio::spawn(
            async move {
                let result = client
                    .consume(question, move |chunk| writer.append(chunk))
                    .await;
                commands.send(Command::StreamFinished { id, result }).ok();
            }
            .instrument(trace_span!("answer", id = id.index())),
        );
    }

    fn apply_chunk(&mut self, id: MessageId, chunk: String) {
        if let Err(err) = self.transcript.append_to_assistant(id, &chunk) {
            error!("cannot apply a chunk: {err}");
            return;
        }
        self.publish();
        if let Some(on_chunk) = &self.on_chunk {
            on_chunk(&chunk);
        }
    }

    fn finish_stream(&mut self, id: MessageId, result: Result<(), StreamError>) {
        self.is_streaming = false;
        match result {
            Ok(()) => {
                debug!("answer {} completed", id.index());
            }
            Err(err @ StreamError::Rejected { .. }) => {
                warn!("answer {} was rejected: {err}", id.index());
                self.error = Some(err.to_string());
            }
            Err(err @ StreamError::Transport(_)) => {
                error!("answer {} failed: {err}", id.index());
                self.error = Some(self.strings.transport_failure.clone());
            }
        }
        self.publish();
        self.notify_idle();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            transcript: self.transcript.snapshot(),
            draft: self.draft.clone(),
            is_streaming: self.is_streaming,
            error: self.error.clone(),
        });
    }

    #[inline]
    fn notify_idle(&self) {
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

pub async fn run_session(
    mut state: SessionState,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(command) = commands.recv().await {
        trace!("received command: {command:?}");
        state.handle(command);
    }
    debug!("will terminate");
}
