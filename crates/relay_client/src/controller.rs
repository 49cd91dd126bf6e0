use std::collections::HashMap;
use std::sync::Arc;

use chat_core::Message;
use chat_state::{AssistantEvent, AssistantMachine, Effect, GenerationId};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use transcript_store::{load_library, LibraryProvider};

use crate::gateway::{CompletionGateway, ReplyEvent};

/// Drives an [`AssistantMachine`] and performs the effects it asks for.
///
/// Reply streams run on spawned tasks and report back through a channel, so
/// every state change still happens on the task that owns the controller.
pub struct AssistantController<G: CompletionGateway + 'static> {
    machine: AssistantMachine,
    gateway: Arc<G>,
    events_tx: mpsc::UnboundedSender<AssistantEvent>,
    events_rx: mpsc::UnboundedReceiver<AssistantEvent>,
    in_flight: HashMap<GenerationId, CancellationToken>,
}

impl<G: CompletionGateway + 'static> AssistantController<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_gateway(Arc::new(gateway))
    }

    pub fn with_gateway(gateway: Arc<G>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            machine: AssistantMachine::new(),
            gateway,
            events_tx,
            events_rx,
            in_flight: HashMap::new(),
        }
    }

    pub fn machine(&self) -> &AssistantMachine {
        &self.machine
    }

    /// Generations whose reply task has not reported a terminal event yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Load transcripts and prompts. A list that failed to load stays empty.
    pub async fn load_library(&mut self, provider: &dyn LibraryProvider) {
        let library = load_library(provider).await;
        self.dispatch(AssistantEvent::LibraryLoaded {
            transcripts: library.transcripts,
            prompts: library.prompts,
        });
        if let Some(error) = library.error {
            self.dispatch(AssistantEvent::LibraryLoadFailed { error });
        }
    }

    pub fn select_transcript(&mut self, id: impl Into<String>) {
        self.dispatch(AssistantEvent::TranscriptSelected { id: id.into() });
    }

    pub fn click_prompt(&mut self, label: impl Into<String>) {
        self.dispatch(AssistantEvent::PromptClicked {
            label: label.into(),
        });
    }

    pub fn select_conversation(&mut self, id: impl Into<String>) {
        self.dispatch(AssistantEvent::ConversationSelected { id: id.into() });
    }

    /// Run one event through the reducer and carry out its effects.
    pub fn dispatch(&mut self, event: AssistantEvent) {
        if let AssistantEvent::ReplyFinished { generation }
        | AssistantEvent::ReplyFailed { generation, .. } = &event
        {
            self.in_flight.remove(generation);
        }

        for effect in self.machine.handle_event(event) {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Submit {
                generation,
                messages,
            } => {
                let token = CancellationToken::new();
                self.in_flight.insert(generation, token.clone());
                tokio::spawn(stream_generation(
                    Arc::clone(&self.gateway),
                    generation,
                    messages,
                    token,
                    self.events_tx.clone(),
                ));
            }
            Effect::Cancel { generation } => {
                if let Some(token) = self.in_flight.remove(&generation) {
                    tracing::info!(%generation, "Cancelling generation");
                    token.cancel();
                }
            }
        }
    }

    /// Wait for the next reply event and dispatch it. `false` once no task can send any more.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Dispatch reply events until the current generation is no longer loading.
    pub async fn run_until_idle(&mut self) {
        while self.machine.state().is_loading() {
            if !self.process_next().await {
                break;
            }
        }
    }
}

impl<G: CompletionGateway + 'static> Drop for AssistantController<G> {
    fn drop(&mut self) {
        for token in self.in_flight.values() {
            token.cancel();
        }
    }
}

async fn stream_generation<G: CompletionGateway + ?Sized>(
    gateway: Arc<G>,
    generation: GenerationId,
    messages: Vec<Message>,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<AssistantEvent>,
) {
    let send = |event: AssistantEvent| {
        // The controller may already be gone.
        let _ = events.send(event);
    };

    let mut stream = match gateway.stream_reply(&messages, cancel.clone()).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(%generation, error = %e, "Chat request failed");
            send(AssistantEvent::ReplyFailed {
                generation,
                error: e.to_string(),
            });
            return;
        }
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(ReplyEvent::Started { message_id }) => send(AssistantEvent::ReplyStarted {
                generation,
                message_id,
            }),
            Ok(ReplyEvent::Delta(delta)) => send(AssistantEvent::ReplyDelta { generation, delta }),
            Ok(ReplyEvent::Finished) => {
                send(AssistantEvent::ReplyFinished { generation });
                return;
            }
            Err(e) => {
                tracing::error!(%generation, error = %e, "Reply stream failed");
                send(AssistantEvent::ReplyFailed {
                    generation,
                    error: e.to_string(),
                });
                return;
            }
        }
    }

    if cancel.is_cancelled() {
        tracing::debug!(%generation, "Reply stream cancelled");
    } else {
        // Stream closed without a finish chunk; keep what arrived.
        send(AssistantEvent::ReplyFinished { generation });
    }
}
