use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal input forwarded to the main loop. The loop is otherwise woken
/// only by background completions, so there is no tick.
#[derive(Clone, Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// The input stream reported an error
    Error(String),
}

/// Reads crossterm events on a background task until shut down
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut stream = EventStream::new();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,

                    maybe_event = stream.next() => match maybe_event {
                        // Only presses; release events arrive on Windows
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            if sender.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Some(Ok(CrosstermEvent::Resize(w, h))) => {
                            if sender.send(Event::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = sender.send(Event::Error(e.to_string()));
                        }
                        None => break,
                    },
                }
            }
        });

        Self { receiver, cancel }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Stop the reader task
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
