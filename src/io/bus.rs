use std::sync::mpsc;

use crate::model::agenda::AgendaView;
use crate::model::todo::TodoItem;

/// Messages between the host's producers (file scans, commands) and the
/// views that render agendas.
#[derive(Debug, Clone, PartialEq)]
pub enum AgendaEvent {
    /// Show an agenda, with the host's default view when `None`
    OpenAgenda(Option<AgendaView>),
    SetView(AgendaView),
    /// The complete todo list of one file after a re-scan
    ReplaceTodos { file: String, todos: Vec<TodoItem> },
}

/// A fan-out channel: every subscriber receives every published event.
#[derive(Debug, Default)]
pub struct AgendaBus {
    subscribers: Vec<mpsc::Sender<AgendaEvent>>,
}

impl AgendaBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<AgendaEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber. Subscribers whose receiver
    /// was dropped are removed.
    pub fn publish(&mut self, event: AgendaEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            log::debug!("bus: dropped {} disconnected subscribers", dropped);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
