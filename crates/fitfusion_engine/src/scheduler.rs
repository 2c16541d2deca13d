use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fit_logging::{fit_debug, fit_warn};
use fitfusion_core::{ExchangeId, Responder};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ReplyDelay;
use crate::{EngineEvent, EventSink};

/// Delivers canned replies after the typing delay.
///
/// Each pending reply holds a child of the scheduler's root token, so a single
/// `shutdown` stops everything still in flight.
pub struct ReplyScheduler {
    responder: Arc<Responder>,
    delay: ReplyDelay,
    root: CancellationToken,
    pending: Arc<Mutex<Pending>>,
}

/// Live tokens by exchange. The ticket tells a finished task whether the
/// entry is still its own or belongs to a later reschedule.
#[derive(Default)]
struct Pending {
    next_ticket: u64,
    tokens: HashMap<ExchangeId, (u64, CancellationToken)>,
}

impl ReplyScheduler {
    pub fn new(responder: Responder, delay: ReplyDelay) -> Self {
        Self {
            responder: Arc::new(responder),
            delay,
            root: CancellationToken::new(),
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(
        &self,
        exchange: ExchangeId,
        prompt: String,
        sink: Arc<dyn EventSink>,
    ) -> JoinHandle<()> {
        let token = self.root.child_token();
        let mut ticket = 0;
        if let Ok(mut pending) = self.pending.lock() {
            pending.next_ticket += 1;
            ticket = pending.next_ticket;
            if let Some((_, previous)) = pending.tokens.insert(exchange, (ticket, token.clone())) {
                fit_warn!("Exchange {} scheduled twice; dropping the first", exchange);
                previous.cancel();
            }
        }

        let delay = self.delay.sample(&mut rand::thread_rng());
        let responder = Arc::clone(&self.responder);
        let pending = Arc::clone(&self.pending);
        fit_debug!("Reply for exchange {} due in {:?}", exchange, delay);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    fit_debug!("Reply for exchange {} cancelled", exchange);
                }
                _ = tokio::time::sleep(delay) => {
                    let reply = responder.respond(&prompt, &mut rand::thread_rng()).to_string();
                    sink.emit(EngineEvent::ReplyReady { exchange, reply });
                }
            }
            if let Ok(mut pending) = pending.lock() {
                if pending.tokens.get(&exchange).is_some_and(|(owner, _)| *owner == ticket) {
                    pending.tokens.remove(&exchange);
                }
            }
        })
    }

    /// Returns whether a reply was still pending.
    pub fn cancel(&self, exchange: ExchangeId) -> bool {
        let token = match self.pending.lock() {
            Ok(mut pending) => pending.tokens.remove(&exchange).map(|(_, token)| token),
            Err(_) => None,
        };
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .map(|pending| pending.tokens.len())
            .unwrap_or(0)
    }

    pub fn shutdown(&self) {
        self.root.cancel();
    }
}
