//! Async event loop around a [`SearchSession`].
//!
//! The loop waits on three things only: the next input event, the debounce
//! deadline, and completion of in-flight round trips. The session itself is
//! only ever touched from this loop. Once input closes, the loop keeps
//! running until the last debounce has fired and every round trip is back.

use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::{self, JoinSet};

use crate::core::session::{RemoteRequest, SearchSession, Ticket};
use crate::error::{UniError, UniResult};

/// Input to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The raw search box contents changed.
    Input(String),
    /// A category label was clicked.
    SelectCategory(usize),
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

type Outcome = (Ticket, UniResult<Vec<usize>>);

/// Round trips spawned on a `JoinSet`. The ticket of each task is kept by
/// task id so a panicked or cancelled task can still be completed.
struct InFlight {
    tasks: JoinSet<Outcome>,
    tickets: HashMap<task::Id, Ticket>,
}

impl InFlight {
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            tickets: HashMap::new(),
        }
    }

    fn spawn<Fut>(&mut self, ticket: Ticket, pending: Fut)
    where
        Fut: Future<Output = UniResult<Vec<usize>>> + Send + 'static,
    {
        let handle = self.tasks.spawn(async move { (ticket, pending.await) });
        self.tickets.insert(handle.id(), ticket);
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Next finished round trip. A task that did not run to completion is
    /// reported as a failure for its ticket.
    async fn next(&mut self) -> Option<Outcome> {
        match self.tasks.join_next().await? {
            Ok((ticket, outcome)) => {
                self.tickets.retain(|_, t| *t != ticket);
                Some((ticket, outcome))
            }
            Err(e) => {
                tracing::warn!("Search task failed: {}", e);
                let ticket = self.tickets.remove(&e.id())?;
                Some((ticket, Err(UniError::RemoteFailure(e.to_string()))))
            }
        }
    }
}

/// Run `session` until `events` closes and all outstanding work has
/// finished, resolving round trips with `search`. `on_update` is called
/// after every processed event.
pub async fn drive<F, Fut, U>(
    mut session: SearchSession,
    initial: Option<RemoteRequest>,
    mut events: mpsc::Receiver<SessionEvent>,
    search: F,
    mut on_update: U,
) -> SearchSession
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = UniResult<Vec<usize>>> + Send + 'static,
    U: FnMut(&SearchSession),
{
    let mut in_flight = InFlight::new();
    let dispatch = |in_flight: &mut InFlight, request: RemoteRequest| {
        let ticket = request.ticket;
        in_flight.spawn(ticket, search(request.term));
    };

    if let Some(request) = initial {
        dispatch(&mut in_flight, request);
    }
    on_update(&session);

    let mut inputs_open = true;
    loop {
        let deadline = session.next_deadline();
        if !inputs_open && deadline.is_none() && in_flight.is_empty() {
            break;
        }
        let sleep_target = tokio::time::Instant::from_std(deadline.unwrap_or_else(now));

        tokio::select! {
            event = events.recv(), if inputs_open => match event {
                Some(SessionEvent::Input(term)) => session.set_search_term(&term, now()),
                Some(SessionEvent::SelectCategory(index)) => session.select_category(index, now()),
                None => {
                    tracing::debug!("Input closed, draining outstanding searches");
                    inputs_open = false;
                }
            },
            _ = tokio::time::sleep_until(sleep_target), if deadline.is_some() => {
                if let Some(request) = session.tick(now()) {
                    dispatch(&mut in_flight, request);
                }
            }
            Some((ticket, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                session.complete_remote(ticket, outcome);
            }
            else => break,
        }

        on_update(&session);
    }

    session
}
