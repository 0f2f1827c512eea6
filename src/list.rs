//! The owner of the bound venue list.
//!
//! [`VenueList`] keeps the list the list UI renders, the descriptor that
//! produced it, and the generation counter that decides which fetch is
//! allowed to replace it. Every fetch, blocking or not, takes a new
//! generation when issued, and a result only replaces the list while its
//! generation is still the latest. The check and the replacement happen
//! under the same lock, so the last issued fetch always wins.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::Result;
use crate::executor::{CallbackContext, FetchHandle, Generation, Generations, QueryExecutor};
use crate::notifier::SelectionReceiver;
use crate::query::QueryDescriptor;
use crate::record::Venue;
use crate::selection::Selection;

/// The rendering side of the list, asked to redraw whenever the list is replaced.
pub trait ListView: Send + Sync {
    fn reload(&self, venues: &[Venue]);
}

pub struct VenueList {
    executor: Arc<QueryExecutor>,
    descriptor: Mutex<QueryDescriptor>,
    venues: Arc<Mutex<Vec<Venue>>>,
    generations: Generations,
    view: Arc<dyn ListView>,
}
impl VenueList {
    pub fn new(executor: Arc<QueryExecutor>, view: Arc<dyn ListView>) -> Self {
        let descriptor = QueryDescriptor::new(executor.entity());
        Self {
            executor,
            descriptor: Mutex::new(descriptor),
            venues: Arc::new(Mutex::new(Vec::new())),
            generations: Generations::new(),
            view,
        }
    }

    /// Fetches the current descriptor in the background. The list is
    /// replaced when the callback runs on `context`, unless the fetch was
    /// cancelled or a newer fetch was issued in the meantime.
    pub fn load_async(&self, context: Arc<dyn CallbackContext>) -> Result<FetchHandle> {
        let descriptor = self.descriptor()?;
        let generation = self.generations.advance();
        let venues = Arc::clone(&self.venues);
        let view = Arc::clone(&self.view);
        let issued = generation.clone();
        self.executor.fetch_async(descriptor, generation, context, move |fetched| {
            replace(&venues, view.as_ref(), &issued, fetched);
        })
    }

    /// Turns a confirmed selection into a new descriptor and re-fetches.
    /// On failure the error is returned, and both the list and the current
    /// descriptor keep their last good content.
    pub fn apply_selection(&self, selection: &Selection) -> Result<usize> {
        let mut descriptor = self.descriptor()?;
        descriptor.apply(selection);
        let generation = self.generations.advance();
        let fetched = self.executor.fetch(&descriptor)?;
        let fetched_len = fetched.len();
        info!(query = %descriptor, rows = fetched_len, "selection applied");
        if replace(&self.venues, self.view.as_ref(), &generation, fetched) {
            *self.descriptor.lock()? = descriptor;
        }
        Ok(fetched_len)
    }

    /// Re-runs the current descriptor.
    pub fn refresh(&self) -> Result<usize> {
        let descriptor = self.descriptor()?;
        self.fetch_and_reload(&descriptor)
    }

    /// Waits for the filter screen to confirm and applies its selection.
    /// Returns `None` when the screen went away without confirming.
    pub fn listen(&self, receiver: SelectionReceiver) -> Result<Option<usize>> {
        match receiver.recv() {
            Some(selection) => self.apply_selection(&selection).map(Some),
            None => {
                debug!("selection screen dismissed without confirming");
                Ok(None)
            }
        }
    }

    pub fn descriptor(&self) -> Result<QueryDescriptor> {
        Ok(self.descriptor.lock()?.clone())
    }
    pub fn venues(&self) -> Vec<Venue> {
        self.venues.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
    /// Name and price tier text of each venue, as the list displays them.
    pub fn rows(&self) -> Vec<(String, &'static str)> {
        self.venues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|venue| (venue.name.clone(), venue.price_tier.symbol()))
            .collect()
    }
    pub fn len(&self) -> usize {
        self.venues.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fetch_and_reload(&self, descriptor: &QueryDescriptor) -> Result<usize> {
        let generation = self.generations.advance();
        let fetched = self.executor.fetch(descriptor)?;
        let fetched_len = fetched.len();
        replace(&self.venues, self.view.as_ref(), &generation, fetched);
        Ok(fetched_len)
    }
}

fn replace(venues: &Mutex<Vec<Venue>>, view: &dyn ListView, generation: &Generation, fetched: Vec<Venue>) -> bool {
    let mut kept = venues.lock().unwrap_or_else(PoisonError::into_inner);
    if !generation.is_current() {
        debug!(generation = generation.token(), "superseded result not applied");
        return false;
    }
    *kept = fetched;
    view.reload(&kept);
    true
}
