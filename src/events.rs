/// Collapses the redraw requests made during one tick into a single call.
///
/// Filter changes call `trigger` as often as they like; the owner calls
/// `flush` once per tick (per frame in the GUI), which runs only the most
/// recent callback. Nothing runs when nothing was triggered.
pub struct RedrawCoalescer<C> {
    pending: Option<Box<dyn FnOnce(&mut C)>>,
    triggered: usize,
}

impl<C> RedrawCoalescer<C> {
    pub fn new() -> Self {
        RedrawCoalescer {
            pending: None,
            triggered: 0,
        }
    }

    /// Schedules `callback`, replacing anything scheduled earlier this tick.
    pub fn trigger<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut C) + 'static,
    {
        self.pending = Some(Box::new(callback));
        self.triggered += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs the scheduled callback, if any. Returns whether one ran.
    pub fn flush(&mut self, context: &mut C) -> bool {
        match self.pending.take() {
            Some(callback) => {
                tracing::trace!(coalesced = self.triggered, "flushing redraw");
                self.triggered = 0;
                callback(context);
                true
            }
            None => false,
        }
    }

    /// Drops a scheduled callback without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.triggered = 0;
    }
}

impl<C> Default for RedrawCoalescer<C> {
    fn default() -> Self {
        Self::new()
    }
}
