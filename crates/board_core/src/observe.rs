/// Read-only change notifications for a state container.
pub struct Listeners<S> {
    listeners: Vec<Box<dyn FnMut(&S)>>,
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<S> Listeners<S> {
    pub fn add<F>(&mut self, listener: F)
    where
        F: FnMut(&S) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&mut self, state: &S) {
        for listener in &mut self.listeners {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
