use crate::error::Result;
use crate::storage::{Store, StoreMut};

/// Handle returned by [`Notifying::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<S> = Box<dyn FnMut(u64, &S) -> Result<()>>;

/// Calls listeners after every successful write.
///
/// Listeners run synchronously on the writing thread, in subscription order, and receive the
/// written index and the wrapped store. The write is committed before the first listener runs;
/// a listener error stops the remaining listeners and is returned from [`StoreMut::set`].
pub struct Notifying<S> {
  inner: S,
  listeners: Vec<(ListenerId, Listener<S>)>,
  next_id: u64,
}

impl<S: Store> Notifying<S> {
  pub fn new(inner: S) -> Self {
    Notifying { inner, listeners: Vec::new(), next_id: 0 }
  }

  pub fn subscribe(&mut self, listener: impl FnMut(u64, &S) -> Result<()> + 'static) -> ListenerId {
    let id = ListenerId(self.next_id);
    self.next_id += 1;
    self.listeners.push((id, Box::new(listener)));
    id
  }

  /// Removes a listener. Returns `false` if it was not subscribed.
  pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(listener, _)| *listener != id);
    self.listeners.len() != before
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.len()
  }

  pub fn inner(&self) -> &S {
    &self.inner
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store> Store for Notifying<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.inner.size()
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    self.inner.get(index)
  }
}

impl<S: StoreMut> StoreMut for Notifying<S> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    self.inner.set(index, value)?;
    for (_, listener) in &mut self.listeners {
      listener(index, &self.inner)?;
    }
    Ok(())
  }
}
