use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::InteractionHandle;
use crate::model::application::Interaction;
use crate::model::id::InteractionId;

/// Owns the handles of the interactions currently being processed.
///
/// A handle lives in the registry from the moment its interaction is received until it is
/// explicitly [released], usually when its dispatch finished, or until [`Self::prune_expired`]
/// finds its token expired.
///
/// [released]: Self::release
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    handles: DashMap<InteractionId, Arc<InteractionHandle>>,
}

impl InteractionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of the interaction, creating it on first sight.
    ///
    /// A second delivery of the same interaction yields the handle created for the first one, so
    /// its response state is shared.
    pub fn register(&self, interaction: Interaction) -> Arc<InteractionHandle> {
        let entry = self
            .handles
            .entry(interaction.id)
            .or_insert_with(|| Arc::new(InteractionHandle::new(interaction)));

        Arc::clone(entry.value())
    }

    #[must_use]
    pub fn get(&self, id: InteractionId) -> Option<Arc<InteractionHandle>> {
        self.handles.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drops the registry's reference to the handle, returning it if it was registered.
    ///
    /// Clones of the handle held elsewhere, like a still running background response, stay
    /// usable.
    pub fn release(&self, id: InteractionId) -> Option<Arc<InteractionHandle>> {
        self.handles.remove(&id).map(|(_, handle)| handle)
    }

    /// Releases every handle whose token can no longer be used, returning how many were released.
    pub fn prune_expired(&self) -> usize {
        let before = self.handles.len();
        self.handles.retain(|_, handle| handle.is_valid());

        let pruned = before.saturating_sub(self.handles.len());
        if pruned > 0 {
            debug!("Pruned {pruned} expired interaction handles");
        }

        pruned
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::interaction::tests::interaction;

    #[tokio::test]
    async fn duplicate_delivery_shares_handle() {
        let registry = InteractionRegistry::new();

        let first = registry.register(interaction(1, 2));
        let second = registry.register(interaction(1, 2));
        let other = registry.register(interaction(2, 2));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn release_removes_handle() {
        let registry = InteractionRegistry::new();
        let handle = registry.register(interaction(1, 2));

        let released = registry.release(handle.id()).unwrap();
        assert!(Arc::ptr_eq(&handle, &released));
        assert!(registry.get(handle.id()).is_none());
        assert!(registry.release(handle.id()).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn prune_drops_expired_handles() {
        let registry = InteractionRegistry::new();
        registry.register(interaction(1, 2));

        assert_eq!(registry.prune_expired(), 0);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(registry.prune_expired(), 1);
        assert!(registry.is_empty());
    }
}
