//! Provider registry.
//!
//! The registry maps provider ids to provider instances. Ids are matched
//! case-insensitively and must not contain [`PATH_SEPARATOR`]. One registry is
//! built at startup and shared by the router and the views through a
//! [`SharedRegistry`] handle. It lives until the shell is torn down.
//!
//! # Change notification
//!
//! Listeners added with [`ProviderRegistry::subscribe`] run after every
//! successful register or unregister, in subscription order.
//!
//! Registration is not reentrant: a listener must not register or unregister
//! providers on the registry it is observing. Through a [`SharedRegistry`] that
//! would be a second mutable borrow and panic. Listeners that need to react with
//! a mutation should record the change and apply it after the notifying call
//! has returned.

use crate::provider::{Provider, PATH_SEPARATOR};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Registry handle shared between the router, the views and the host.
pub type SharedRegistry = Rc<RefCell<ProviderRegistry>>;

/// Reason a provider was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("provider id is empty")]
    EmptyId,
    #[error("provider id {0:?} contains the reserved separator ':'")]
    ReservedSeparator(String),
    #[error("provider {0:?} is already registered")]
    Duplicate(String),
}

/// What changed in the registry.
#[derive(Debug, Clone)]
pub enum RegistryChange {
    /// A provider was added. `previous` holds the instance it replaced.
    Registered {
        id: String,
        previous: Option<Rc<Provider>>,
    },
    /// A provider was removed. Observers may need `previous` to detach from it.
    Unregistered { id: String, previous: Rc<Provider> },
}

impl RegistryChange {
    pub fn id(&self) -> &str {
        match self {
            RegistryChange::Registered { id, .. } | RegistryChange::Unregistered { id, .. } => id,
        }
    }
}

type Listener = Box<dyn FnMut(&RegistryChange)>;

/// Mapping from provider id to provider instance.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: IndexMap<String, Rc<Provider>>,
    listeners: Vec<Listener>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        ProviderRegistry::default()
    }

    /// Creates an empty registry behind a shared handle.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(ProviderRegistry::new()))
    }

    /// Registers `provider`, reporting failures as `false`.
    ///
    /// With `replace_existing` an already registered id is replaced, otherwise
    /// the call leaves the registry untouched.
    pub fn register(&mut self, provider: impl Into<Rc<Provider>>, replace_existing: bool) -> bool {
        self.try_register(provider, replace_existing).is_ok()
    }

    /// Registers `provider` and returns the instance it replaced, if any.
    ///
    /// Ids are matched case-insensitively. Listeners are notified after the
    /// provider has been stored.
    ///
    /// # Arguments
    ///
    /// * `provider` - The provider to store under its own id
    /// * `replace_existing` - Whether an already registered id is replaced
    ///
    /// # Returns
    ///
    /// The previously registered instance when one was replaced, `None` for a
    /// new id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The id is empty or whitespace
    /// - The id contains the `:` separator
    /// - The id is taken and `replace_existing` is `false`
    pub fn try_register(
        &mut self,
        provider: impl Into<Rc<Provider>>,
        replace_existing: bool,
    ) -> Result<Option<Rc<Provider>>, RegistryError> {
        let provider = provider.into();
        let id = provider.id().to_string();

        if id.trim().is_empty() {
            tracing::warn!("rejecting provider with an empty id");
            return Err(RegistryError::EmptyId);
        }

        if id.contains(PATH_SEPARATOR) {
            tracing::warn!(provider_id = %id, "rejecting provider id containing the separator");
            return Err(RegistryError::ReservedSeparator(id));
        }

        let key = Self::key(&id);
        if self.providers.contains_key(&key) {
            if !replace_existing {
                tracing::warn!(provider_id = %id, "duplicate provider id, ignoring registration");
                return Err(RegistryError::Duplicate(id));
            }
            tracing::warn!(provider_id = %id, "provider id collision, replacing");
        }

        let previous = self.providers.insert(key, provider);
        tracing::debug!(provider_id = %id, replaced = previous.is_some(), "provider registered");

        self.notify(&RegistryChange::Registered {
            id,
            previous: previous.clone(),
        });

        Ok(previous)
    }

    /// Removes the provider registered under `id`. Returns `false` if unknown.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some((_, previous)) = self.providers.shift_remove_entry(&Self::key(id)) else {
            return false;
        };

        tracing::debug!(provider_id = %previous.id(), "provider unregistered");

        self.notify(&RegistryChange::Unregistered {
            id: previous.id().to_string(),
            previous,
        });

        true
    }

    pub fn get(&self, id: &str) -> Option<Rc<Provider>> {
        self.providers.get(&Self::key(id)).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(&Self::key(id))
    }

    /// All registered providers. Order carries no meaning.
    pub fn all(&self) -> impl Iterator<Item = &Rc<Provider>> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Adds a change listener. See the module documentation on reentrancy.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&RegistryChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: &RegistryChange) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }

    #[inline]
    fn key(id: &str) -> String {
        id.to_lowercase()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(registry: &mut ProviderRegistry) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        registry.subscribe(move |change| {
            let entry = match change {
                RegistryChange::Registered { id, previous } => {
                    format!("+{id}{}", if previous.is_some() { " (replaced)" } else { "" })
                }
                RegistryChange::Unregistered { id, previous } => {
                    format!("-{id} ({})", previous.title())
                }
            };
            sink.borrow_mut().push(entry);
        });
        log
    }

    #[test]
    fn rejects_invalid_ids_without_notifying() {
        let mut registry = ProviderRegistry::new();
        let log = recorder(&mut registry);

        assert_eq!(
            registry.try_register(Provider::new("", "Nameless"), true).unwrap_err(),
            RegistryError::EmptyId
        );
        assert_eq!(
            registry.try_register(Provider::new("   ", "Blank"), true).unwrap_err(),
            RegistryError::EmptyId
        );
        assert_eq!(
            registry.try_register(Provider::new("a:b", "Colon"), true).unwrap_err(),
            RegistryError::ReservedSeparator("a:b".to_string())
        );
        assert!(registry.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.register(Provider::new("Docs", "Docs"), true));

        assert!(registry.contains("docs"));
        assert_eq!(registry.get("DOCS").map(|p| p.title().to_string()), Some("Docs".to_string()));
    }

    #[test]
    fn duplicate_replaces_by_default() {
        let mut registry = ProviderRegistry::new();
        let log = recorder(&mut registry);

        assert!(registry.register(Provider::new("Docs", "Old"), true));
        assert!(registry.register(Provider::new("docs", "New"), true));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Docs").unwrap().title(), "New");
        assert_eq!(*log.borrow(), vec!["+Docs", "+docs (replaced)"]);
    }

    #[test]
    fn duplicate_without_replace_is_a_no_op() {
        let mut registry = ProviderRegistry::new();
        let log = recorder(&mut registry);
        let provider = Rc::new(Provider::new("Docs", "Docs"));

        assert!(registry.register(Rc::clone(&provider), false));
        assert!(!registry.register(Rc::clone(&provider), false));
        assert_eq!(
            registry.try_register(Provider::new("Docs", "Other"), false).unwrap_err(),
            RegistryError::Duplicate("Docs".to_string())
        );

        assert_eq!(registry.len(), 1);
        assert!(Rc::ptr_eq(&registry.get("Docs").unwrap(), &provider));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unregister_reports_previous_instance() {
        let mut registry = ProviderRegistry::new();
        let log = recorder(&mut registry);

        assert!(!registry.unregister("Docs"));
        registry.register(Provider::new("Docs", "Documentation"), true);

        assert!(registry.unregister("DOCS"));
        assert!(registry.get("Docs").is_none());
        assert!(!registry.unregister("Docs"));
        assert_eq!(*log.borrow(), vec!["+Docs", "-Docs (Documentation)"]);
    }
}
