//! Built-in Home provider.
//!
//! `HOME` resolves to this provider's `Root` page: a welcome card, followed
//! by a guidance card while no provider other than the built-in ones has been
//! registered.

use crate::content::MarkdownCard;
use crate::provider::{Provider, ROOT_PAGE};
use crate::registry::ProviderRegistry;
use std::cell::RefCell;
use std::rc::Weak;

pub const CORE_SHELL_ID: &str = "CoreShell";

pub const CORE_SHELL_TITLE: &str = "Core";

/// Providers registered by the shell itself.
pub const BUILTIN_PROVIDER_COUNT: usize = 1;

const WELCOME: &str = "# Settings\n\n\
Welcome to the unified settings window.\n\n\
- The navigation pane lists every registered provider.\n\
- The breadcrumb bar shows where you are and takes you back up.\n\
- Providers can be registered at runtime through the shell API.\n";

const NO_PROVIDERS: &str = "### Nothing here yet\n\
No settings provider has been registered.\n\n\
Register one with `SettingsShell::register_provider` and it will show up in \
the navigation pane.\n";

/// Builds the Home provider.
///
/// The registry is held weakly: the provider lives inside the registry it
/// inspects.
pub fn core_shell_provider(registry: Weak<RefCell<ProviderRegistry>>) -> Provider {
    Provider::builder(CORE_SHELL_ID, CORE_SHELL_TITLE)
        .nav_item(ROOT_PAGE, "Home")
        .page_models(move |page| {
            if page != ROOT_PAGE {
                return Ok(None);
            }

            let mut cards = vec![MarkdownCard::new("home.welcome", "Home", WELCOME).into_ref()];

            let registered = match registry.upgrade() {
                Some(registry) => registry.borrow().len(),
                None => 0,
            };
            if registered <= BUILTIN_PROVIDER_COUNT {
                cards.push(MarkdownCard::new("home.empty", "No Providers", NO_PROVIDERS).into_ref());
            }

            Ok(Some(cards))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::registry::ProviderRegistry;
    use crate::test_utils::ids;
    use std::rc::Rc;

    fn root_ids(provider: &Provider) -> Vec<String> {
        let models = provider
            .build_page_models(ROOT_PAGE)
            .unwrap()
            .unwrap()
            .unwrap();
        ids(&models)
    }

    #[test]
    fn guidance_card_disappears_once_a_provider_is_registered() {
        let registry = ProviderRegistry::shared();
        let core = Rc::new(core_shell_provider(Rc::downgrade(&registry)));
        registry.borrow_mut().register(Rc::clone(&core), true);

        assert_eq!(root_ids(&core), vec!["home.welcome", "home.empty"]);

        registry.borrow_mut().register(Provider::new("Docs", "Docs"), true);
        assert_eq!(root_ids(&core), vec!["home.welcome"]);
    }

    #[test]
    fn other_pages_are_empty() {
        let registry = ProviderRegistry::shared();
        let core = core_shell_provider(Rc::downgrade(&registry));

        assert!(core.build_page_models("About").unwrap().unwrap().is_none());
    }
}
