//! Startup bootstrap
//!
//! Creates the header-only menu table when it is missing and wires the
//! store and completion client into a `ChatRouter`.

use crate::cli::{Error, Result};
use lunchbot_core::config::AppConfig;
use lunchbot_core::llm::create_adapter;
use lunchbot_core::{ChatRouter, CompletionClient, MenuStore};
use std::sync::Arc;
use tracing::info;

/// Bootstrap status result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStatus {
    /// Menu table already existed
    Ready,
    /// A header-only menu table was written
    CreatedMenu,
}

/// Ensure the menu table exists
pub fn ensure_menu_table(store: &MenuStore) -> Result<BootstrapStatus> {
    info!("Menu table path: {}", store.path().display());
    let created = store
        .ensure_exists()
        .map_err(|e| Error::Storage(e.to_string()))?;
    Ok(if created {
        BootstrapStatus::CreatedMenu
    } else {
        BootstrapStatus::Ready
    })
}

/// Build the router from configuration
///
/// A missing API key is not an error; the router then answers free text
/// with a fixed notice.
pub fn build_router(config: &AppConfig) -> Result<ChatRouter> {
    let store = Arc::new(MenuStore::new(config.menu.path.clone()));
    ensure_menu_table(&store)?;

    let client = create_adapter(&config.llm)
        .map_err(|e| Error::Llm(e.to_string()))?
        .map(|adapter| Arc::new(adapter) as Arc<dyn CompletionClient>);

    Ok(ChatRouter::new(store, client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunchbot_core::config::LlmProvider;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_menu_table_creates_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = MenuStore::new(temp_dir.path().join("점심메뉴추천.xlsx"));

        assert_eq!(ensure_menu_table(&store).unwrap(), BootstrapStatus::CreatedMenu);
        assert_eq!(ensure_menu_table(&store).unwrap(), BootstrapStatus::Ready);
    }

    #[test]
    fn test_build_router_with_stub() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.menu.path = temp_dir.path().join("menu.csv");
        config.llm.provider = LlmProvider::Stub;

        let router = build_router(&config).unwrap();
        assert!(router.is_ready());
        assert!(config.menu.path.exists());
    }

    #[test]
    fn test_build_router_without_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.menu.path = temp_dir.path().join("menu.csv");
        config.llm.api_key_env = "LUNCHBOT_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let router = build_router(&config).unwrap();
        assert!(!router.is_ready());
    }
}
