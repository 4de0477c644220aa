use std::sync::Arc;

use crate::accounts::AccountStore;
use crate::catalog::CatalogService;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: CatalogService,
    pub accounts: Arc<dyn AccountStore>,
}
