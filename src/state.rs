use std::sync::Arc;

use crate::cards::PaymentGateway;
use crate::checkout::CheckoutService;
use crate::config::AppConfig;
use crate::render::TemplateCache;
use crate::store::SaleStore;

/// Shared per-process dependencies, built once in `main` and injected into
/// every handler. Lifecycle is owned by the process entry point; nothing in
/// here is ambient global state.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn SaleStore>,
    pub checkout: CheckoutService,
    pub templates: TemplateCache,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn SaleStore>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        let templates =
            TemplateCache::new(&config.server.template_dir, config.cache_templates());
        let checkout = CheckoutService::new(
            payments,
            Arc::clone(&store),
            config.checkout.dedupe_customers,
        );
        Self {
            config,
            store,
            checkout,
            templates,
        }
    }
}
