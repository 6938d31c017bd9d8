use std::sync::Arc;

use query_db::DbHandle;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::MemberSearchConfig;
use crate::contract::client::MemberSearchApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::MemberSearchLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmMembersRepository;

/// Wired member search module: migrated schema, domain service and local client.
#[derive(Clone)]
pub struct MemberSearchModule {
    service: Arc<Service>,
    client: Arc<dyn MemberSearchApi>,
}

impl MemberSearchModule {
    pub async fn init(db: &DbHandle, cfg: MemberSearchConfig) -> anyhow::Result<Self> {
        info!("Initializing member_search module");
        debug!(
            "Loaded member_search config: default_page_size={}, max_page_size={}, count_strategy={:?}",
            cfg.default_page_size, cfg.max_page_size, cfg.count_strategy
        );

        Self::migrate(db).await?;

        let repo = SeaOrmMembersRepository::new(db.sea());
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            count_strategy: cfg.count_strategy,
            ..ServiceConfig::default()
        };
        let service = Arc::new(Service::new(Arc::new(repo), service_config));
        let client: Arc<dyn MemberSearchApi> =
            Arc::new(MemberSearchLocalClient::new(service.clone()));

        Ok(Self { service, client })
    }

    pub async fn migrate(db: &DbHandle) -> anyhow::Result<()> {
        info!("Running member_search database migrations");
        Migrator::up(db.seaorm(), None).await?;
        info!("member_search migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn MemberSearchApi> {
        self.client.clone()
    }
}
