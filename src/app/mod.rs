use std::{net::SocketAddr, sync::Arc, time::Duration};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, StoreKind, WaitlistConfig},
    database::DbManager,
    model::{InMemoryWaitlistStore, PgWaitlistStore, WaitlistStore},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Sets up the configured store and binds the listener.
    /// For Postgres this connects and runs the migrations first.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn WaitlistStore> = match config.waitlist_config.store {
            StoreKind::Postgres => {
                let dm = DbManager::init(config).await?;
                Arc::new(PgWaitlistStore::new(dm))
            }
            StoreKind::Memory => {
                info!("{:<20} - entries are not persisted", "In-memory store:");
                Arc::new(InMemoryWaitlistStore::new())
            }
        };
        let app_state = AppState::new(store, &config.waitlist_config);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

pub struct InternalState {
    pub store: Arc<dyn WaitlistStore>,
    pub display_offset: i64,
    pub store_timeout: Duration,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(store: Arc<dyn WaitlistStore>, waitlist_config: &WaitlistConfig) -> Self {
        AppState(Arc::new(InternalState {
            store,
            display_offset: waitlist_config.display_offset,
            store_timeout: waitlist_config.store_timeout(),
        }))
    }
}
