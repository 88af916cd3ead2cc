use super::StoreState;
use crate::client::ApiClient;
use std::sync::Arc;
use tigger_models::DashboardSummary;
use tokio::sync::RwLock;

pub struct DashboardStore {
    client: Arc<ApiClient>,
    state: RwLock<StoreState<Option<DashboardSummary>>>,
}

impl DashboardStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Option<DashboardSummary>> {
        self.state.read().await.clone()
    }

    pub async fn init(&self) {
        if self.state.read().await.initialized {
            return;
        }
        self.refresh().await;
    }

    pub async fn refresh(&self) {
        self.state.write().await.start();
        let result = self.client.dashboard().await.map(Some);
        self.state.write().await.settle(result);
    }
}
