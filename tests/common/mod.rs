use caption_relay::config::{HttpConfig, RelayConfig};
use caption_relay::services::providers::mock::MockCaptionProvider;
use caption_relay::startup::Application;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockCaptionProvider>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_provider(Arc::new(MockCaptionProvider::new("A scripted caption."))).await
    }

    pub async fn spawn_with_provider(provider: Arc<MockCaptionProvider>) -> Self {
        Self::spawn_with_config(test_config(), provider).await
    }

    pub async fn spawn_with_config(
        config: RelayConfig,
        provider: Arc<MockCaptionProvider>,
    ) -> Self {
        let app = Application::build_with_provider(config, provider.clone())
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped(std::future::pending()).await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, provider }
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/gemini", self.address)
    }
}

pub fn test_config() -> RelayConfig {
    RelayConfig {
        http: HttpConfig { port: 0 }, // Random port for testing
        gemini_api_key: "test-api-key".to_string(),
        static_dir: format!("target/test-static-{}", Uuid::new_v4()),
    }
}
