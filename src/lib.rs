use {
    crate::{
        config::TellerServerConfig,
        http_server::{SharedLedger, start_http_service},
        ledger::Ledger,
        logging::init_logging,
    },
    std::sync::Arc,
    tokio::signal::ctrl_c,
    tracing::{error, info},
};

pub mod config;
pub mod http_server;
pub mod ledger;
pub mod logging;
mod macros;
pub mod metrics;
pub mod models;

pub struct Teller {
    pub config: TellerServerConfig,
    ledger: Arc<Ledger>,
}

impl Teller {
    pub fn new(config: TellerServerConfig) -> Self {
        Teller {
            config,
            ledger: Arc::new(Ledger::new()),
        }
    }

    pub async fn run(&self) -> Result<(), String> {
        let (shutdown_sender, _) = tokio::sync::broadcast::channel::<()>(1);
        let mut services = tokio::task::JoinSet::new();
        init_logging(self.config.debug).map_err(|e| e.to_string())?;

        info!("Starting with an empty ledger");

        {
            let ledger: SharedLedger = self.ledger.clone();
            let http_config = self.config.http.clone();
            let shutdown_receiver = shutdown_sender.subscribe();
            services.spawn(async move {
                start_http_service(http_config, ledger, shutdown_receiver).await
            });
        }

        tokio::select! {
            _ = ctrl_c() => {
                shutdown_sender.send(()).map_err(|e| e.to_string())?;
                info!("Shutdown signal received, stopping services...");

                // Let the HTTP server drain in-flight requests.
                while services.join_next().await.is_some() {}
            }
            Some(res) = services.join_next() => {
                error!("Error in task: {:?}", res);
            }
        }

        Ok(())
    }
}
