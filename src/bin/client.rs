//! Load generator for manual and soak testing: a handful of workers firing
//! randomized open/top-up/transfer traffic at a running server.

use {
    clap::Parser,
    rand::{Rng, SeedableRng, seq::IndexedRandom},
    rust_decimal::{Decimal, prelude::ToPrimitive},
    std::{sync::Arc, time::Duration},
    teller::{
        config::TellerClientConfig,
        logging::init_logging,
        models::{Account, AccountId, TopUpInstruction, TransferInstruction},
    },
    tokio::sync::RwLock,
    tracing::{error, info, warn},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = TellerClientConfig::from_file(&args.config)
        .map_err(|e| format!("Failed to load client configuration file: {}", e))?;

    init_logging(config.debug)?;

    let account_ids = Arc::new(RwLock::new(Vec::<AccountId>::new()));

    let mut join_handles = Vec::new();
    for i in 0..config.tasks {
        let handle = tokio::spawn(run_worker(i, account_ids.clone(), config.clone()));
        join_handles.push(handle);
    }

    info!("Starting load generator with {} tasks...", config.tasks);
    for handle in join_handles {
        if let Err(e) = handle.await {
            error!("One of the worker tasks failed: {}", e);
        };
    }
    Ok(())
}

async fn run_worker(
    worker_id: u32,
    account_ids: Arc<RwLock<Vec<AccountId>>>,
    config: TellerClientConfig,
) {
    let mut rng = rand::rngs::StdRng::from_os_rng();
    let client = reqwest::Client::new();
    let base_url = format!("http://{}:{}", config.http.address, config.http.port);

    loop {
        let operation_chance = rng.random_range(0..100);

        if operation_chance < config.create_chance {
            let Ok(response) = client.post(format!("{base_url}/accounts")).send().await else {
                continue;
            };

            if response.status().is_success() {
                let Ok(body) = response.text().await else {
                    continue;
                };
                let Ok(new_id) = serde_json::from_str::<AccountId>(&body) else {
                    continue;
                };
                {
                    account_ids.write().await.push(new_id);
                }
                info!("[Worker {}] Opened account: {}", worker_id, new_id);
            }
        } else if operation_chance < config.create_chance + config.topup_chance {
            let Some(id_to_credit) = ({ account_ids.read().await.choose(&mut rng).cloned() })
            else {
                continue;
            };

            let amount = Decimal::new(rng.random_range(100..500), 2);
            let instruction = TopUpInstruction { amount };

            let Ok(body) = serde_json::to_string(&instruction) else {
                continue;
            };

            let request = client
                .post(format!("{base_url}/accounts/{id_to_credit}/topup"))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);

            if request.send().await.is_ok() {
                info!(
                    "[Worker {}] Credited {} to account {}",
                    worker_id, amount, id_to_credit
                );
            }
        } else {
            let (source, destination) = {
                let ids_lock = account_ids.read().await;
                if ids_lock.len() < 2 {
                    // Need at least 2 accounts to transfer between
                    continue;
                }
                let sample: Vec<&AccountId> = ids_lock.choose_multiple(&mut rng, 2).collect();
                (*sample[0], *sample[1])
            };

            let Ok(response) = client
                .get(format!("{base_url}/accounts/{source}"))
                .send()
                .await
            else {
                continue;
            };

            let Ok(body) = response.text().await else {
                continue;
            };
            let Ok(account) = serde_json::from_str::<Account>(&body) else {
                continue;
            };

            let Some(balance_cents) = (account.balance * Decimal::ONE_HUNDRED).to_i64() else {
                continue;
            };
            if balance_cents <= 0 {
                continue;
            }

            let amount = Decimal::new(rng.random_range(1..=balance_cents), 2);
            let instruction = TransferInstruction {
                source,
                destination,
                amount,
            };

            let Ok(body) = serde_json::to_string(&instruction) else {
                continue;
            };

            let transfer_response = client
                .post(format!("{base_url}/transfer"))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await;

            match transfer_response {
                Ok(response) if response.status().is_success() => {
                    info!(
                        "[Worker {}] Transferred {} from {} to {}",
                        worker_id, amount, source, destination
                    );
                }
                Ok(response) => {
                    let reason = response.text().await.unwrap_or_default();
                    warn!(
                        "[Worker {}] Transfer of {} from {} to {} rejected: {}",
                        worker_id, amount, source, destination, reason
                    );
                }
                Err(e) => {
                    warn!(
                        "[Worker {}] Transfer of {} from {} to {} failed: {}",
                        worker_id, amount, source, destination, e
                    );
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
