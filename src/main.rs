use actix_web::{App, HttpServer, web};
use log::info;
use std::io;

use hash_chain::api::{self, AppState};
use hash_chain::blockchain::Blockchain;
use hash_chain::config::Config;

const DEMO_TRANSACTIONS: [&str; 2] = ["Transaction 1: A -> B", "Transaction 2: C -> D"];

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env();
    env_logger::init();

    let mut blockchain = Blockchain::new(config.difficulty).map_err(io::Error::other)?;
    if config.seed_demo {
        for tx in DEMO_TRANSACTIONS {
            blockchain.add_block(tx).map_err(io::Error::other)?;
        }
        info!(
            "seeded {} demo blocks (chain valid={})",
            DEMO_TRANSACTIONS.len(),
            blockchain.is_valid_chain()
        );
    }

    println!(
        "⛓️ Starting hash chain API at http://{}:{} (difficulty {})",
        config.host, config.port, config.difficulty
    );

    let state = web::Data::new(AppState::new(blockchain));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
