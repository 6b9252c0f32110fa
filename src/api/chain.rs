use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{
    AddBlockRequest, AppState, ChainResponse, DifficultyResponse, MineResponse, TamperRequest,
    TamperResponse, ValidateResponse,
};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: bc.len(),
        difficulty: bc.difficulty(),
        chain: bc.blocks(),
    };
    HttpResponse::Ok().json(resp)
}

/// Get a single block by index.
#[get("/chain/{index}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<usize>) -> impl Responder {
    let index = path.into_inner();
    let bc = state.blockchain.lock().expect("mutex poisoned");
    match bc.get(index) {
        Some(block) => HttpResponse::Ok().json(block),
        None => HttpResponse::NotFound().body(format!("no block at index {index}")),
    }
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let verdict = bc.verify();
    let resp = ValidateResponse {
        valid: verdict.is_ok(),
        length: bc.len(),
        difficulty: bc.difficulty(),
        reason: verdict.err().map(|e| e.to_string()),
    };
    HttpResponse::Ok().json(resp)
}

/// Mine a new block carrying the given payload and append it.
/// Holds the chain lock for the whole PoW search.
#[post("/blocks/")]
pub async fn add_block(
    state: web::Data<AppState>,
    req: web::Json<AddBlockRequest>,
) -> impl Responder {
    let transactions = req.into_inner().transactions;
    if transactions.trim().is_empty() {
        return HttpResponse::BadRequest().body("transactions required");
    }
    debug!("POST /blocks/ - mining {} payload bytes", transactions.len());

    let mut bc = state.blockchain.lock().expect("mutex poisoned");
    let difficulty = bc.difficulty();
    match bc.add_block(transactions) {
        Ok(block) => HttpResponse::Ok().json(MineResponse {
            mined_index: block.index,
            hash: block.hash.clone(),
            nonce: block.nonce,
            difficulty,
        }),
        Err(e) => {
            warn!("POST /blocks/ - failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Get the chain's PoW difficulty (fixed at startup).
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: bc.difficulty(),
    })
}

/// DEV: rewrite a historical block's payload (rehashing it) to exercise validation.
#[post("/tamper/")]
pub async fn tamper_block(
    state: web::Data<AppState>,
    req: web::Json<TamperRequest>,
) -> impl Responder {
    let TamperRequest {
        index,
        transactions,
    } = req.into_inner();

    let mut bc = state.blockchain.lock().expect("mutex poisoned");
    if let Err(e) = bc.try_tamper_block(index, transactions) {
        warn!("POST /tamper/ - rejected: {e}");
        return HttpResponse::BadRequest().body(e.to_string());
    }

    let resp = TamperResponse {
        index,
        hash: bc.chain[index].hash.clone(),
        valid: bc.is_valid_chain(),
    };
    info!("POST /tamper/ - block #{} rewritten, chain valid={}", index, resp.valid);
    HttpResponse::Ok().json(resp)
}
