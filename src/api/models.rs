use crate::blockchain::{Block, Blockchain};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state with the in-memory blockchain.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
}

impl AppState {
    pub fn new(blockchain: Blockchain) -> Self {
        Self {
            blockchain: Mutex::new(blockchain),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct AddBlockRequest {
    pub transactions: String,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub mined_index: u64,
    pub hash: String,
    pub nonce: u64,
    pub difficulty: u32,
}

#[derive(Serialize, Deserialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

/* ---------- Tamper API Models (demo) ---------- */

#[derive(Deserialize)]
pub struct TamperRequest {
    pub index: usize,
    pub transactions: String,
}

#[derive(Serialize, Deserialize)]
pub struct TamperResponse {
    pub index: usize,
    pub hash: String,
    pub valid: bool,
}
