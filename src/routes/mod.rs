// # Routes Module
//
// - HTTP route handlers for the whale watch server, one submodule per API area.
// - Each submodule exposes `create_routes()`; `server.rs` merges them.
//
//  ## Available Route Modules
// - `health`: liveness check and cache statistics
// - `wallet`: holdings, transactions, AI analysis and the combined view
// - `market`: SOL price and network TPS

/// Health check and cache statistics
pub mod health;

/// Whale wallet endpoints
pub mod wallet;

/// Market header stats
pub mod market;
