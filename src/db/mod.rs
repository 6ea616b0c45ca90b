//! Persistence module split across logical submodules.

mod coins;
mod connection;

pub use coins::{
    collection_summary, count_coins, fetch_coin, fetch_coins, insert_coin, set_collected,
    toggle_collected, CoinFilter, Summary,
};
pub use connection::{ensure_schema, open_in_memory};
