#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scrap items, purchasable tools, and the money/quota bookkeeping around
//! them.
//!
//! Items are generated from the item catalogue when a room materialises its
//! loot. Tools are looked up by their terminal phrase and fail fast when the
//! phrase is unknown. The [`Ledger`] tracks money, days, and the profit quota
//! between levels.

mod item;
mod ledger;
mod tool;

pub use item::Item;
pub use ledger::{
    increase_quota, Ledger, PurchaseError, QuotaOutcome, INITIAL_MONEY, INITIAL_QUOTA, MAX_DAYS,
};
pub use tool::{
    Lantern, Shovel, Tool, LANTERN_LIGHT_RADIUS, SHOVEL_DAMAGE, SHOVEL_ROTATION_PER_TICK,
    SHOVEL_SWING_TICKS,
};
