use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;
use tracing::{debug, info};

use crate::{item::Item, tool::Tool};

/// Money the crew starts with.
pub const INITIAL_MONEY: u32 = 60;

/// First profit quota.
pub const INITIAL_QUOTA: u32 = 130;

/// Days available to meet each quota.
pub const MAX_DAYS: i32 = 3;

const QUOTA_STEP: f64 = 100.0;
const QUOTA_CURVE: f64 = 16.0;
const RANDOMIZER_STD_DEV: f64 = 0.1;
const RANDOMIZER_CLIP: f64 = 0.5;
const RANDOMIZER_BIAS: f64 = 0.5;

/// Purchase refused by the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    /// The tool costs more than the crew has.
    #[error("cannot afford {tool}: costs {cost}, have {money}")]
    InsufficientFunds {
        /// Terminal phrase of the tool.
        tool: String,
        /// Price of the tool.
        cost: u32,
        /// Money available.
        money: u32,
    },
}

/// Result of closing out a quota period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaOutcome {
    /// Days remain before the quota is due.
    Pending,
    /// The quota was met and a new, higher one was set.
    Met {
        /// Quota for the next period.
        next_quota: u32,
    },
    /// The quota was missed and the run is over.
    Missed,
}

/// Next profit quota after `fulfilled` quotas have been met.
///
/// Grows quadratically with the number of quotas met, scaled by a jitter
/// drawn from a narrow normal curve clipped to `±0.5` and pulled toward zero.
pub fn increase_quota<R: Rng + ?Sized>(current: u32, fulfilled: u32, rng: &mut R) -> u32 {
    let sample: f64 = rng.sample(StandardNormal);
    let jitter = (sample * RANDOMIZER_STD_DEV).clamp(-RANDOMIZER_CLIP, RANDOMIZER_CLIP);
    let jitter = jitter * (-RANDOMIZER_BIAS * jitter.abs()).exp();

    let fulfilled = f64::from(fulfilled);
    let growth = QUOTA_STEP * (1.0 + fulfilled * fulfilled / QUOTA_CURVE) * (1.0 + jitter);
    current.saturating_add(growth.max(0.0) as u32)
}

/// Money, remaining days, and quota progress of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    money: u32,
    quota: u32,
    quotas_met: u32,
    days_left: i32,
    scrap_sold: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            money: INITIAL_MONEY,
            quota: INITIAL_QUOTA,
            quotas_met: 0,
            days_left: MAX_DAYS,
            scrap_sold: 0,
        }
    }
}

impl Ledger {
    /// Starts a fresh run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Money available for purchases.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Current profit quota.
    #[must_use]
    pub const fn quota(&self) -> u32 {
        self.quota
    }

    /// Number of quotas met so far.
    #[must_use]
    pub const fn quotas_met(&self) -> u32 {
        self.quotas_met
    }

    /// Days left before the quota is due. Goes negative once overdue.
    #[must_use]
    pub const fn days_left(&self) -> i32 {
        self.days_left
    }

    /// Value sold toward the current quota.
    #[must_use]
    pub const fn scrap_sold(&self) -> u32 {
        self.scrap_sold
    }

    /// Fraction of full value paid for scrap today.
    #[must_use]
    pub fn sale_rate(&self) -> f32 {
        (MAX_DAYS - self.days_left.clamp(0, MAX_DAYS)) as f32 / MAX_DAYS as f32
    }

    /// Consumes a day, typically on landing.
    pub fn end_day(&mut self) {
        self.days_left -= 1;
    }

    /// Sells `items` at today's rate and returns the money earned.
    pub fn sell<'a, I>(&mut self, items: I) -> u32
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let rate = self.sale_rate();
        let earned: u32 = items
            .into_iter()
            .map(|item| (item.value() as f32 * rate) as u32)
            .sum();
        self.scrap_sold = self.scrap_sold.saturating_add(earned);
        self.money = self.money.saturating_add(earned);
        debug!(earned, rate, money = self.money, "sold scrap");
        earned
    }

    /// Pays for `tool` if the crew can afford it.
    pub fn buy(&mut self, tool: &Tool) -> Result<(), PurchaseError> {
        if tool.cost() > self.money {
            return Err(PurchaseError::InsufficientFunds {
                tool: tool.phrase().to_owned(),
                cost: tool.cost(),
                money: self.money,
            });
        }
        self.money -= tool.cost();
        debug!(tool = tool.phrase(), money = self.money, "bought tool");
        Ok(())
    }

    /// Closes the quota period once no days remain.
    pub fn settle_quota<R: Rng + ?Sized>(&mut self, rng: &mut R) -> QuotaOutcome {
        if self.days_left > 0 {
            return QuotaOutcome::Pending;
        }
        if self.scrap_sold < self.quota {
            info!(quota = self.quota, sold = self.scrap_sold, "quota missed");
            return QuotaOutcome::Missed;
        }

        self.days_left = MAX_DAYS;
        self.quotas_met += 1;
        self.quota = increase_quota(self.quota, self.quotas_met, rng);
        self.scrap_sold = 0;
        info!(next_quota = self.quota, met = self.quotas_met, "quota met");
        QuotaOutcome::Met {
            next_quota: self.quota,
        }
    }
}
