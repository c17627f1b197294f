use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use crate::alias::AliasResolver;
use crate::history::HistoryService;
use crate::types::timestamp::Clock;

/// Pre-fetches today's daily chart for a fixed list of popular coins.
///
/// One pass runs at startup; afterwards the date is checked every
/// `check_interval` and another pass runs when the UTC day changes. Coins are
/// spaced out by `spacing` to stay under upstream rate limits.
pub struct DailyWarmup {
    history: Arc<HistoryService>,
    aliases: Arc<AliasResolver>,
    clock: Arc<dyn Clock>,
    coins: Vec<String>,
    spacing: Duration,
    check_interval: Duration,
}

impl DailyWarmup {
    pub fn new(
        history: Arc<HistoryService>,
        aliases: Arc<AliasResolver>,
        clock: Arc<dyn Clock>,
        coins: Vec<String>,
        spacing: Duration,
        check_interval: Duration,
    ) -> Self {
        DailyWarmup {
            history,
            aliases,
            clock,
            coins,
            spacing,
            check_interval,
        }
    }

    /// One pass over the coin list. Failures are logged and skipped.
    /// Returns how many snapshots were fetched.
    pub async fn warm_up(&self) -> usize {
        let mut fetched = 0;

        for raw in &self.coins {
            tokio::time::sleep(self.spacing).await;

            let Some(coin) = self.aliases.resolve(raw) else {
                tracing::warn!("Skipping warm-up for unknown coin {}", raw);
                continue;
            };

            tracing::info!("Fetching daily data for popular coin: {}", coin.id);
            match self.history.ensure_daily_snapshot(&coin).await {
                Ok(true) => fetched += 1,
                Ok(false) => {}
                Err(e) => tracing::error!("Daily warm-up failed for {}: {}", coin.id, e),
            }
        }

        fetched
    }

    pub async fn run(self) {
        let mut last_date = self.clock.now().date_string();
        let fetched = self.warm_up().await;
        tracing::info!("Daily popular coins initialized ({} fetched)", fetched);

        let mut ticker = interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let today = self.clock.now().date_string();
            if today != last_date {
                last_date = today;
                let fetched = self.warm_up().await;
                tracing::info!("Daily warm-up for {} done ({} fetched)", last_date, fetched);
            }
        }
    }
}
