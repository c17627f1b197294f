use std::collections::HashMap;
use crate::config::CoinAlias;
use crate::types::coin::Coin;

/// Supported coins as `(canonical id, ticker)`. Order matters: substring
/// matching picks the first id that contains the input.
const BUILTIN_COINS: &[(&str, &str)] = &[
    ("bitcoin", "btc"),
    ("ethereum", "eth"),
    ("ripple", "xrp"),
    ("tether", "usdt"),
    ("usd-coin", "usdc"),
    ("binance-usd", "busd"),
    ("binancecoin", "bnb"),
    ("cardano", "ada"),
    ("polkadot", "dot"),
    ("dogecoin", "doge"),
    ("shiba-inu", "shib"),
    ("litecoin", "ltc"),
    ("solana", "sol"),
    ("tron", "trx"),
    ("avalanche-2", "avax"),
    ("chainlink", "link"),
    ("matic-network", "matic"),
    ("cosmos", "atom"),
    ("stellar", "xlm"),
    ("monero", "xmr"),
    ("uniswap", "uni"),
];

/// Maps user shorthand (`btc`, `doge`, `Bit`) to a canonical coin.
pub struct AliasResolver {
    coins: Vec<Coin>,
    short_names: HashMap<String, String>,
}

impl AliasResolver {
    pub fn builtin() -> Self {
        let coins: Vec<Coin> = BUILTIN_COINS.iter()
            .map(|(id, symbol)| Coin::new(id, symbol))
            .collect();
        let short_names = coins.iter()
            .map(|coin| (coin.symbol.clone(), coin.id.clone()))
            .collect();

        AliasResolver { coins, short_names }
    }

    /// Appends configured coins after the built-in ones. Ids already known
    /// are skipped; their short names are still registered.
    pub fn with_extra(mut self, extra: &[CoinAlias]) -> Self {
        for alias in extra {
            let coin = Coin::new(&alias.id, &alias.symbol);
            if self.coin(&coin.id).is_none() {
                self.coins.push(coin.clone());
            }
            self.short_names.entry(coin.symbol.clone()).or_insert_with(|| coin.id.clone());
            for short in &alias.short_names {
                self.short_names.insert(short.to_lowercase(), coin.id.clone());
            }
        }
        self
    }

    /// Substring match on canonical ids first, then exact short-name lookup.
    pub fn resolve(&self, raw: &str) -> Option<Coin> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(coin) = self.coins.iter().find(|coin| coin.id.contains(&needle)) {
            return Some(coin.clone());
        }

        self.short_names.get(&needle)
            .and_then(|id| self.coin(id))
            .cloned()
    }

    pub fn coin(&self, id: &str) -> Option<&Coin> {
        self.coins.iter().find(|coin| coin.id == id)
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::builtin()
    }
}
