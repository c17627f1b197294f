use serde::{Deserialize, Serialize};

/// A coin after alias resolution.
///
/// `id` is the canonical provider-facing identifier (`bitcoin`) and is the
/// key for every cache. `symbol` is the exchange ticker (`btc`) used by
/// ticker-style providers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
}

impl Coin {
    pub fn new(id: &str, symbol: &str) -> Self {
        Coin {
            id: id.to_lowercase(),
            symbol: symbol.to_lowercase(),
        }
    }
}
