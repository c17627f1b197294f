pub mod providers;
pub mod registry;
pub mod fetcher;
pub mod circuit_breaker;
pub mod resolver;
pub mod cache;
pub mod facade;

pub use cache::{CacheEntry, PriceCache, TtlCache};
pub use circuit_breaker::{CircuitState, ProviderCircuitBreaker, ProviderStatus};
pub use facade::ResolutionFacade;
pub use fetcher::{HttpFetcher, ReqwestFetcher, UpstreamRequest};
pub use registry::ProviderRegistry;
pub use resolver::PriceResolver;
