// ============================================================================
// API Gateway
// ============================================================================
//
// Single entry point for callers. It handles:
// - session verification (SessionVerifier)
// - local validation of list/item requests
// - forwarding to the backing store with trusted identity headers
// - translating store replies and failures into the caller contract
//
// Architecture:
// - Stateless: all list/item state lives in the backing store
// - Exactly one downstream call per request, no retries
//
// ============================================================================

pub mod identity;
pub mod proxy;
pub mod router;
pub mod service_client;
pub mod wire;

pub use identity::IdentityForwarder;
pub use proxy::{Forwarded, ResourceProxy};
pub use router::{GatewayState, create_router};
pub use service_client::StoreClient;
