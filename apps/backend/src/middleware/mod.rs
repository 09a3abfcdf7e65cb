pub mod request_counter;
pub mod request_trace;
pub mod trx_scope;

pub use request_counter::RequestCounter;
pub use request_trace::{RequestTrace, TraceId};
pub use trx_scope::TrxScope;
