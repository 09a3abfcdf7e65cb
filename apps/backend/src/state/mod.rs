pub mod app_state;
pub mod request_count;

pub use app_state::AppState;
pub use request_count::RequestCount;
