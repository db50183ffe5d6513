pub mod controller;
pub mod prefetch;
pub mod queue;
pub mod session;

pub use controller::{Applied, FetchOutcome, FetchTicket, PaginationController};
pub use prefetch::{ScrollMetrics, ScrollPrefetcher};
pub use queue::{Completion, FetchJob, FetchQueue};
pub use session::{FeedSession, SessionOptions};
