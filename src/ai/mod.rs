mod agent;
pub mod minimax;
mod random;

pub use agent::Agent;
pub use minimax::{
    search, search_parallel, search_parallel_with_report, search_with_report, MinimaxAgent,
    SearchOutcome, SearchReport,
};
pub use random::RandomAgent;
