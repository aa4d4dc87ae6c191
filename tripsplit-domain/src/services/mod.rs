pub mod allocation;
pub mod balance_calculator;
pub mod roster;
pub mod settlement_planner;

pub use allocation::{allocate, exact_rescale_tolerance, ShareMap};
pub use balance_calculator::{totals_by_category, BalanceCalculator, UNCATEGORIZED};
pub use roster::{prune_participant, sanitize_split};
pub use settlement_planner::{balance_epsilon, SettlementPlanner};
