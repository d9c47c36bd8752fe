pub mod aggregator;
pub mod data_loader;
pub mod filter_engine;
pub mod openligadb;
pub mod result_classifier;
pub mod stadium_resolver;

pub use aggregator::*;
pub use data_loader::*;
pub use filter_engine::*;
pub use openligadb::{OpenLigaClient, SyncSummary};
pub use result_classifier::*;
pub use stadium_resolver::*;
