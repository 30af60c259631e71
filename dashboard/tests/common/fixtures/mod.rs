//! This module provides reusable test utilities:
//! - Mock LNURL gateway server
//! - Settings databases in temporary directories
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_gateway;
pub mod test_data;
pub mod test_database;

// Re-export commonly used items
pub use mock_gateway::MockGatewayServer;
pub use test_data::*;
pub use test_database::TestDatabase;
