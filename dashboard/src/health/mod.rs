//! Gateway health polling
//!
//! [`HealthPoller`] owns the only writer of [`PollState`]; views are derived
//! on read with [`derive_view`] and never stored.

pub mod derive;
pub mod poller;
pub mod types;

pub use derive::{derive_view, Connection, ConnectionState, HealthView, StatusLabel};
pub use poller::{HealthPoller, HealthSample, PollFailure, PollState};
pub use types::{BitcoinInfo, BitcoinStatus, HealthSnapshot, LightningInfo, LightningStatus};
