//! Withdraw, channel and auth flow controllers
//!
//! ```text
//! create:  idle → requesting → requested | request_failed
//! invoke:  idle → invoking   → invoked   | invoke_failed
//! ```
//!
//! A new create resets the invoke step. Invoking needs a held request and a
//! form that validates; otherwise it fails without touching the network.

pub mod controller;
pub mod forms;
pub mod workbench;

pub use controller::{CreateState, FlowController, FlowFailure, FlowSnapshot, InvokeState};
pub use forms::{
    parse_amount, parse_announce, AuthForm, ChannelForm, FlowForm, FlowKind, WithdrawForm,
};
pub use workbench::{RemoteWorkbench, Workbench};
