//! `garage` - Keep track of the vehicles in a parking lot
//!
//! This library provides check-in and check-out of vehicles, the active
//! table of parked vehicles, and a history of past check-outs, all kept in a
//! local key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod render;
pub mod report;
pub mod storage;
pub mod vehicle;

pub use app::{Action, CheckInForm, Confirm, FixedAnswer, Garage, Instruction, Notice, Rejection};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use render::{SurfaceFormat, TableRow, TerminalSurface};
pub use report::HistoryReport;
pub use storage::{GarageStorage, KeyValueStore, MemoryStore, SqliteStore};
pub use vehicle::{LicencePattern, Vehicle, VehicleState};
