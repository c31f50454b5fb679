//! 控制周期与循环驱动

mod controller;
mod cycle;
mod loop_runner;

pub use controller::Controller;
pub use cycle::{
    ArmBindings, ControlContext, ControlCycle, Lifecycle, TickOutcome, TickReport,
};
pub use loop_runner::{
    LoopConfig, LoopStats, run_controller, run_controller_spin, run_controller_spin_until,
};
