// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! CLI module for the gemforge command-line interface.

pub mod args;
pub mod commands;
pub mod formatters;
pub mod plan;

pub use args::{AssignArgs, Cli, Commands, OptimizeArgs, ScenariosArgs};
pub use formatters::TableFormatter;
pub use plan::{EXAMPLE_PLAN, PlanFile};
