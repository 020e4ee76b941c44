//! Shared test harness modules for the tourplan CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use plan::*;

mod helpers;
mod plan_steps;
