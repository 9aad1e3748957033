//! Orchestration for a single launch: convert the image, then boot it.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::plan::{LaunchPlan, PlanSettings, build_plan};
use crate::core::types::RunParameters;
use crate::io::process::ProcessRunner;

/// Build the plan for `params` and run both invocations in order.
///
/// The emulator never starts if the converter fails. Errors from the runner are
/// returned with context; a [`ToolFailure`](crate::io::process::ToolFailure)
/// stays reachable through `downcast_ref`.
pub fn launch<R: ProcessRunner>(
    params: &RunParameters,
    settings: &PlanSettings,
    runner: &R,
) -> Result<LaunchPlan> {
    let plan = build_plan(params, settings);
    debug!(convert = %plan.convert, emulate = %plan.emulate, "launch plan built");

    info!(
        executable = %params.executable_path,
        binary = %plan.binary_path,
        "converting executable"
    );
    runner
        .run(&plan.convert)
        .with_context(|| format!("convert {}", params.executable_path))?;

    info!(binary = %plan.binary_path, debug = params.debug_enabled, "starting emulator");
    runner
        .run(&plan.emulate)
        .with_context(|| format!("emulate {}", plan.binary_path))?;

    Ok(plan)
}
