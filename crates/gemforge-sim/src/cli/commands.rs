// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! Subcommand handlers. Each returns the text to print on stdout.

use crate::cli::args::{AssignArgs, OptimizeArgs, ScenariosArgs};
use crate::cli::formatters::TableFormatter;
use crate::cli::plan::{EXAMPLE_PLAN, PlanFile};
use anyhow::{Context, Result};
use gemforge_core::{
    MemoryCache, OptimizeService, PolicyRegistry, assign_category, generate_scenarios,
};
use gemforge_types::{CoreCategory, CoreLeftover};
use std::sync::Arc;
use tracing::info;

fn load_policies(args: &OptimizeArgs) -> Result<PolicyRegistry> {
    match &args.policies {
        Some(dir) => {
            let registry = PolicyRegistry::load_dir(dir)
                .with_context(|| format!("Failed to load policies from {}", dir.display()))?;
            let keys: Vec<String> = registry.keys().iter().map(ToString::to_string).collect();
            info!("Loaded {} policies: {}", registry.len(), keys.join(", "));
            Ok(registry)
        }
        None => {
            info!("Using baseline accept-everything policy");
            Ok(PolicyRegistry::with_baseline())
        }
    }
}

pub fn optimize(args: &OptimizeArgs) -> Result<String> {
    let plan = PlanFile::from_file(&args.plan)?.with_overrides(args.seed, args.simulations);
    let policies = load_policies(args)?;

    let service = OptimizeService::new(
        plan.optimizer,
        policies,
        Arc::new(plan.prices),
        Arc::new(MemoryCache::new()),
    )?;
    let response = service.optimize_with_progress(&plan.request, |progress| {
        info!("[{:>3}%] {}", progress.percent, progress.message);
    })?;

    if args.json {
        serde_json::to_string_pretty(&response).context("Failed to serialize result")
    } else {
        Ok(TableFormatter::format_response(&response))
    }
}

pub fn assign(args: &AssignArgs) -> Result<String> {
    let plan = PlanFile::from_file(&args.plan)?;
    plan.request.validate()?;

    let mut leftovers: Vec<CoreLeftover> = Vec::new();
    for category in CoreCategory::ALL {
        if plan.request.cores_for(category).is_empty() {
            continue;
        }
        leftovers.extend(assign_category(&plan.request, category)?);
    }

    if args.json {
        serde_json::to_string_pretty(&leftovers).context("Failed to serialize leftovers")
    } else {
        let mut output = TableFormatter::format_leftovers(&leftovers);
        output.push('\n');
        Ok(output)
    }
}

pub fn scenarios(args: &ScenariosArgs) -> String {
    let scenarios = generate_scenarios(args.willpower, args.slots);
    TableFormatter::format_scenarios(args.willpower, args.slots, &scenarios)
}

pub fn example_plan() -> &'static str {
    EXAMPLE_PLAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn plan_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn optimize_args(plan: PathBuf) -> OptimizeArgs {
        OptimizeArgs {
            plan,
            policies: None,
            baseline_policy: true,
            seed: Some(11),
            simulations: Some(50),
            json: true,
        }
    }

    #[test]
    fn test_optimize_full_core_as_json() {
        // Relic core filled exactly by gems of cost 3, 4, 4, 4
        let file = plan_file(
            r#"
[request]
reference_price = 90

[request.cores]
chaos = ["relic"]

[[request.held_gems]]
name = "Chaos Gem: Erosion"
core_point = 5
efficiency = 5

[[request.held_gems]]
name = "Chaos Gem: Erosion"
core_point = 5
efficiency = 4

[[request.held_gems]]
name = "Chaos Gem: Distortion"
core_point = 5
efficiency = 5

[[request.held_gems]]
name = "Chaos Gem: Distortion"
core_point = 5
efficiency = 5
"#,
        );
        let output = optimize(&optimize_args(file.path().to_path_buf())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_cost"].as_f64(), Some(0.0));
        assert_eq!(value["categories"][0]["category"], "chaos");
    }

    #[test]
    fn test_optimize_rejects_invalid_request() {
        let file = plan_file(EXAMPLE_PLAN);
        let mut args = optimize_args(file.path().to_path_buf());
        args.simulations = Some(1);
        assert!(optimize(&args).is_err());
    }

    #[test]
    fn test_missing_policy_dir_is_reported() {
        let file = plan_file(EXAMPLE_PLAN);
        let mut args = optimize_args(file.path().to_path_buf());
        args.baseline_policy = false;
        args.policies = Some(PathBuf::from("/nonexistent/models"));
        let err = optimize(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to load policies"));
    }

    #[test]
    fn test_assign_example_plan() {
        let file = plan_file(EXAMPLE_PLAN);
        let output = assign(&AssignArgs {
            plan: file.path().to_path_buf(),
            json: true,
        })
        .unwrap();
        let leftovers: Vec<CoreLeftover> = serde_json::from_str(&output).unwrap();
        assert_eq!(leftovers.len(), 3);

        let placed: usize = leftovers.iter().map(|core| core.assigned_gems.len()).sum();
        assert_eq!(placed, 2);
    }

    #[test]
    fn test_scenarios_table() {
        let output = scenarios(&ScenariosArgs {
            willpower: 8,
            slots: 2,
        });
        assert!(output.contains("3 + 5"));
        assert!(output.contains("4 + 4"));
    }
}
