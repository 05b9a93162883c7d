// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! Output formatters for CLI results.

use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use gemforge_types::{CategoryStrategy, CoreLeftover, OptimizeResponse};
use std::fmt::Write;

/// Formatter for pretty ASCII tables
#[derive(Debug)]
pub struct TableFormatter;

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

impl TableFormatter {
    /// Format an optimization result, one table per category
    pub fn format_response(response: &OptimizeResponse) -> String {
        let mut output = String::new();

        for category in &response.categories {
            output.push_str(&Self::format_category(category));
            output.push('\n');
        }

        let _ = writeln!(
            output,
            "Total expected cost: {:.0} gold (computed {})",
            response.total_cost,
            response.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        output
    }

    fn format_category(strategy: &CategoryStrategy) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "=== {} cores ===", strategy.category);
        output.push_str(&Self::format_leftovers(&strategy.leftovers));
        output.push('\n');

        if strategy.cores.is_empty() && strategy.unresolved_cores.is_empty() {
            output.push_str("Every core is full, nothing to craft\n");
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Core",
            "Scenario",
            "Target",
            "Material",
            "Material\n(gold)",
            "Crafting\n(gold)",
            "Labor\n(gold)",
            "Reinit\n(gold)",
            "Slot Total\n(gold)",
        ]));

        // Highlight the cheapest slot of each core
        for core in &strategy.cores {
            let cheapest = core
                .best
                .slots
                .iter()
                .map(|slot| slot.total_cost)
                .fold(f64::INFINITY, f64::min);

            for (index, slot) in core.best.slots.iter().enumerate() {
                let (core_cell, scenario_cell) = if index == 0 {
                    (
                        Cell::new(&core.core).add_attribute(Attribute::Bold),
                        Cell::new(format!(
                            "{:?} = {:.0}",
                            core.best.scenario, core.best.total_cost
                        )),
                    )
                } else {
                    (Cell::new(""), Cell::new(""))
                };

                let total_cell = if (slot.total_cost - cheapest).abs() < f64::EPSILON {
                    Cell::new(format!("{:.0}", slot.total_cost)).fg(Color::Green)
                } else {
                    Cell::new(format!("{:.0}", slot.total_cost))
                };

                table.add_row(vec![
                    core_cell,
                    scenario_cell,
                    Cell::new(slot.target.to_string()),
                    Cell::new(&slot.material_name),
                    Cell::new(format!("{:.0}", slot.breakdown.material_cost)),
                    Cell::new(format!("{:.0}", slot.breakdown.craft_cost)),
                    Cell::new(format!("{:.0}", slot.breakdown.labor_cost)),
                    Cell::new(format!("{:.0}", slot.breakdown.reinit_cost)),
                    total_cell,
                ]);
            }
        }

        output.push_str(&table.to_string());
        output.push('\n');

        for core in &strategy.unresolved_cores {
            let _ = writeln!(output, "No reachable scenario for {core}");
        }
        let _ = writeln!(
            output,
            "{} subtotal: {:.0} gold",
            strategy.category, strategy.total_cost
        );
        output
    }

    /// Format per-core leftovers after gem placement
    pub fn format_leftovers(leftovers: &[CoreLeftover]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Core",
            "Position",
            "Willpower\nLeft",
            "Slots\nLeft",
            "Placed Gems",
        ]));

        for core in leftovers {
            let gems = if core.assigned_gems.is_empty() {
                "-".to_owned()
            } else {
                core.assigned_gems.join("\n")
            };
            table.add_row(vec![
                Cell::new(&core.core),
                Cell::new(core.position),
                Cell::new(core.remaining_willpower),
                Cell::new(core.remaining_slots),
                Cell::new(gems),
            ]);
        }

        table.to_string()
    }

    /// Format the slot cost scenarios for one core
    pub fn format_scenarios(willpower: u32, slots: u32, scenarios: &[Vec<u32>]) -> String {
        let mut output = String::new();
        if scenarios.is_empty() {
            let _ = writeln!(
                output,
                "No way to spend {willpower} willpower over {slots} slots"
            );
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["#", "Slot Costs"]));
        for (index, scenario) in scenarios.iter().enumerate() {
            let costs: Vec<String> = scenario.iter().map(u32::to_string).collect();
            table.add_row(vec![Cell::new(index + 1), Cell::new(costs.join(" + "))]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        let _ = writeln!(
            output,
            "{} scenarios for {willpower} willpower over {slots} slots",
            scenarios.len()
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gemforge_types::{
        CoreCategory, CoreGrade, CoreStrategy, CostEstimate, GemKind, MaterialGrade, MaterialId,
        ScenarioChoice, SlotCostOption, TargetSpec,
    };

    fn leftover() -> CoreLeftover {
        CoreLeftover {
            core: "Relic Order".to_owned(),
            position: 0,
            grade: CoreGrade::Relic,
            category: CoreCategory::Order,
            remaining_willpower: 8,
            remaining_slots: 2,
            assigned_gems: vec!["Order Gem: Stability".to_owned()],
        }
    }

    fn slot(total: f64) -> SlotCostOption {
        let material = MaterialId::new(GemKind::Stability, MaterialGrade::Heroic);
        SlotCostOption {
            target: TargetSpec::new(GemKind::Stability, 5, 4),
            material,
            material_name: material.display_name(),
            willpower_cost: 4,
            total_cost: total,
            breakdown: CostEstimate {
                material_cost: total,
                craft_cost: 0.0,
                labor_cost: 0.0,
                reinit_cost: 0.0,
            },
        }
    }

    #[test]
    fn test_response_lists_scenarios_and_total() {
        let response = OptimizeResponse {
            total_cost: 5000.0,
            categories: vec![CategoryStrategy {
                category: CoreCategory::Order,
                leftovers: vec![leftover()],
                total_cost: 5000.0,
                cores: vec![CoreStrategy {
                    core: "Relic Order".to_owned(),
                    position: 0,
                    remaining_willpower: 8,
                    remaining_slots: 2,
                    best: ScenarioChoice {
                        scenario: vec![4, 4],
                        total_cost: 5000.0,
                        slots: vec![slot(2500.0), slot(2500.0)],
                    },
                }],
                unresolved_cores: Vec::new(),
            }],
            computed_at: Utc::now(),
        };

        let output = TableFormatter::format_response(&response);
        assert!(output.contains("=== Order cores ==="));
        assert!(output.contains("[4, 4] = 5000"));
        assert!(output.contains("Heroic Order Gem: Stability"));
        assert!(output.contains("Total expected cost: 5000 gold"));
    }

    #[test]
    fn test_full_category_has_nothing_to_craft() {
        let mut full = leftover();
        full.remaining_slots = 0;
        full.remaining_willpower = 0;
        let strategy = CategoryStrategy {
            category: CoreCategory::Chaos,
            leftovers: vec![full],
            total_cost: 0.0,
            cores: Vec::new(),
            unresolved_cores: Vec::new(),
        };
        assert!(TableFormatter::format_category(&strategy).contains("nothing to craft"));
    }

    #[test]
    fn test_scenarios() {
        let output = TableFormatter::format_scenarios(8, 2, &[vec![3, 5], vec![4, 4]]);
        assert!(output.contains("3 + 5"));
        assert!(output.contains("2 scenarios for 8 willpower over 2 slots"));

        let none = TableFormatter::format_scenarios(40, 4, &[]);
        assert!(none.contains("No way to spend 40 willpower"));
    }
}
