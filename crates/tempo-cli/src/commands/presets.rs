use serde::Serialize;
use tempo_core::timer::{FLEX_MAX_MINUTES, FLEX_MIN_MINUTES};
use tempo_core::{Config, Mode, Preset};

#[derive(Serialize)]
pub(crate) struct PresetRow {
    mode: Mode,
    /// 1-based, as accepted by `tempo run --preset`.
    number: usize,
    duration_min: u32,
    label: &'static str,
    energy_cost: u32,
    selectable: bool,
}

pub(crate) fn rows(energy: u32) -> Vec<PresetRow> {
    [Mode::Momentum, Mode::Sprint]
        .iter()
        .flat_map(|mode| mode.presets().iter().enumerate())
        .map(|(i, preset): (usize, &Preset)| PresetRow {
            mode: preset.mode,
            number: i + 1,
            duration_min: preset.duration_min,
            label: preset.label,
            energy_cost: preset.energy_cost,
            selectable: energy >= preset.energy_cost,
        })
        .collect()
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let energy = config.ledger().level();
    let rows = rows(energy);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Energy: {energy}%\n");
    let mut current = None;
    for row in &rows {
        if current != Some(row.mode) {
            println!("{}:", row.mode);
            current = Some(row.mode);
        }
        let cost = if row.energy_cost == 0 {
            "free".to_string()
        } else {
            format!("-{} energy", row.energy_cost)
        };
        let marker = if row.selectable { " " } else { "x" };
        println!(
            "  {marker} {}. {:>2} min {:<11} {cost}",
            row.number, row.duration_min, row.label
        );
    }
    println!(
        "flex:\n    {FLEX_MIN_MINUTES}-{FLEX_MAX_MINUTES} min (default {}), free",
        config.timer.flex_minutes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_mark_unaffordable_presets() {
        let rows = rows(30);
        assert_eq!(rows.len(), 7);
        let momentum: Vec<bool> = rows
            .iter()
            .filter(|r| r.mode == Mode::Momentum)
            .map(|r| r.selectable)
            .collect();
        assert_eq!(momentum, vec![true, true, false, false]);
        assert!(rows
            .iter()
            .filter(|r| r.mode == Mode::Sprint)
            .all(|r| r.selectable));
    }
}
