use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ac_session::SessionError;

use super::Attack;
use crate::AttackArgs;

pub fn run(args: &AttackArgs, json: bool) -> Result<(), String> {
    let attack = Attack::load(args)?;
    if !attack.settings.enabled {
        return Err(SessionError::Disabled.to_string());
    }

    let session = attack.session(0);
    let critical = attack.is_critical();
    let options = attack.settings.synth_options(critical);
    let (tier, formula) = session
        .resolve_formula(&attack.item, attack.actor.as_ref(), &options)
        .ok_or_else(|| SessionError::NoDamageFound(attack.item.name.clone()).to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&formula.parts).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let outcome = if critical { "critical" } else { "normal hit" };
    println!(
        "  {} {}",
        attack.item.name.bold(),
        format!("({outcome}, {tier})").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Expression", "Type", "Category", "Source"]);
    for (i, part) in formula.parts.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            part.expression.clone(),
            part.damage_type.to_string(),
            part.category.to_string(),
            part.kind.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} {}", "Combined:".bold(), formula.combined());
    if tier.is_lossy() {
        println!("  {}", ac_session::session::MISSING_MODIFIERS_NOTE.yellow());
    }

    Ok(())
}
