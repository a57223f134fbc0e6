//! A local stand-in for the roleplaying-system host.
//!
//! Rolls formulas with a seeded RNG and prints chat posts to stdout.

use std::sync::Mutex;

use ac_mechanics::Formula;
use ac_session::{AltCritSettings, ChatPost, EvaluatedRoll, Host, HostError, RollContext};
use async_trait::async_trait;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub struct LocalHost {
    settings: AltCritSettings,
    rng: Mutex<StdRng>,
}

impl LocalHost {
    pub fn new(settings: AltCritSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl Host for LocalHost {
    fn settings(&self) -> AltCritSettings {
        self.settings.clone()
    }

    async fn evaluate(
        &self,
        expression: &str,
        _context: &RollContext,
    ) -> Result<EvaluatedRoll, HostError> {
        let formula = Formula::parse(expression).map_err(|e| HostError(e.to_string()))?;
        let rolled = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| HostError("dice RNG unavailable".into()))?;
            formula.roll(&mut rng)
        };
        Ok(EvaluatedRoll {
            formula: expression.to_string(),
            total: rolled.total,
            dice: rolled.dice,
        })
    }

    async fn post(&self, post: ChatPost) -> Result<(), HostError> {
        print_post(&post);
        Ok(())
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }
}

fn print_post(post: &ChatPost) {
    let mut lines = post.flavor.lines();
    if let Some(headline) = lines.next() {
        println!("  {}", headline.bold());
    }
    for line in lines {
        println!("  {}", line.dimmed());
    }
    let speaker = post.speaker.as_deref().unwrap_or("(no speaker)");
    println!("  {} {}", format!("[{}]", post.visibility).cyan(), speaker);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Formula", "Dice", "Maxed", "Total"]);
    for roll in &post.rolls {
        table.add_row(vec![
            roll.formula.clone(),
            roll.dice.to_string(),
            format!("{}/{}", roll.dice.maxed(), roll.dice.rolls.len()),
            roll.total.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} {}", "Total:".bold(), post.total());
}
