use ac_session::{ChatEntry, Visibility};

use super::Attack;
use crate::AttackArgs;

pub fn run(args: &AttackArgs, seed: u64, visibility: &str) -> Result<(), String> {
    let attack = Attack::load(args)?;
    let visibility: Visibility = visibility.parse()?;
    let session = attack.session(seed);
    let entry = ChatEntry {
        visibility,
        ..attack.entry()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;
    runtime
        .block_on(session.roll_alt_crit(&entry))
        .map(|_| ())
        .map_err(|e| e.to_string())
}
