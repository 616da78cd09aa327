use clap::Subcommand;
use habitquest_core::HabitStore;

#[derive(Subcommand)]
pub enum PlayerAction {
    /// Print the player display name
    Show,
    /// Set the player display name
    SetName { name: String },
}

pub fn run(action: PlayerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = HabitStore::open()?;
    match action {
        PlayerAction::Show => {
            println!(
                "{}",
                serde_json::json!({ "player_name": store.player_name() })
            );
        }
        PlayerAction::SetName { name } => {
            let event = store.set_player_name(&name)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
