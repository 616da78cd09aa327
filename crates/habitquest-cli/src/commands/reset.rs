use habitquest_core::storage::database::keys;
use habitquest_core::HabitStore;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("reset is irreversible; pass --yes to confirm".into());
    }

    let mut store = HabitStore::open()?;
    let event = store.reset_all()?;
    store.database().kv_delete(keys::ALARM_SCHEDULER)?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
