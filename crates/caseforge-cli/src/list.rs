//! List command - print the known phone models

use anyhow::Result;

use crate::config::Settings;

/// Execute the list command
pub fn execute(settings: &Settings) -> Result<()> {
    print!("{}", render(settings));
    Ok(())
}

fn render(settings: &Settings) -> String {
    let width = settings
        .catalog
        .ids()
        .map(str::len)
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for spec in settings.catalog.iter() {
        out.push_str(&format!(
            "{:<width$}  {:<20}  {}\n",
            spec.id,
            spec.name,
            spec.dimensions_summary(),
        ));
    }
    out
}
