use anyhow::Result;
use std::io::Write;

use promptforge_config::Config;
use promptforge_utils::exit_codes::ExitCode;

/// Execute the `config` command
pub fn execute_config_command(config: &Config, json: bool) -> Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();
    write_effective_config(config, json, &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn write_effective_config<W: Write>(
    config: &Config,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let effective = config.effective_config();

    if json {
        let map: serde_json::Map<String, serde_json::Value> = effective
            .into_iter()
            .map(|(key, (value, source))| {
                (
                    key,
                    serde_json::json!({ "value": value, "source": source }),
                )
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &map)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Effective configuration:")?;
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        writeln!(out, "  {key:<width$} = {value}  ({source})")?;
    }
    Ok(())
}
