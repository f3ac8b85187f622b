//! 離線管理工具：對單張地圖的重生點設定執行一個管理指令
//!
//! ```text
//! retakes-admin [--module-dir <dir>] [--config <file>] <map> <command> [args...]
//! ```

mod constants;

use anyhow::{bail, Context, Result};
use constants::{CONFIG_FILE_NAME, DEFAULT_MODULE_DIRECTORY, MESSAGE_PREFIX};
use retakes_core::commands::{self, CommandContext};
use retakes_core::{RetakesConfig, RoundState, SpawnIndex, SpawnStore};
use std::path::PathBuf;

struct Args {
    module_directory: PathBuf,
    config_path: Option<PathBuf>,
    map_name: String,
    command: Vec<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut module_directory = PathBuf::from(DEFAULT_MODULE_DIRECTORY);
    let mut config_path = None;
    let mut positional = Vec::new();

    while let Some(arg) = raw.next() {
        // 指令名稱之後的參數全部原樣傳給指令
        if positional.len() >= 2 {
            positional.push(arg);
            continue;
        }
        match arg.as_str() {
            "--module-dir" => {
                module_directory = raw
                    .next()
                    .map(PathBuf::from)
                    .context("--module-dir needs a value")?;
            }
            "--config" => {
                config_path = Some(
                    raw.next()
                        .map(PathBuf::from)
                        .context("--config needs a value")?,
                );
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() < 2 {
        bail!(
            "usage: retakes-admin [--module-dir <dir>] [--config <file>] <map> <command> [args...]"
        );
    }

    let map_name = positional.remove(0);
    Ok(Args {
        module_directory,
        config_path,
        map_name,
        command: positional,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(|| args.module_directory.join(CONFIG_FILE_NAME));
    let config = RetakesConfig::load_or_default(&config_path);

    let mut store = SpawnStore::open(
        config.map_config_path(&args.module_directory),
        &args.map_name,
    );
    let mut index = SpawnIndex::from_store(&store)
        .with_context(|| format!("Map config for {} could not be loaded", args.map_name))?;
    let round_state_path = config.round_state_path(&args.module_directory);
    let mut round = RoundState::load_persisted(&round_state_path);
    let forced_before = round.forced_bombsite;
    log::debug!("Loaded {} spawns for {}", index.len(), args.map_name);

    let mut ctx = CommandContext {
        store: &mut store,
        index: &mut index,
        round: &mut round,
        config: &config,
    };
    let command: Vec<&str> = args.command.iter().map(String::as_str).collect();
    let replies = commands::dispatch(&mut ctx, &command)
        .with_context(|| format!("Command '{}' failed", command.join(" ")))?;

    // 強制包點跨指令保留，下一次執行時生效
    if round.forced_bombsite != forced_before && !round.persist(&round_state_path) {
        bail!("Failed to save round state to {}", round_state_path.display());
    }

    for reply in replies {
        println!("{MESSAGE_PREFIX}{reply}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args> {
        parse_args(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&[
            "--module-dir",
            "/srv/retakes",
            "de_inferno",
            "setspawngroup",
            "3",
            "Long",
            "A",
        ])
        .unwrap();

        assert_eq!(parsed.module_directory, PathBuf::from("/srv/retakes"));
        assert_eq!(parsed.map_name, "de_inferno");
        assert_eq!(parsed.command, vec!["setspawngroup", "3", "Long", "A"]);
        assert!(parsed.config_path.is_none());
    }

    #[test]
    fn test_flags_after_command_are_passed_through() {
        let parsed = args(&["de_nuke", "addgroup", "--config"]).unwrap();

        assert_eq!(parsed.command, vec!["addgroup", "--config"]);
    }

    #[test]
    fn test_missing_command_is_rejected() {
        assert!(args(&["de_nuke"]).is_err());
        assert!(args(&["--config"]).is_err());
    }
}
