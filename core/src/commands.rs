//! 管理指令
//!
//! 指令以靜態表 [`COMMANDS`] 註冊：名稱、別名、最少參數數與處理函式。
//! 所有修改設定檔的指令都會重建 [`SpawnIndex`]

use crate::config::RetakesConfig;
use crate::error::{AllocationError, CommandError, CommandResult};
use crate::group::GroupResolver;
use crate::index::SpawnIndex;
use crate::random::ThreadRandom;
use crate::roster::{PlayerTeam, StaticPlayer};
use crate::round::RoundState;
use crate::spawn::{Bombsite, PlayerId, QAngle, Spawn, SpawnFilter, SpawnId, Team, Vector3};
use crate::store::{list_map_configs, SpawnStore};

/// 指令執行時可存取的狀態
pub struct CommandContext<'a> {
    pub store: &'a mut SpawnStore,
    pub index: &'a mut SpawnIndex,
    pub round: &'a mut RoundState,
    pub config: &'a RetakesConfig,
}

type Handler = fn(&mut CommandContext<'_>, &[&str]) -> CommandResult<Vec<String>>;

pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub min_args: usize,
    pub usage: &'static str,
    pub description: &'static str,
    handler: Handler,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| *alias == name)
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        aliases: &[],
        min_args: 0,
        usage: "",
        description: "Lists the available commands.",
        handler: help,
    },
    CommandSpec {
        name: "listspawns",
        aliases: &[],
        min_args: 0,
        usage: "[A/B] [T/CT] [group]",
        description: "Lists spawns with IDs and groups.",
        handler: list_spawns,
    },
    CommandSpec {
        name: "addspawn",
        aliases: &["add", "new", "newspawn"],
        min_args: 5,
        usage: "<A/B> <T/CT> <x> <y> <z> [pitch yaw roll] [Y/N can be planter]",
        description: "Creates a new retakes spawn.",
        handler: add_spawn,
    },
    CommandSpec {
        name: "removespawn",
        aliases: &["remove", "delete", "deletespawn"],
        min_args: 1,
        usage: "<id>",
        description: "Deletes a retakes spawn by Id.",
        handler: remove_spawn,
    },
    CommandSpec {
        name: "nearestspawn",
        aliases: &["nearest"],
        min_args: 4,
        usage: "<A/B> <x> <y> <z>",
        description: "Finds the nearest retakes spawn.",
        handler: nearest_spawn,
    },
    CommandSpec {
        name: "setspawnname",
        aliases: &[],
        min_args: 1,
        usage: "<id> [name]",
        description: "Sets or clears the name of a spawn by Id.",
        handler: set_spawn_name,
    },
    CommandSpec {
        name: "setspawngroup",
        aliases: &[],
        min_args: 2,
        usage: "<id> <group>",
        description: "Sets group for a spawn by Id.",
        handler: set_spawn_group,
    },
    CommandSpec {
        name: "clearspawngroup",
        aliases: &[],
        min_args: 1,
        usage: "<id>",
        description: "Clears group for a spawn by Id.",
        handler: clear_spawn_group,
    },
    CommandSpec {
        name: "addgroup",
        aliases: &[],
        min_args: 1,
        usage: "<group>",
        description: "Creates a new spawn group for this map.",
        handler: add_group,
    },
    CommandSpec {
        name: "removegroup",
        aliases: &[],
        min_args: 1,
        usage: "<group>",
        description: "Deletes a spawn group and clears it from any spawns.",
        handler: remove_group,
    },
    CommandSpec {
        name: "listgroups",
        aliases: &[],
        min_args: 0,
        usage: "",
        description: "Lists all spawn groups for this map.",
        handler: list_groups,
    },
    CommandSpec {
        name: "forcebombsite",
        aliases: &[],
        min_args: 1,
        usage: "<A/B>",
        description: "Force the retakes to occur from a single bombsite.",
        handler: force_bombsite,
    },
    CommandSpec {
        name: "forcebombsitestop",
        aliases: &[],
        min_args: 0,
        usage: "",
        description: "Clear the forced bombsite and return back to normal.",
        handler: force_bombsite_stop,
    },
    CommandSpec {
        name: "listmapconfigs",
        aliases: &["mapconfigs", "viewmapconfigs"],
        min_args: 0,
        usage: "",
        description: "Displays a list of available map configs.",
        handler: list_map_configs_command,
    },
    CommandSpec {
        name: "simulateround",
        aliases: &["simulate"],
        min_args: 2,
        usage: "[A/B] <T count> <CT count>",
        description: "Dry-runs a round allocation with placeholder players.",
        handler: simulate_round,
    },
];

/// 依名稱或別名尋找指令（不分大小寫，可帶 `css_` 前綴）
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    let name = name.trim().to_ascii_lowercase();
    let name = name.strip_prefix("css_").unwrap_or(&name);
    COMMANDS.iter().find(|spec| spec.matches(name))
}

/// 執行已切分的指令，`args[0]` 為指令名稱
pub fn dispatch(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let Some((name, rest)) = args.split_first() else {
        return Err(CommandError::UnknownCommand(String::new()));
    };
    let spec = find_command(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

    if rest.len() < spec.min_args {
        return Err(usage(spec));
    }

    log::debug!("Running command {} {:?}", spec.name, rest);
    (spec.handler)(ctx, rest)
}

/// 以空白切分整行指令後執行
pub fn execute(ctx: &mut CommandContext<'_>, line: &str) -> CommandResult<Vec<String>> {
    let args: Vec<&str> = line.split_whitespace().collect();
    dispatch(ctx, &args)
}

fn usage(spec: &'static CommandSpec) -> CommandError {
    CommandError::Usage {
        name: spec.name,
        usage: spec.usage,
    }
}

fn usage_of(name: &str) -> CommandError {
    match find_command(name) {
        Some(spec) => usage(spec),
        None => CommandError::UnknownCommand(name.to_string()),
    }
}

fn parse_bombsite(arg: &str) -> CommandResult<Bombsite> {
    Bombsite::parse(arg).ok_or_else(|| {
        CommandError::InvalidArgument("You must specify a bombsite [A / B].".to_string())
    })
}

fn parse_team(arg: &str) -> CommandResult<Team> {
    Team::parse(arg).ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "You must specify a team [T / CT] - [Value: {arg}]."
        ))
    })
}

fn parse_id(arg: &str) -> CommandResult<SpawnId> {
    arg.parse()
        .map_err(|_| CommandError::InvalidArgument(format!("Invalid id: {arg}")))
}

fn parse_coord(arg: &str) -> CommandResult<f32> {
    arg.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument(format!("Invalid number: {arg}")))
}

fn parse_vector(args: &[&str]) -> CommandResult<Vector3> {
    Ok(Vector3::new(
        parse_coord(args[0])?,
        parse_coord(args[1])?,
        parse_coord(args[2])?,
    ))
}

fn parse_yes_no(arg: &str) -> CommandResult<bool> {
    match arg.to_ascii_uppercase().as_str() {
        "Y" => Ok(true),
        "N" => Ok(false),
        _ => Err(CommandError::InvalidArgument(format!(
            "Incorrect value passed for can be a planter [Y / N] - [Value: {arg}]."
        ))),
    }
}

/// 將剩餘參數以空白合併（支援含空白的名稱）
fn join_args(args: &[&str]) -> String {
    args.iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn refresh_index(ctx: &mut CommandContext<'_>) -> CommandResult<()> {
    ctx.index.rebuild(ctx.store)?;
    Ok(())
}

fn resolve_group(ctx: &CommandContext<'_>, input: &str) -> CommandResult<String> {
    let resolver = GroupResolver::new(ctx.store.groups()?);
    resolver
        .resolve_name(input)
        .map(str::to_string)
        .ok_or_else(|| CommandError::UnresolvedGroup(input.to_string()))
}

fn describe(spawn: &Spawn) -> String {
    format!(
        "Id={} Group={} Team={} Site={} Planter={} Vec={}",
        spawn.id,
        spawn.group.as_deref().unwrap_or("-"),
        spawn.team,
        spawn.bombsite,
        if spawn.can_be_planter { "Y" } else { "N" },
        spawn.position
    )
}

fn help(_ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandResult<Vec<String>> {
    Ok(COMMANDS
        .iter()
        .map(|spec| {
            let usage = if spec.usage.is_empty() {
                spec.name.to_string()
            } else {
                format!("{} {}", spec.name, spec.usage)
            };
            format!("{usage} - {}", spec.description)
        })
        .collect())
}

fn list_spawns(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let mut filter = SpawnFilter::default();
    if let Some(site) = args.first() {
        filter.bombsite = Some(parse_bombsite(site)?);
    }
    if let Some(team) = args.get(1) {
        filter.team = Some(parse_team(team)?);
    }
    if args.len() > 2 {
        let input = join_args(&args[2..]);
        let group = GroupResolver::new(ctx.store.groups()?)
            .resolve_name(&input)
            .map(str::to_string)
            .unwrap_or(input);
        filter.group = Some(group);
    }

    let spawns = filter.apply(ctx.store.spawns()?);
    if spawns.is_empty() {
        return Ok(vec!["No spawns found.".to_string()]);
    }

    let mut replies: Vec<String> = spawns.iter().map(describe).collect();
    replies.push(format!("{} spawns listed.", spawns.len()));
    Ok(replies)
}

fn add_spawn(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let bombsite = parse_bombsite(args[0])?;
    let team = parse_team(args[1])?;
    let position = parse_vector(&args[2..5])?;

    let (orientation, planter_arg) = match args.len() {
        5 => (QAngle::default(), None),
        6 => (QAngle::default(), Some(args[5])),
        8 | 9 => {
            let angles = parse_vector(&args[5..8])?;
            (QAngle::new(angles.x, angles.y, angles.z), args.get(8).copied())
        }
        _ => return Err(usage_of("addspawn")),
    };
    let can_be_planter = match planter_arg {
        Some(arg) => parse_yes_no(arg)?,
        None => false,
    };

    if let Some(closest) = ctx
        .index
        .nearest(bombsite, position, ctx.config.min_spawn_spacing)
    {
        return Err(CommandError::TooCloseToSpawn {
            distance: closest.position.distance_to(&position),
        });
    }

    let spawn = Spawn::new(position, orientation, team, bombsite)
        .with_planter(team == Team::Terrorist && can_be_planter);
    let id = ctx.store.add_spawn(spawn)?;
    refresh_index(ctx)?;

    Ok(vec![format!("Spawn added (Id={id}).")])
}

fn remove_spawn(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let id = parse_id(args[0])?;
    let removed = ctx.store.remove_spawn_by_id(id)?;
    refresh_index(ctx)?;

    Ok(vec![format!("Removed spawn {} (Id={}).", removed.label(), removed.id)])
}

fn nearest_spawn(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let bombsite = parse_bombsite(args[0])?;
    let position = parse_vector(&args[1..4])?;
    let radius = ctx.config.nearest_spawn_radius;

    match ctx.index.nearest(bombsite, position, radius) {
        Some(spawn) => Ok(vec![format!(
            "Nearest spawn: {} ({:.1} units away) {}",
            spawn.label(),
            spawn.position.distance_to(&position),
            describe(&spawn)
        )]),
        None => Ok(vec![format!("No spawns within {radius:.0} units.")]),
    }
}

fn set_spawn_name(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let id = parse_id(args[0])?;
    let name = join_args(&args[1..]);

    if name.is_empty() {
        ctx.store.set_spawn_name(id, None)?;
        refresh_index(ctx)?;
        return Ok(vec![format!("Cleared name on spawn Id={id}.")]);
    }

    ctx.store.set_spawn_name(id, Some(&name))?;
    refresh_index(ctx)?;
    Ok(vec![format!("Set name '{name}' on spawn Id={id}.")])
}

fn set_spawn_group(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let id = parse_id(args[0])?;
    let input = join_args(&args[1..]);
    if input.is_empty() {
        return Err(usage_of("setspawngroup"));
    }

    let group = resolve_group(ctx, &input)?;
    ctx.store.set_spawn_group(id, Some(&group))?;
    refresh_index(ctx)?;

    Ok(vec![format!("Set group '{group}' on spawn Id={id}.")])
}

fn clear_spawn_group(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let id = parse_id(args[0])?;
    ctx.store.set_spawn_group(id, None)?;
    refresh_index(ctx)?;

    Ok(vec![format!("Cleared group on spawn Id={id}.")])
}

fn add_group(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let name = ctx.store.add_group(&join_args(args))?;
    Ok(vec![format!("Created group '{name}'.")])
}

fn remove_group(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let input = join_args(args);
    if input.is_empty() {
        return Err(usage_of("removegroup"));
    }

    let group = resolve_group(ctx, &input)?;
    let cleared = ctx.store.remove_group(&group)?;
    refresh_index(ctx)?;

    Ok(vec![format!(
        "Removed group '{group}'. {cleared} spawns using it were cleared."
    )])
}

fn list_groups(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandResult<Vec<String>> {
    let groups = ctx.store.groups()?;
    if groups.is_empty() {
        return Ok(vec!["No groups exist yet.".to_string()]);
    }

    let count = groups.len();
    let mut replies = groups;
    replies.push(format!("{count} groups listed."));
    Ok(replies)
}

fn force_bombsite(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let bombsite = parse_bombsite(args[0])?;
    ctx.round.force_bombsite(Some(bombsite));
    Ok(vec![format!("The bombsite will now be forced to {bombsite}.")])
}

fn force_bombsite_stop(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandResult<Vec<String>> {
    ctx.round.force_bombsite(None);
    Ok(vec!["The bombsite will no longer be forced.".to_string()])
}

fn list_map_configs_command(
    ctx: &mut CommandContext<'_>,
    _args: &[&str],
) -> CommandResult<Vec<String>> {
    let maps = list_map_configs(ctx.store.directory());
    if maps.is_empty() {
        return Ok(vec!["No map configs found.".to_string()]);
    }

    let count = maps.len();
    let mut replies = maps;
    replies.push(format!("{count} map configs found."));
    Ok(replies)
}

fn simulate_round(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult<Vec<String>> {
    let mut rng = ThreadRandom;
    // 省略包點時依回合狀態決定（強制包點優先）
    let (bombsite, counts) = match args {
        [site, rest @ ..] if rest.len() >= 2 => (parse_bombsite(site)?, rest),
        _ => (ctx.round.pick_bombsite(&mut rng), args),
    };
    let parse_count = |arg: &str| {
        arg.parse::<usize>()
            .map_err(|_| CommandError::InvalidArgument(format!("Invalid player count: {arg}")))
    };
    let terrorists = parse_count(counts[0])?;
    let counter_terrorists = parse_count(counts[1])?;

    // 在建立名單前先檢查容量，人數因此不會超過重生點數量
    for (team, count) in [
        (Team::Terrorist, terrorists),
        (Team::CounterTerrorist, counter_terrorists),
    ] {
        let spawns = ctx.index.count(bombsite, team);
        if count > spawns {
            return Err(AllocationError::NotEnoughSpawns {
                bombsite,
                team,
                players: count,
                spawns,
            }
            .into());
        }
    }

    let players: Vec<StaticPlayer> = (1..=terrorists)
        .map(|id| StaticPlayer::alive(id as PlayerId, PlayerTeam::Terrorist))
        .chain((1..=counter_terrorists).map(|id| {
            StaticPlayer::alive((terrorists + id) as PlayerId, PlayerTeam::CounterTerrorist)
        }))
        .collect();

    let mut assignments: Vec<(PlayerId, Team, SpawnId)> = Vec::with_capacity(players.len());
    let planter_id = ctx.round.allocate(
        bombsite,
        ctx.index,
        &players,
        |_| None,
        &mut rng,
        |player, spawn| assignments.push((player.id, spawn.team, spawn.id)),
    )?;

    assignments.sort_by_key(|(player, _, _)| *player);
    let mut replies: Vec<String> = assignments
        .iter()
        .map(|(player, team, spawn)| {
            let marker = if Some(*player) == planter_id {
                " [planter]"
            } else {
                ""
            };
            format!("Player {player} ({team}) -> Spawn Id={spawn}{marker}")
        })
        .collect();
    replies.push(format!(
        "{} players placed at bombsite {bombsite}.",
        assignments.len()
    ));
    Ok(replies)
}
