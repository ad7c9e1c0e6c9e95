#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Geocoin Carrier experience.

mod save_transfer;
mod store;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use geocoin_core::{
    Command as WorldCommand, Direction, Event, GeoPosition, GridCoord, GridProjection,
};
use geocoin_rendering::{build_scene, MapScene, MapSurface, Viewport};
use geocoin_system_persistence::{self as persistence, Persistence, SaveGame};
use geocoin_world::{self as world, query, World, WorldConfig};
use glam::Vec2;
use store::FileStore;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the geocoin binary.
#[derive(Debug, Parser)]
#[command(name = "geocoin", about = "Geocoin Carrier terminal client")]
struct Args {
    /// Anchor latitude of the grid projection.
    #[arg(long, default_value_t = 36.98949379578401)]
    lat: f64,
    /// Anchor longitude of the grid projection.
    #[arg(long, default_value_t = -122.06277128548504)]
    lng: f64,
    /// Cell edge length in degrees.
    #[arg(long, default_value_t = geocoin_core::TILE_DEGREES)]
    tile_size: f64,
    /// Chebyshev radius of the visibility window in cells.
    #[arg(long, default_value_t = 8)]
    radius: u32,
    /// Probability that any given cell hosts a cache.
    #[arg(long, default_value_t = 0.1)]
    spawn_probability: f64,
    /// Upper bound on the coin count of a freshly spawned cache.
    #[arg(long, default_value_t = 10)]
    max_coins: u32,
    /// Directory holding the persisted game state.
    #[arg(long, default_value = ".geocoin")]
    save_dir: PathBuf,
}

/// Entry point for the Geocoin Carrier command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = WorldConfig::new(
        GridProjection::new(GeoPosition::new(args.lat, args.lng), args.tile_size),
        args.radius,
        args.spawn_probability,
        args.max_coins,
    );

    let mut store = FileStore::new(args.save_dir);
    let mut world = match persistence::load(&store) {
        Some(record) => {
            tracing::info!("restoring persisted game state");
            record.into_world(config)
        }
        None => World::new(config),
    };
    let mut persistence_system = Persistence::new();

    println!("{}", query::welcome_banner(&world));
    print_status(&world);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Some(Action::Apply(command)) => {
                let mut events = Vec::new();
                world::apply(&mut world, command, &mut events);
                persistence_system.handle(&events, &world, &mut store);
                report(&events);
            }
            Some(Action::Show) => show(&world)?,
            Some(Action::Wallet) => print_status(&world),
            Some(Action::Export) => {
                println!("{}", save_transfer::encode(&SaveGame::capture(&world)));
            }
            Some(Action::Import(blob)) => match save_transfer::decode(&blob) {
                Ok(record) => {
                    world = record.into_world(config);
                    if let Err(error) = persistence::persist(&world, &mut store) {
                        tracing::warn!(%error, "could not persist imported save");
                    }
                    print_status(&world);
                }
                Err(error) => eprintln!("import failed: {error}"),
            },
            Some(Action::Help) => print_help(),
            Some(Action::Quit) => break,
            None => {
                eprintln!("unrecognized command");
                print_help();
            }
        }
    }

    Ok(())
}

/// Actions the interactive loop can take in response to one input line.
#[derive(Debug, PartialEq)]
enum Action {
    /// Submit a command to the world.
    Apply(WorldCommand),
    /// Render the current scene as text.
    Show,
    /// Print the wallet status line.
    Wallet,
    /// Print the encoded save transfer string.
    Export,
    /// Replace the world with a decoded save transfer string.
    Import(String),
    /// Print the command reference.
    Help,
    /// Leave the interactive loop.
    Quit,
}

fn parse_line(line: &str) -> Option<Action> {
    let mut tokens = line.split_whitespace();
    match tokens.next()? {
        "n" | "north" => Some(Action::Apply(WorldCommand::MovePlayer {
            direction: Direction::North,
        })),
        "s" | "south" => Some(Action::Apply(WorldCommand::MovePlayer {
            direction: Direction::South,
        })),
        "e" | "east" => Some(Action::Apply(WorldCommand::MovePlayer {
            direction: Direction::East,
        })),
        "w" | "west" => Some(Action::Apply(WorldCommand::MovePlayer {
            direction: Direction::West,
        })),
        "pos" => {
            let lat = tokens.next()?.parse().ok()?;
            let lng = tokens.next()?.parse().ok()?;
            Some(Action::Apply(WorldCommand::SetPlayerPosition {
                position: GeoPosition::new(lat, lng),
            }))
        }
        "collect" => {
            let i = tokens.next()?.parse().ok()?;
            let j = tokens.next()?.parse().ok()?;
            Some(Action::Apply(WorldCommand::Collect {
                cell: GridCoord::new(i, j),
            }))
        }
        "deposit" => {
            let i = tokens.next()?.parse().ok()?;
            let j = tokens.next()?.parse().ok()?;
            let amount = tokens.next()?.parse().ok()?;
            Some(Action::Apply(WorldCommand::Deposit {
                cell: GridCoord::new(i, j),
                amount,
            }))
        }
        "reset" => Some(Action::Apply(WorldCommand::Reset)),
        "show" | "map" => Some(Action::Show),
        "wallet" | "status" => Some(Action::Wallet),
        "export" => Some(Action::Export),
        "import" => tokens.next().map(|blob| Action::Import(blob.to_owned())),
        "help" | "?" => Some(Action::Help),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

/// Text backend for the shared map surface contract.
struct TextSurface;

impl MapSurface for TextSurface {
    fn present(&mut self, scene: &MapScene) -> Result<()> {
        println!("{}", scene.status.text);
        println!(
            "Player at ({:.6}, {:.6})",
            scene.player.position.lat(),
            scene.player.position.lng()
        );
        for cache in &scene.caches {
            let buttons = match (cache.popup.can_collect, cache.popup.can_deposit) {
                (true, true) => "collect/deposit",
                (true, false) => "collect",
                (false, true) => "deposit",
                (false, false) => "-",
            };
            println!(
                "  {} | {} coin(s) [{}]",
                cache.popup.title,
                cache.popup.coin_labels.len(),
                buttons
            );
        }
        Ok(())
    }
}

fn show(world: &World) -> Result<()> {
    let viewport = Viewport::new(
        query::player_position(world),
        1_000_000.0,
        Vec2::new(800.0, 600.0),
    );
    let scene = build_scene(world, &viewport);
    TextSurface.present(&scene)
}

fn report(events: &[Event]) {
    let mut activated = 0usize;
    let mut deactivated = 0usize;

    for event in events {
        match event {
            Event::PlayerMoved { to, position, .. } => {
                println!(
                    "Now at cell {} ({:.6}, {:.6})",
                    to,
                    position.lat(),
                    position.lng()
                );
            }
            Event::CellActivated { .. } => activated += 1,
            Event::CellDeactivated { .. } => deactivated += 1,
            Event::CoinsCollected { cell, amount } => {
                println!("Collected {amount} coin(s) from cache {cell}");
            }
            Event::CoinsDeposited { cell, amount } => {
                println!("Deposited {amount} coin(s) into cache {cell}");
            }
            Event::WorldReset => println!("World reset."),
        }
    }

    if activated + deactivated > 0 {
        println!("{activated} cache(s) entered view, {deactivated} left view");
    }
}

fn print_status(world: &World) {
    let wallet = query::wallet(world);
    println!(
        "Points: {} | Coins: {} | Deposited: {} | Caches in view: {}",
        wallet.points,
        wallet.coins,
        wallet.total_deposited,
        query::active_cells(world).len()
    );
}

fn print_help() {
    println!("commands:");
    println!("  n/s/e/w             move one cell");
    println!("  pos <lat> <lng>     jump to a sensor position");
    println!("  collect <i> <j>     collect every coin from a cache");
    println!("  deposit <i> <j> <n> deposit up to n coins into a cache");
    println!("  show                render the visible caches");
    println!("  wallet              print the wallet status");
    println!("  export              print a save transfer string");
    println!("  import <blob>       load a save transfer string");
    println!("  reset               forget all caches and wallet progress");
    println!("  quit                leave the game");
}
