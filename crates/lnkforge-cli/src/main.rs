//! lnkforge - create Windows shortcuts, elevating only when the destination
//! needs it.
//!
//! The same binary doubles as the elevated helper: the generated elevation
//! script re-invokes it with the hidden `apply-elevated` sub-command.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lnkforge::config::CliExitCode;
use lnkforge::{
    CreateError, CreateOutcome, LocationChoice, QuickPreset, ShortcutEngine, ShortcutSpec,
    WindowMode,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lnkforge")]
#[command(about = "Create shortcuts, with elevation where the destination needs it")]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Do not ask the search indexer to refresh after creating a shortcut
    #[arg(long, global = true)]
    no_index_refresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a shortcut
    Create {
        /// Shortcut name (".lnk" is appended when missing)
        #[arg(short, long)]
        name: String,

        /// Path of the program or file the shortcut opens
        #[arg(short, long)]
        target: PathBuf,

        /// Arguments passed to the target
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        args: String,

        /// Working directory (defaults to the target's folder)
        #[arg(long)]
        start_in: Option<PathBuf>,

        /// Where to put the shortcut
        #[arg(short, long, value_enum, default_value_t = Location::Desktop)]
        location: Location,

        /// Destination folder for `--location custom`
        #[arg(long)]
        dir: Option<PathBuf>,

        /// How the target's window opens
        #[arg(short, long, value_enum, default_value_t = Window::Normal)]
        window: Window,

        /// Mark the shortcut "run as administrator"
        #[arg(long)]
        run_as_admin: bool,

        /// Request elevation when the destination needs it
        #[arg(long)]
        elevate: bool,
    },

    /// Create a Start Menu shortcut for a file in one step
    Quick {
        /// The file the shortcut opens
        file: PathBuf,

        /// Use the all-users Start Menu
        #[arg(long)]
        all_users: bool,

        /// Request elevation when the destination needs it
        #[arg(long)]
        elevate: bool,
    },

    /// Report whether a location needs elevation
    Check {
        #[arg(short, long, value_enum)]
        location: Location,

        /// Folder for `--location custom`
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Run an encoded request with the current rights
    #[command(hide = true)]
    ApplyElevated { payload: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Location {
    StartMenu,
    StartMenuAllUsers,
    Startup,
    StartupAllUsers,
    Desktop,
    DesktopAllUsers,
    Custom,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Window {
    Normal,
    Minimized,
    Maximized,
}

impl From<Window> for WindowMode {
    fn from(window: Window) -> Self {
        match window {
            Window::Normal => WindowMode::Normal,
            Window::Minimized => WindowMode::Minimized,
            Window::Maximized => WindowMode::Maximized,
        }
    }
}

fn location_choice(location: Location, dir: Option<PathBuf>) -> LocationChoice {
    match location {
        Location::StartMenu => LocationChoice::StartMenuUser,
        Location::StartMenuAllUsers => LocationChoice::StartMenuAllUsers,
        Location::Startup => LocationChoice::StartupUser,
        Location::StartupAllUsers => LocationChoice::StartupAllUsers,
        Location::Desktop => LocationChoice::DesktopUser,
        Location::DesktopAllUsers => LocationChoice::DesktopAllUsers,
        // A missing folder is reported by the engine as "no destination".
        Location::Custom => LocationChoice::Custom(dir.unwrap_or_default()),
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let engine = ShortcutEngine::builder()
        .refresh_search_index(!args.no_index_refresh)
        .build()?;

    let code = match args.command {
        Command::Create {
            name,
            target,
            args: arguments,
            start_in,
            location,
            dir,
            window,
            run_as_admin,
            elevate,
        } => {
            let working_directory = start_in
                .or_else(|| target.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            let spec = ShortcutSpec::new(
                name,
                target.to_string_lossy(),
                location_choice(location, dir),
            )
            .with_arguments(arguments)
            .with_working_directory(working_directory.to_string_lossy())
            .with_window_mode(window.into())
            .with_elevate_on_launch(run_as_admin);
            create(&engine, &spec, elevate)
        }
        Command::Quick {
            file,
            all_users,
            elevate,
        } => {
            let preset = if all_users {
                QuickPreset::AllUsers
            } else {
                QuickPreset::JustMe
            };
            match preset.spec_for(&file) {
                Ok(spec) => create(&engine, &spec, elevate),
                Err(e) => {
                    error!("{}", e);
                    CreateError::from(e).exit_code()
                }
            }
        }
        Command::Check { location, dir } => {
            let choice = location_choice(location, dir);
            match engine.requires_elevation(&choice) {
                Ok(required) => {
                    println!("platform: {}", lnkforge::platform::current_platform());
                    println!("location: {}", choice);
                    println!("requires elevation: {}", required);
                    println!("process elevated: {}", engine.is_process_elevated());
                    CliExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    CreateError::from(e).exit_code()
                }
            }
        }
        Command::ApplyElevated { payload } => engine.run_elevated_request(&payload),
    };

    Ok(exit_code(code))
}

/// Create `spec`, going through the elevated helper when allowed and needed.
fn create(engine: &ShortcutEngine, spec: &ShortcutSpec, elevate: bool) -> i32 {
    match engine.create_shortcut(spec) {
        Ok(CreateOutcome::Created { path }) => {
            println!("{}", path.display());
            CliExitCode::SUCCESS
        }
        Ok(CreateOutcome::CreatedWithoutElevateFlag { path, reason }) => {
            warn!(
                "Shortcut works, but \"Run as administrator\" must be set manually: {}",
                reason
            );
            println!("{}", path.display());
            CliExitCode::SUCCESS
        }
        Err(CreateError::ElevationRequired { directory }) if elevate => {
            info!(
                "{} needs administrator rights; requesting elevation",
                directory.display()
            );
            match engine.create_shortcut_elevated(spec) {
                Ok(()) => {
                    if let Ok(path) = engine.destination_file(spec) {
                        println!("{}", path.display());
                    }
                    CliExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    e.exit_code()
                }
            }
        }
        Err(e @ CreateError::ElevationRequired { .. }) => {
            error!("{} (rerun with --elevate)", e);
            e.exit_code()
        }
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(CliExitCode::FAILURE as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lnkforge::config::ElevationConfig;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_helper_subcommand_name_matches_library() {
        let args = Args::try_parse_from(["lnkforge", "apply-elevated", "00ff"]).unwrap();
        assert!(matches!(args.command, Command::ApplyElevated { payload } if payload == "00ff"));
        assert_eq!(ElevationConfig::HELPER_SUBCOMMAND, "apply-elevated");
    }

    #[test]
    fn test_helper_accepts_no_index_refresh_flag() {
        let args = Args::try_parse_from([
            "lnkforge",
            ElevationConfig::NO_INDEX_REFRESH_FLAG,
            ElevationConfig::HELPER_SUBCOMMAND,
            "00ff",
        ])
        .unwrap();
        assert!(args.no_index_refresh);
        assert!(matches!(args.command, Command::ApplyElevated { .. }));
    }

    #[test]
    fn test_custom_without_dir_maps_to_empty_path() {
        assert_eq!(
            location_choice(Location::Custom, None),
            LocationChoice::Custom(PathBuf::new())
        );
        assert_eq!(
            location_choice(Location::StartupAllUsers, None),
            LocationChoice::StartupAllUsers
        );
    }

    #[test]
    fn test_create_arguments() {
        let args = Args::try_parse_from([
            "lnkforge",
            "create",
            "--name",
            "Notepad",
            "--target",
            r"C:\Windows\notepad.exe",
            "--args",
            "-x",
            "--location",
            "desktop-all-users",
            "--window",
            "maximized",
            "--run-as-admin",
        ])
        .unwrap();

        match args.command {
            Command::Create {
                args,
                location,
                window,
                run_as_admin,
                elevate,
                ..
            } => {
                assert_eq!(args, "-x");
                assert!(matches!(location, Location::DesktopAllUsers));
                assert!(matches!(window, Window::Maximized));
                assert!(run_as_admin);
                assert!(!elevate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
