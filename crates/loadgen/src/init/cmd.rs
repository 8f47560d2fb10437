use anyhow::Result;

use crate::{
    cmd::{Args, Config, ConfigError},
    init::logger,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() -> Result<Config> {
    let (mut args, _reminder) = Args::parse()?;
    logger::init(
        &args.log_level.take().unwrap_or_default(),
        args.colored.unwrap_or(false),
    )?;
    log::debug!("{:?}, {:?}", args, _reminder);

    #[cfg(feature = "help")]
    if args.help.is_some_and(|h| h) {
        let help = Args::help();
        println!("version: {VERSION}\r\n{help}");
        std::process::exit(0);
    }

    match load(&mut args) {
        Ok(config) => Ok(config),
        Err(Startup::Exit { code, message }) => {
            println!("{message}");
            std::process::exit(code);
        }
        Err(Startup::Fatal(err)) => Err(err.into()),
    }
}

/// Why startup stopped before the scheduler ran.
#[derive(Debug)]
pub enum Startup {
    /// Print `message` and leave with `code`.
    Exit { code: i32, message: String },
    Fatal(ConfigError),
}

pub fn load(args: &mut Args) -> Result<Config, Startup> {
    let config = Config::from_args(args).map_err(|err| match err.exit_code() {
        Some(code) => Startup::Exit {
            code,
            message: err.to_string(),
        },
        None => Startup::Fatal(err),
    })?;
    log::debug!("{:?}", config);
    Ok(config)
}
