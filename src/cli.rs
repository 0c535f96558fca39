//! Argument parsing for the headless runner.

use anyhow::{anyhow, Result};

use crate::core::EngineConfig;
use crate::types::Candy;

/// What `candy-headless` should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessArgs {
    pub config: EngineConfig,
    /// Automatic moves to run
    pub auto: u32,
    /// Fire a color-bomb; the inner value is an explicit target
    pub bomb: Option<Option<Candy>>,
    pub pretty: bool,
}

impl HeadlessArgs {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            auto: 0,
            bomb: None,
            pretty: false,
        }
    }
}

/// Parse `--seed N --size N --palette K --auto M --bomb [CANDY] --pretty`.
///
/// Flags override `base`, which usually comes from the environment.
pub fn parse_headless_args(args: &[String], base: EngineConfig) -> Result<HeadlessArgs> {
    let mut out = HeadlessArgs::new(base);
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                out.config.seed = Some(value(args, &mut i, "--seed")?);
            }
            "--size" => {
                out.config.size = value(args, &mut i, "--size")?;
            }
            "--palette" => {
                out.config.palette_size = value(args, &mut i, "--palette")?;
            }
            "--moves" => {
                out.config.moves = value(args, &mut i, "--moves")?;
            }
            "--auto" => {
                out.auto = value(args, &mut i, "--auto")?;
            }
            "--bomb" => {
                // Optional target: only consumed if it names a candy.
                let target = args.get(i + 1).and_then(|s| Candy::from_str(s));
                if target.is_some() {
                    i += 1;
                }
                out.bomb = Some(target);
            }
            "--pretty" => out.pretty = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    out.config
        .validate()
        .map_err(|e| anyhow!("{e}"))?;
    Ok(out)
}

fn value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    *i += 1;
    let raw = args
        .get(*i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
    raw.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, raw))
}
