use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use waclip_config::Settings;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings, defaults included
    Show(ShowArgs),
    /// Print the settings file location
    Path(PathArgs),
    /// Change one setting and save the file
    Set(SetArgs),
    /// Restore the default values, keeping unknown keys
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {}

#[derive(Debug, Args)]
pub struct PathArgs {}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Args)]
pub struct ResetArgs {}

pub fn show(ctx: &Context<'_>, _args: ShowArgs) -> Result<()> {
    let settings = ctx.settings()?;
    print_json(&settings.to_value()?)
}

pub fn path(ctx: &Context<'_>, _args: PathArgs) -> Result<()> {
    if ctx.json {
        return print_json(&serde_json::json!({
            "path": ctx.config_path.display().to_string(),
            "exists": ctx.config_path.exists(),
        }));
    }
    println!("{}", ctx.config_path.display());
    Ok(())
}

pub fn set(ctx: &Context<'_>, args: SetArgs) -> Result<()> {
    let mut settings = ctx.settings()?;
    settings
        .set_value(&args.key, &args.value)
        .with_context(|| format!("set {}", args.key))?;
    ctx.save_settings(&settings)?;

    if ctx.json {
        let value = settings.to_value()?;
        return print_json(&serde_json::json!({
            "key": args.key,
            "value": value.get(&args.key),
        }));
    }
    println!("{} updated", args.key);
    Ok(())
}

pub fn reset(ctx: &Context<'_>, _args: ResetArgs) -> Result<()> {
    let current = ctx.settings()?;
    let settings = Settings {
        extra: current.extra,
        ..Settings::default()
    };
    ctx.save_settings(&settings)?;

    if ctx.json {
        return print_json(&settings.to_value()?);
    }
    println!("settings reset to defaults");
    Ok(())
}
