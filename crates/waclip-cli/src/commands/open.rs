use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::read_input;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use waclip_core::PatternSet;
use waclip_monitor::{open_chat, Activity, ActivityLine, OpenKind, OpenOptions, SystemLauncher};

#[derive(Debug, Args)]
pub struct OpenArgs {
    pub text: Option<String>,
    #[arg(long, short)]
    pub message: Option<String>,
    /// Try the desktop app before the web link
    #[arg(long)]
    pub app: bool,
    /// Print the link instead of opening it
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Debug, Serialize)]
struct OpenDto {
    number: String,
    target: String,
    opened_with: &'static str,
}

pub fn open(ctx: &Context<'_>, args: OpenArgs) -> Result<()> {
    let text = read_input(args.text)?;
    let number = PatternSet::default_set()
        .extract_phone_number(&text)
        .ok_or_else(|| not_found("no phone number in text"))?;

    let settings = ctx.settings_or_default();
    let message = args
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| settings.default_message.clone());
    let mut options = OpenOptions::from(&settings);
    options.use_app |= args.app;
    if args.no_open {
        options.auto_open = false;
    }

    let json = ctx.json;
    let mut report = |activity: Activity| {
        activity.trace();
        if !json {
            println!("{}", ActivityLine::now(activity));
        }
    };
    let outcome = open_chat(&SystemLauncher, &number, &message, options, &mut report)?;

    if json {
        return print_json(&OpenDto {
            number: outcome.number,
            target: outcome.target,
            opened_with: match outcome.kind {
                OpenKind::App => "app",
                OpenKind::Browser => "browser",
                OpenKind::Surfaced => "none",
            },
        });
    }
    Ok(())
}
