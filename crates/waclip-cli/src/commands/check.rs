use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{read_input, yes_no};
use anyhow::Result;
use clap::Args;
use waclip_core::{ChatLinks, PatternSet};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Text to inspect; read from stdin when omitted or `-`
    pub text: Option<String>,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    pub text: Option<String>,
    /// Message to pre-fill instead of the saved default
    #[arg(long, short)]
    pub message: Option<String>,
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let text = read_input(args.text)?;
    let report = PatternSet::default_set().report(&text);

    if ctx.json {
        return print_json(&report);
    }

    println!("contains number: {}", yes_no(report.contains_number));
    println!("number only: {}", yes_no(report.number_only));
    match &report.number {
        Some(number) => println!("number: {number}"),
        None => println!("number: -"),
    }
    Ok(())
}

pub fn link(ctx: &Context<'_>, args: LinkArgs) -> Result<()> {
    let text = read_input(args.text)?;
    let number = PatternSet::default_set()
        .extract_phone_number(&text)
        .ok_or_else(|| not_found("no phone number in text"))?;
    let message = args
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| ctx.settings_or_default().default_message);
    let links = ChatLinks::new(&number, &message)?;

    if ctx.json {
        return print_json(&links);
    }

    println!("number: {}", links.number);
    println!("web: {}", links.web);
    println!("app: {}", links.app);
    Ok(())
}
