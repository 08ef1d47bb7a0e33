//! Status command - shows backend reachability and session state.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also show session settings
    #[arg(short, long)]
    pub detailed: bool,
}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    reachable: bool,
    version: Option<String>,
    server_url: String,
    logged_in: bool,
}

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let server_url = ctx.client.base_url().to_string();
    let logged_in = !ctx.client.token_store().credentials().is_empty();
    let health = ctx.client.health().check().await;

    if ctx.json_output {
        let output = StatusOutput {
            reachable: health.is_ok(),
            version: health.as_ref().ok().and_then(|h| h.version.clone()),
            server_url,
            logged_in,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();

    println!();
    println!("{}", style("Folio Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();

    match &health {
        Ok(health) => {
            println!(
                "  {} {}",
                dim.apply_to("Backend:"),
                Style::new().green().apply_to(format!("● {}", health.status))
            );
            if let Some(version) = &health.version {
                println!("  {} {}", dim.apply_to("Version:"), version);
            }
        }
        Err(e) => {
            println!(
                "  {} {}",
                dim.apply_to("Backend:"),
                Style::new().red().apply_to("● unreachable")
            );
            if ctx.verbose {
                println!("  {} {}", dim.apply_to("Error:"), e);
            }
        }
    }
    println!("  {} {}", dim.apply_to("Server:"), server_url);
    println!(
        "  {} {}",
        dim.apply_to("Session:"),
        if logged_in { "logged in" } else { "not logged in" }
    );

    if args.detailed {
        let session = &ctx.config.session;
        println!();
        println!("{}", dim.apply_to("─".repeat(40)));
        println!();
        println!("  {} {}", dim.apply_to("Login route:"), session.login_route());
        println!(
            "  {} {}s",
            dim.apply_to("Refresh cooldown:"),
            session.refresh_cooldown().as_secs()
        );
        println!(
            "  {} {}",
            dim.apply_to("Public endpoints:"),
            ctx.client
                .public_endpoints()
                .fragments()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!();
    Ok(())
}
