//! Auth command - session management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use folio_client::{RegisterRequest, TokenKind};
use serde::Serialize;

use super::{Context, mask};

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the stored session
    Status,

    /// Renew the session now
    Refresh,

    /// Log out and clear stored tokens
    Logout,
}

/// Session status for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    token_file: Option<String>,
    access_token: bool,
    refresh_token: bool,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { email, password } => cmd_login(ctx, email, password).await,
        AuthCommand::Register {
            name,
            email,
            password,
        } => cmd_register(ctx, name, email, password).await,
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Refresh => cmd_refresh(ctx).await,
        AuthCommand::Logout => cmd_logout(ctx).await,
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

async fn cmd_login(ctx: &Context, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;

    // The CLI is "on the login page" for the duration of this command
    ctx.client.set_current_route(ctx.client.login_route());

    let response = ctx.client.auth().login(email, password).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&response.user)?);
        return Ok(());
    }

    let green = Style::new().green();
    match &response.user {
        Some(user) => println!(
            "{} logged in as {} <{}>",
            green.apply_to("✓"),
            user.name,
            user.email
        ),
        None => println!("{} logged in", green.apply_to("✓")),
    }

    if ctx.client.token_store().get(TokenKind::Access).is_none() {
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to("Warning: the server did not return an access token.")
        );
    }

    Ok(())
}

async fn cmd_register(
    ctx: &Context,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    ctx.client.set_current_route(ctx.client.login_route());

    let response = ctx
        .client
        .auth()
        .register(RegisterRequest {
            name,
            email,
            password,
        })
        .await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&response.user)?);
    } else {
        println!(
            "{} account created{}",
            Style::new().green().apply_to("✓"),
            response
                .message
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );
    }

    Ok(())
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let credentials = ctx.client.token_store().credentials();

    if ctx.json_output {
        let output = StatusOutput {
            token_file: ctx.token_file.as_ref().map(|p| p.display().to_string()),
            access_token: credentials.access_token.is_some(),
            refresh_token: credentials.refresh_token.is_some(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();

    println!();
    println!("{}", style("Folio Session").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();

    let show = |label: &str, value: Option<&String>| match value {
        Some(token) => println!("  {} {}", dim.apply_to(label), mask(token)),
        None => println!("  {} {}", dim.apply_to(label), dim.apply_to("not set")),
    };
    show("Access token: ", credentials.access_token.as_ref());
    show("Refresh token:", credentials.refresh_token.as_ref());

    if let Some(path) = &ctx.token_file {
        println!("  {} {}", dim.apply_to("Token file:   "), path.display());
    }

    if credentials.is_empty() {
        println!();
        println!("  {}", dim.apply_to("Log in with: folio auth login --email <email>"));
    }
    println!();

    Ok(())
}

async fn cmd_refresh(ctx: &Context) -> Result<()> {
    match ctx.client.auth().refresh().await? {
        Some(_) => println!("Session renewed."),
        None => println!("Nothing to renew. Run 'folio auth login' first."),
    }
    Ok(())
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    if ctx.client.token_store().credentials().is_empty() {
        println!("No stored session.");
        return Ok(());
    }

    ctx.client.auth().logout().await?;
    println!("Logged out. Stored tokens removed.");
    Ok(())
}
