//! Journals command - browse and submit articles.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use folio_client::{Id, Journal, ListJournalsQuery, ListJournalsResponse, SubmitJournalRequest};

use super::Context;

/// Arguments for the journals command.
#[derive(Args, Debug)]
pub struct JournalsArgs {
    #[command(subcommand)]
    pub command: JournalsCommand,
}

#[derive(Subcommand, Debug)]
pub enum JournalsCommand {
    /// List published journals (no login required)
    Public {
        /// Full-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by tag
        #[arg(long)]
        tag: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List your submissions
    Mine,

    /// Show one journal
    Get {
        /// Journal ID
        id: String,
    },

    /// Submit an article for review
    Submit {
        /// Article title
        #[arg(long)]
        title: String,

        /// Article abstract
        #[arg(long = "abstract")]
        abstract_text: String,

        /// Category ID
        #[arg(long)]
        category: Option<i64>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

/// Run the journals command.
pub async fn run(args: JournalsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        JournalsCommand::Public {
            search,
            category,
            tag,
            page,
            limit,
        } => {
            let query = ListJournalsQuery {
                search,
                category,
                tag,
                page,
                limit,
            };
            let response = ctx.client.journals().list_public(query).await?;
            print_list(ctx, "Published Journals", &response)
        }
        JournalsCommand::Mine => {
            let response = ctx.client.journals().my_journals().await?;
            print_list(ctx, "My Submissions", &response)
        }
        JournalsCommand::Get { id } => {
            let journal = ctx.client.journals().get(&id).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&journal)?);
            } else {
                print_detail(&journal);
            }
            Ok(())
        }
        JournalsCommand::Submit {
            title,
            abstract_text,
            category,
            tags,
        } => {
            let request = SubmitJournalRequest {
                title,
                abstract_text,
                category_id: category.map(Id::Number),
                tags,
            };
            let journal = ctx.client.journals().submit(request).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&journal)?);
            } else {
                println!(
                    "{} submitted \"{}\" (id {})",
                    Style::new().green().apply_to("✓"),
                    journal.title,
                    journal.id
                );
            }
            Ok(())
        }
    }
}

fn print_list(ctx: &Context, heading: &str, response: &ListJournalsResponse) -> Result<()> {
    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    let dim = Style::new().dim();

    println!();
    println!("{}", style(heading).bold());
    println!("{}", dim.apply_to("─".repeat(40)));

    if response.journals.is_empty() {
        println!();
        println!("  {}", dim.apply_to("No journals found."));
        println!();
        return Ok(());
    }

    println!();
    for journal in &response.journals {
        let status = journal
            .status
            .as_deref()
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            dim.apply_to(format!("{:>6}", journal.id.to_string())),
            journal.title,
            dim.apply_to(status)
        );
    }

    if let Some(total) = response.total {
        println!();
        println!(
            "  {}",
            dim.apply_to(format!(
                "{} of {} (page {})",
                response.journals.len(),
                total,
                response.page.unwrap_or(1)
            ))
        );
    }
    println!();
    Ok(())
}

fn print_detail(journal: &Journal) {
    let dim = Style::new().dim();

    println!();
    println!("{}", style(&journal.title).bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("ID:"), journal.id);
    if let Some(status) = &journal.status {
        println!("  {} {}", dim.apply_to("Status:"), status);
    }
    if !journal.authors.is_empty() {
        println!("  {} {}", dim.apply_to("Authors:"), journal.authors.join(", "));
    }
    if let Some(category) = &journal.category {
        println!("  {} {}", dim.apply_to("Category:"), category);
    }
    if !journal.tags.is_empty() {
        println!("  {} {}", dim.apply_to("Tags:"), journal.tags.join(", "));
    }
    if let Some(abstract_text) = &journal.abstract_text {
        println!();
        println!("{}", abstract_text);
    }
    println!();
}
