//! Request command - send an arbitrary call through the session pipeline.

use anyhow::{Context as _, Result, bail};
use clap::Args;
use console::Style;
use folio_client::RequestDescriptor;
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};

use super::Context;

/// Arguments for the request command.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...)
    pub method: String,

    /// Path relative to the API base URL, e.g. /journals/my-journals
    pub path: String,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Extra header as NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,
}

/// Run the request command.
pub async fn run(args: RequestArgs, ctx: &Context) -> Result<()> {
    let descriptor = build_descriptor(&args)?;
    let response = ctx.client.send(descriptor).await?;

    if !ctx.json_output {
        let status = response.status();
        eprintln!("{}", Style::new().green().apply_to(status.to_string()));
    }

    match response.json::<serde_json::Value>() {
        Ok(serde_json::Value::Null) => {}
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.text()),
    }

    Ok(())
}

fn build_descriptor(args: &RequestArgs) -> Result<RequestDescriptor> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", args.method))?;

    let path = if args.path.starts_with('/') {
        args.path.clone()
    } else {
        format!("/{}", args.path)
    };

    let mut descriptor = RequestDescriptor::new(method, path);

    for header in &args.headers {
        let Some((name, value)) = header.split_once(':') else {
            bail!("Header must be NAME:VALUE, got '{}'", header);
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name: {}", name))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid header value for {}", name))?;
        descriptor = descriptor.header(name, value);
    }

    if let Some(data) = &args.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data must be valid JSON")?;
        descriptor = descriptor.json(&body)?;
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: &str, path: &str) -> RequestArgs {
        RequestArgs {
            method: method.to_string(),
            path: path.to_string(),
            data: None,
            headers: Vec::new(),
        }
    }

    #[test]
    fn test_build_descriptor_normalizes_method_and_path() {
        let descriptor = build_descriptor(&args("post", "journals")).unwrap();
        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.path, "/journals");
    }

    #[test]
    fn test_build_descriptor_with_body_and_header() {
        let mut a = args("PUT", "/journals/7");
        a.data = Some(r#"{"title":"Revised"}"#.to_string());
        a.headers = vec!["X-Trace: abc".to_string()];

        let descriptor = build_descriptor(&a).unwrap();
        assert_eq!(descriptor.body, Some(serde_json::json!({"title": "Revised"})));
        assert_eq!(descriptor.headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_build_descriptor_rejects_bad_input() {
        let mut a = args("GET", "/journals");
        a.data = Some("{not json".to_string());
        assert!(build_descriptor(&a).is_err());

        let mut a = args("GET", "/journals");
        a.headers = vec!["no-colon".to_string()];
        assert!(build_descriptor(&a).is_err());
    }
}
