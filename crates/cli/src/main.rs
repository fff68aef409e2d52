use anyhow::{Context, bail};

use outpost_access::IdentityClaims;
use outpost_core::IdentityId;
use outpost_observability::LogConfig;
use outpost_session::{ContextResolver, InMemoryDirectory, ResolverConfig, Session};

const USAGE: &str = "usage: outpost-inspect <fixture.json> <identity-id> [hint]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_config = LogConfig::from_env()?;
    outpost_observability::init(&log_config);

    let mut args = std::env::args().skip(1);
    let (Some(fixture_path), Some(raw_id)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let hint = args.next();

    let identity_id: IdentityId = raw_id
        .parse()
        .with_context(|| format!("invalid identity id '{raw_id}'"))?;
    let fixture = std::fs::read_to_string(&fixture_path)
        .with_context(|| format!("failed to read fixture {fixture_path}"))?;
    let directory = InMemoryDirectory::from_json(&fixture)
        .with_context(|| format!("failed to parse fixture {fixture_path}"))?;

    let config = ResolverConfig::from_env()?;
    tracing::info!(fixture = %fixture_path, mode = ?config.mode, "inspecting identity");

    let resolver = ContextResolver::new(directory, config);
    let session = Session::new();
    let claims = IdentityClaims::new(identity_id);
    let ctx = session
        .resolve_with(&resolver, Some(&claims))
        .await
        .context("failed to resolve authorization context")?;

    let report = outpost_cli::build_report(&ctx, hint.as_deref());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
