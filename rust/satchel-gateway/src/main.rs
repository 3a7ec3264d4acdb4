//! Satchel gateway binary.
//!
//! Serves a package repository out of an S3-compatible bucket, enforcing
//! credential checks, per-path access tags and manifest filtering according
//! to the flags below. Set `RUST_LOG` to adjust log verbosity.

use clap::Parser;
use satchel_gateway::{Gateway, GatewaySettings, Server};
use satchel_storage::{Bucket, Credentials, DEFAULT_CREDENTIAL_PREFIX, DEFAULT_EXPIRES, Session};
use tracing_subscriber::EnvFilter;

/// Authorization gateway for a Composer package repository.
#[derive(Parser, Debug)]
#[command(name = "satchel-gateway", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Base URL of the S3-compatible storage endpoint
    #[arg(long)]
    endpoint: String,

    /// Bucket holding the repository objects
    #[arg(long)]
    bucket: String,

    /// Signing region ("auto" for Cloudflare R2)
    #[arg(long, default_value = "auto")]
    region: String,

    /// Access key ID; omit together with the secret for a public bucket
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    access_key_id: Option<String>,

    /// Secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Presigned URL validity in seconds
    #[arg(long, default_value_t = DEFAULT_EXPIRES)]
    expires: u64,

    /// Key prefix for credential records
    #[arg(long, default_value = DEFAULT_CREDENTIAL_PREFIX)]
    credential_prefix: String,

    /// Treat stored secrets as SHA-256 hex digests
    #[arg(long)]
    hashed_secrets: bool,

    /// Serve / and /index.html without authentication
    #[arg(long)]
    public_index: bool,

    /// Serve package manifests without authentication
    #[arg(long)]
    public_manifests: bool,

    /// Check per-path access tags for objects under /dist/
    #[arg(long)]
    enforce_path_restrictions: bool,

    /// Filter restricted version entries out of served manifests
    #[arg(long)]
    filter_manifests: bool,

    /// Enable the /user.json identity endpoint
    #[arg(long)]
    identity_endpoint: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let session = match (args.access_key_id, args.secret_access_key) {
        (Some(access_key_id), Some(secret_access_key)) => Session::new(
            Credentials {
                access_key_id,
                secret_access_key,
            },
            args.region,
            args.expires,
        ),
        (None, None) => {
            tracing::info!("no access credentials given; treating the bucket as public");
            Session::Public
        }
        _ => anyhow::bail!("provide both --access-key-id and --secret-access-key, or neither"),
    };

    let store = Bucket::open(args.endpoint, args.bucket, session);
    let settings = GatewaySettings {
        hashed_secrets: args.hashed_secrets,
        public_index: args.public_index,
        public_manifests: args.public_manifests,
        enforce_path_restrictions: args.enforce_path_restrictions,
        filter_manifests: args.filter_manifests,
        identity_endpoint: args.identity_endpoint,
    };

    let gateway = Gateway::new(store, settings).with_credential_prefix(args.credential_prefix);
    let server = Server::start(gateway, args.listen.as_str()).await?;

    tracing::info!(endpoint = %server.endpoint, "gateway listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.stop();

    Ok(())
}
