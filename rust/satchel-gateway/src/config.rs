/// Feature switches for the gateway.
///
/// Everything defaults to `false`, the most restrictive posture: every path
/// requires authentication, no path-level policy is consulted, manifests are
/// served verbatim and the identity endpoint is off. Each deployment opts
/// into exactly the behavior it wants.
#[derive(Debug, Clone, Default)]
pub struct GatewaySettings {
    /// Stored secrets are SHA-256 hex digests rather than plaintext.
    pub hashed_secrets: bool,

    /// Serve `/` and `/index.html` without authentication.
    pub public_index: bool,

    /// Serve `/packages.json` and everything under `/p2/` and `/include/`
    /// without authentication.
    pub public_manifests: bool,

    /// Check per-path access tags for objects under `/dist/`.
    pub enforce_path_restrictions: bool,

    /// Filter restricted version entries out of served manifests.
    pub filter_manifests: bool,

    /// Enable the `/user.json` identity endpoint.
    pub identity_endpoint: bool,
}
