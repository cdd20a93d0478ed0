use super::Extensions;
use indexmap::IndexMap;

/// Scheme name → required scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// `apiKey`, `http`, `oauth2`, `openIdConnect` or `mutualTLS`
///
/// Swagger 2.0 `basic` is read as `http` with scheme `basic`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SecurityScheme {
    pub scheme_type: String,
    pub description: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub flows: Option<OAuthFlows>,
    pub open_id_connect_url: Option<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
    pub extensions: Extensions,
}

impl OAuthFlows {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OAuthFlow)> {
        [
            ("implicit", self.implicit.as_ref()),
            ("password", self.password.as_ref()),
            ("clientCredentials", self.client_credentials.as_ref()),
            ("authorizationCode", self.authorization_code.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, flow)| flow.map(|flow| (name, flow)))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OAuthFlow {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub refresh_url: Option<String>,
    pub scopes: IndexMap<String, String>,
    pub extensions: Extensions,
}
