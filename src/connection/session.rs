use crate::adapters::http::ReqwestClient;
use crate::connection::constants::{DataMode, HttpMethod};
use crate::connection::path::{Callable, Executable, Node, PathPart};
use crate::domain::dict_object::json_kind;
use crate::domain::model::{HttpResponse, OutgoingRequest, RequestBody};
use crate::domain::ports::ConnectionClient;
use crate::utils::error::{Result, SyncError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use url::Url;

/// Suffix forced at the end of every request path unless overridden.
pub const DEFAULT_PATH_SUFFIX: &str = "/";

/// Per-request settings. `None` means "not provided"; an explicit empty
/// `path_suffix` disables the suffix for that request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub data: Option<Value>,
    pub data_mode: DataMode,
    pub headers: Option<BTreeMap<String, String>>,
    pub path_suffix: Option<String>,
    /// Only used by an [`Executable`] that has no path of its own.
    pub path: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn data_mode(mut self, mode: DataMode) -> Self {
        self.data_mode = mode;
        self
    }

    pub fn json(self, data: Value) -> Self {
        self.data(data).data_mode(DataMode::Json)
    }

    pub fn form(self, data: Value) -> Self {
        self.data(data).data_mode(DataMode::Form)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = Some(suffix.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An object capable of calling an HTTP endpoint under a fixed root.
///
/// Clones share the same client, so a connection can be handed to many
/// concurrent requests.
#[derive(Clone)]
pub struct Connection {
    root: String,
    path_suffix: String,
    default_headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
    client: Arc<OnceLock<Arc<dyn ConnectionClient>>>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("root", &self.root)
            .field("path_suffix", &self.path_suffix)
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .field("has_client", &self.has_client())
            .finish()
    }
}

impl Connection {
    pub fn new(root: &str) -> Result<Self> {
        Ok(Self {
            root: Self::validate_root(root)?,
            path_suffix: DEFAULT_PATH_SUFFIX.to_string(),
            default_headers: BTreeMap::new(),
            timeout: None,
            client: Arc::new(OnceLock::new()),
        })
    }

    pub fn with_client(mut self, client: Arc<dyn ConnectionClient>) -> Self {
        self.client = Arc::new(OnceLock::from(client));
        self
    }

    pub fn with_path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = suffix.into();
        self
    }

    pub fn with_default_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn path_suffix(&self) -> &str {
        &self.path_suffix
    }

    pub fn has_client(&self) -> bool {
        self.client.get().is_some()
    }

    /// Whether both handles share the same underlying client slot.
    pub fn same_as(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
    }

    /// Keeps scheme, authority and path (minus one trailing `/`); drops query
    /// and fragment. Only http and https are accepted.
    fn validate_root(root: &str) -> Result<String> {
        let invalid = |reason: String| SyncError::InvalidRoot {
            root: root.to_string(),
            reason,
        };

        let parsed = Url::parse(root).map_err(|e| invalid(e.to_string()))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", scheme)));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;

        let mut authority = String::new();
        if !parsed.username().is_empty() {
            authority.push_str(parsed.username());
            if let Some(password) = parsed.password() {
                authority.push(':');
                authority.push_str(password);
            }
            authority.push('@');
        }
        authority.push_str(host);
        if let Some(port) = parsed.port() {
            authority.push_str(&format!(":{}", port));
        }

        let path = parsed.path();
        let path = path.strip_suffix('/').unwrap_or(path);

        Ok(format!("{}://{}{}", scheme, authority, path))
    }

    /// Starts a path with a single part.
    pub fn segment(&self, part: impl Into<PathPart>) -> Callable {
        Callable::new(self.clone(), [part])
    }

    /// Starts a path with any number of parts.
    pub fn call<I>(&self, parts: I) -> Callable
    where
        I: IntoIterator,
        I::Item: Into<PathPart>,
    {
        Callable::new(self.clone(), parts)
    }

    /// An HTTP method name (any case) gives an `Executable` on the root,
    /// anything else starts a path.
    pub fn resolve(&self, name: &str) -> Node {
        match name.parse::<HttpMethod>() {
            Ok(method) => Node::Executable(self.method(method)),
            Err(_) => Node::Callable(self.segment(name)),
        }
    }

    pub fn method(&self, method: HttpMethod) -> Executable {
        Executable::new(self.clone(), method)
    }

    http_method_shortcuts! {
        get => Get,
        head => Head,
        post => Post,
        put => Put,
        patch => Patch,
        delete => Delete,
        options => Options,
    }

    fn client(&self) -> Arc<dyn ConnectionClient> {
        self.client
            .get_or_init(|| {
                tracing::debug!("🔌 No client given for {}, creating the default one", self.root);
                Arc::new(ReqwestClient::new())
            })
            .clone()
    }

    /// Builds the final request, without sending it.
    pub fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
    ) -> Result<OutgoingRequest> {
        let mut path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let suffix = options
            .path_suffix
            .as_deref()
            .unwrap_or(self.path_suffix.as_str());
        if !suffix.is_empty() && !path.ends_with(suffix) {
            path.push_str(suffix);
        }

        let full = format!("{}{}", self.root, path);
        let url = Url::parse(&full).map_err(|_| SyncError::UnresolvedPath { path: full })?;

        // header names compare case-insensitively; request headers replace defaults
        let mut headers = self.default_headers.clone();
        if let Some(extra) = &options.headers {
            for (key, value) in extra {
                headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
                headers.insert(key.clone(), value.clone());
            }
        }

        let body = match &options.data {
            None => None,
            Some(data) => Some(match options.data_mode {
                DataMode::Json => RequestBody::Json(data.clone()),
                DataMode::Form => RequestBody::Form(form_pairs(data)?),
            }),
        };

        Ok(OutgoingRequest {
            method,
            url,
            headers,
            body,
            timeout: options.timeout.or(self.timeout),
        })
    }

    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = self.prepare(method, path, &options)?;

        tracing::debug!("📡 {} {}", request.method, request.url);
        let response = self.client().send(request).await?;
        tracing::debug!("📡 Response status: {}", response.status);

        Ok(response)
    }
}

fn form_pairs(data: &Value) -> Result<Vec<(String, String)>> {
    match data {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()),
        other => Err(SyncError::NotAnObject {
            found: json_kind(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    const DUMMY_ROOT: &str = "https://httpbin.org/";

    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<OutgoingRequest>>,
    }

    impl RecordingClient {
        fn last(&self) -> OutgoingRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ConnectionClient for RecordingClient {
        async fn send(&self, request: OutgoingRequest) -> Result<HttpResponse> {
            let response = HttpResponse {
                status: 200,
                url: request.url.clone(),
                headers: BTreeMap::new(),
                body: b"dummy".to_vec(),
            };
            self.requests.lock().unwrap().push(request);
            Ok(response)
        }
    }

    fn recorded() -> (Connection, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient::default());
        let connection = Connection::new(DUMMY_ROOT)
            .unwrap()
            .with_client(client.clone());
        (connection, client)
    }

    #[test]
    fn test_root_is_validated() {
        assert_eq!(Connection::new(DUMMY_ROOT).unwrap().root(), "https://httpbin.org");
        assert_eq!(
            Connection::new("https://httpbin.org").unwrap().root(),
            "https://httpbin.org"
        );
        assert_eq!(
            Connection::new("HTTPS://foo.com/bar/").unwrap().root(),
            "https://foo.com/bar"
        );
        assert_eq!(
            Connection::new("http://localhost:8080/api/v4/?page=2#top")
                .unwrap()
                .root(),
            "http://localhost:8080/api/v4"
        );

        assert!(matches!(
            Connection::new("foo"),
            Err(SyncError::InvalidRoot { .. })
        ));
        assert!(matches!(
            Connection::new("ftp://foo.com"),
            Err(SyncError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_resolve_distinguishes_methods_from_parts() {
        let connection = Connection::new(DUMMY_ROOT).unwrap();

        match connection.resolve("get") {
            Node::Executable(exe) => {
                assert_eq!(exe.method(), HttpMethod::Get);
                assert_eq!(exe.path(), None);
            }
            other => panic!("unexpected node: {other}"),
        }

        match connection.resolve("client") {
            Node::Callable(callable) => assert_eq!(callable.path(), "/client"),
            other => panic!("unexpected node: {other}"),
        }

        assert_eq!(connection.call(["get"]).get().to_string(), "Executable (GET /get/)");
    }

    #[test]
    fn test_prepare_prefixes_and_suffixes_path() {
        let connection = Connection::new(DUMMY_ROOT).unwrap();
        let options = RequestOptions::new();

        let req = connection.prepare(HttpMethod::Get, "dummy_get", &options).unwrap();
        assert_eq!(req.url.as_str(), "https://httpbin.org/dummy_get/");

        let req = connection.prepare(HttpMethod::Get, "/already/", &options).unwrap();
        assert_eq!(req.url.as_str(), "https://httpbin.org/already/");

        let options = RequestOptions::new().path_suffix("");
        let req = connection.prepare(HttpMethod::Get, "/no_slash", &options).unwrap();
        assert_eq!(req.url.as_str(), "https://httpbin.org/no_slash");

        let options = RequestOptions::new().path_suffix(".json");
        let req = connection.prepare(HttpMethod::Get, "/repos", &options).unwrap();
        assert_eq!(req.url.as_str(), "https://httpbin.org/repos.json");
    }

    #[test]
    fn test_root_keeps_userinfo_and_port() {
        let connection = Connection::new("http://u:p@host:8080/x/").unwrap();
        assert_eq!(connection.root(), "http://u:p@host:8080/x");

        let connection = Connection::new("https://bot@forge.example.com:8443").unwrap();
        assert_eq!(connection.root(), "https://bot@forge.example.com:8443");

        // default port is not repeated
        let connection = Connection::new("https://api.github.com:443/").unwrap();
        assert_eq!(connection.root(), "https://api.github.com");
    }

    #[test]
    fn test_request_header_replaces_default_ignoring_case() {
        let mut defaults = BTreeMap::new();
        defaults.insert("Authorization".to_string(), "token default".to_string());
        defaults.insert("Accept".to_string(), "application/json".to_string());
        let connection = Connection::new(DUMMY_ROOT)
            .unwrap()
            .with_default_headers(defaults);

        let options = RequestOptions::new().header("authorization", "token override");
        let req = connection.prepare(HttpMethod::Get, "/user", &options).unwrap();

        let auth: Vec<_> = req
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "token override");
        assert_eq!(req.headers["Accept"], "application/json");
    }

    #[test]
    fn test_form_data_must_be_an_object() {
        let connection = Connection::new(DUMMY_ROOT).unwrap();
        let options = RequestOptions::new().form(json!([1, 2]));
        match connection.prepare(HttpMethod::Post, "/foo", &options) {
            Err(SyncError::NotAnObject { found }) => assert_eq!(found, "an array"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_connection_level_suffix() {
        let connection = Connection::new(DUMMY_ROOT).unwrap().with_path_suffix("");
        let req = connection
            .prepare(HttpMethod::Get, "/dummy_no_end_slash", &RequestOptions::new())
            .unwrap();
        assert_eq!(req.url.path(), "/dummy_no_end_slash");
        assert_eq!(connection.segment("foo").to_string(), "Callable (/foo)");
    }

    #[test]
    fn test_prepare_encodes_body_per_mode() {
        let connection = Connection::new(DUMMY_ROOT).unwrap();

        let options = RequestOptions::new().form(json!({"foo": "bar", "n": 2}));
        let req = connection.prepare(HttpMethod::Post, "/form", &options).unwrap();
        assert_eq!(
            req.body,
            Some(RequestBody::Form(vec![
                ("foo".to_string(), "bar".to_string()),
                ("n".to_string(), "2".to_string()),
            ]))
        );

        let options = RequestOptions::new().json(json!({"foo": "bar"}));
        let req = connection.prepare(HttpMethod::Post, "/json", &options).unwrap();
        assert_eq!(req.body, Some(RequestBody::Json(json!({"foo": "bar"}))));

        let options = RequestOptions::new().form(json!(["not", "an", "object"]));
        assert!(connection.prepare(HttpMethod::Post, "/form", &options).is_err());
    }

    #[test]
    fn test_request_headers_override_defaults() {
        let mut defaults = BTreeMap::new();
        defaults.insert("Accept".to_string(), "application/json".to_string());
        defaults.insert("X-Foo".to_string(), "Default".to_string());
        let connection = Connection::new(DUMMY_ROOT)
            .unwrap()
            .with_default_headers(defaults)
            .with_timeout(Duration::from_secs(30));

        let options = RequestOptions::new()
            .header("X-Foo", "Bar")
            .timeout(Duration::from_secs(5));
        let req = connection.prepare(HttpMethod::Get, "/", &options).unwrap();

        assert_eq!(req.headers["Accept"], "application/json");
        assert_eq!(req.headers["X-Foo"], "Bar");
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));

        let req = connection
            .prepare(HttpMethod::Get, "/", &RequestOptions::new())
            .unwrap();
        assert_eq!(req.timeout, Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_request_goes_through_given_client() {
        let (connection, client) = recorded();

        let response = connection
            .segment("dummy_get")
            .get()
            .send(RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "dummy");
        let sent = client.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url.path(), "/dummy_get/");
    }

    #[test]
    fn test_executable_without_path_uses_options_path() {
        let (connection, client) = recorded();

        let options = RequestOptions::new().path("/dummy_get/");
        tokio_test::block_on(connection.get().send(options)).unwrap();
        assert_eq!(client.last().url.path(), "/dummy_get/");

        tokio_test::block_on(connection.post().send(RequestOptions::new())).unwrap();
        assert_eq!(client.last().url.path(), "/");
        assert_eq!(client.last().method, HttpMethod::Post);

        // the executable's own path wins over options.path
        tokio_test::block_on(
            connection
                .segment("own")
                .get()
                .send(RequestOptions::new().path("/ignored")),
        )
        .unwrap();
        assert_eq!(client.last().url.path(), "/own/");
    }

    #[test]
    fn test_clones_share_the_client_slot() {
        let (connection, _client) = recorded();
        let callable = connection.segment("foo");
        assert!(callable.connection().same_as(&connection));
        assert!(!Connection::new(DUMMY_ROOT).unwrap().same_as(&connection));
    }

    #[test]
    fn test_default_client_is_created_lazily() {
        let connection = Connection::new(DUMMY_ROOT).unwrap();
        assert!(!connection.has_client());

        let shared = connection.clone();
        let _ = connection.client();
        assert!(connection.has_client());
        assert!(shared.has_client());
    }
}
