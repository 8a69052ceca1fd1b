use crate::connection::constants::HttpMethod;
use crate::connection::session::{Connection, RequestOptions};
use crate::domain::model::HttpResponse;
use crate::utils::error::Result;
use std::fmt;

/// One argument to a path builder: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPart(String);

impl PathPart {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PathPart {
    fn from(value: &str) -> Self {
        PathPart(value.to_string())
    }
}

impl From<String> for PathPart {
    fn from(value: String) -> Self {
        PathPart(value)
    }
}

impl From<&String> for PathPart {
    fn from(value: &String) -> Self {
        PathPart(value.clone())
    }
}

macro_rules! path_part_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathPart {
                fn from(value: $t) -> Self {
                    PathPart(value.to_string())
                }
            }
        )*
    };
}

path_part_from_int!(i32, i64, u16, u32, u64, usize);

/// A request path under construction.
///
/// Every part is split on `/`, so `call(["foo/bar", "baz"])` and
/// `segment("foo").segment("bar").segment("baz")` give the same path.
#[derive(Debug, Clone)]
pub struct Callable {
    connection: Connection,
    parts: Vec<String>,
}

impl Callable {
    pub fn new<I>(connection: Connection, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathPart>,
    {
        let mut callable = Self {
            connection,
            parts: Vec::new(),
        };
        callable.extend(parts);
        callable
    }

    fn extend<I>(&mut self, parts: I)
    where
        I: IntoIterator,
        I::Item: Into<PathPart>,
    {
        for part in parts {
            let part: PathPart = part.into();
            self.parts
                .extend(part.as_str().split('/').map(str::to_string));
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn path(&self) -> String {
        format!("/{}", self.parts.join("/"))
    }

    pub fn segment(&self, part: impl Into<PathPart>) -> Callable {
        self.call([part])
    }

    /// Appends `parts`; method names are kept as plain parts here.
    pub fn call<I>(&self, parts: I) -> Callable
    where
        I: IntoIterator,
        I::Item: Into<PathPart>,
    {
        let mut next = self.clone();
        next.extend(parts);
        next
    }

    /// An HTTP method name (any case) turns the current path into an
    /// `Executable`; anything else is appended as a part.
    pub fn resolve(&self, name: &str) -> Node {
        match name.parse::<HttpMethod>() {
            Ok(method) => Node::Executable(self.method(method)),
            Err(_) => Node::Callable(self.segment(name)),
        }
    }

    pub fn method(&self, method: HttpMethod) -> Executable {
        Executable::new(self.connection.clone(), method).with_path(self.path())
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
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable ({}{})", self.path(), self.connection.path_suffix())
    }
}

/// A request ready to be sent: a method and an optional path.
#[derive(Debug, Clone)]
pub struct Executable {
    connection: Connection,
    method: HttpMethod,
    path: Option<String>,
}

impl Executable {
    pub fn new(connection: Connection, method: HttpMethod) -> Self {
        Self {
            connection,
            method,
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Sends the request. Without a path of its own, `options.path` is used,
    /// then `/`.
    pub async fn send(&self, options: RequestOptions) -> Result<HttpResponse> {
        let path = self
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| options.path.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or("/")
            .to_string();

        self.connection.request(self.method, &path, options).await
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.as_deref().unwrap_or("/");
        let suffix = self.connection.path_suffix();
        let suffix = if path.ends_with(suffix) { "" } else { suffix };
        write!(f, "Executable ({} {}{})", self.method, path, suffix)
    }
}

/// Outcome of resolving a name against a connection or a path.
#[derive(Debug, Clone)]
pub enum Node {
    Callable(Callable),
    Executable(Executable),
}

impl Node {
    pub fn into_callable(self) -> Option<Callable> {
        match self {
            Node::Callable(callable) => Some(callable),
            Node::Executable(_) => None,
        }
    }

    pub fn into_executable(self) -> Option<Executable> {
        match self {
            Node::Executable(executable) => Some(executable),
            Node::Callable(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Callable(callable) => fmt::Display::fmt(callable, f),
            Node::Executable(executable) => fmt::Display::fmt(executable, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        Connection::new("https://httpbin.org/").unwrap()
    }

    #[test]
    fn test_connection_converts_to_callable() {
        let connection = connection();

        let value = connection.segment("foo").call(["bar"]);
        assert_eq!(value.parts(), ["foo", "bar"]);
        assert_eq!(value.path(), "/foo/bar");
        assert!(value.connection().same_as(&connection));

        let value = connection.call(["foo"]);
        assert_eq!(value.parts(), ["foo"]);
        assert_eq!(value.path(), "/foo");
    }

    #[test]
    fn test_callable_accepts_many_parts() {
        let connection = connection();

        let value = Callable::new(connection.clone(), ["foo"]);
        assert_eq!(value.path(), "/foo");

        let value = Callable::new(connection.clone(), [PathPart::from("foo"), PathPart::from(1)]);
        assert_eq!(value.parts(), ["foo", "1"]);
        assert_eq!(value.path(), "/foo/1");

        let value = Callable::new(connection, ["foo/bar", "baz"]);
        assert_eq!(value.parts(), ["foo", "bar", "baz"]);
        assert_eq!(value.path(), "/foo/bar/baz");
    }

    #[test]
    fn test_callable_is_chainable() {
        let value = Callable::new(connection(), ["foo"])
            .segment("bar")
            .call([PathPart::from("baz"), PathPart::from(1)]);

        assert_eq!(value.parts(), ["foo", "bar", "baz", "1"]);
        assert_eq!(value.path(), "/foo/bar/baz/1");
        assert_eq!(value.to_string(), "Callable (/foo/bar/baz/1/)");
    }

    #[test]
    fn test_empty_call_keeps_path() {
        let value = Callable::new(connection(), ["foo"]);
        let same = value.call(Vec::<String>::new());
        assert_eq!(same.parts(), value.parts());
        assert_eq!(Callable::new(connection(), Vec::<String>::new()).path(), "/");
    }

    #[test]
    fn test_resolving_a_method_name_gives_an_executable() {
        let connection = connection();
        for method in HttpMethod::ALL {
            let upper = method.as_str().to_string();
            let lower = upper.to_lowercase();
            let capitalized = format!("{}{}", &upper[..1], &lower[1..]);

            for name in [&upper, &lower, &capitalized] {
                let exe = Callable::new(connection.clone(), ["foo/bar/baz"])
                    .resolve(name)
                    .into_executable()
                    .unwrap();
                assert_eq!(exe.method(), method);
                assert_eq!(exe.path(), Some("/foo/bar/baz"));
                assert!(exe.connection().same_as(&connection));
            }
        }
    }

    #[test]
    fn test_calling_with_a_method_name_stays_a_path() {
        let connection = connection();
        for method in HttpMethod::ALL {
            let upper = method.as_str().to_string();
            let lower = upper.to_lowercase();

            for name in [&upper, &lower] {
                let value = Callable::new(connection.clone(), ["foo/bar/baz"]).call([name]);
                assert_eq!(value.path(), format!("/foo/bar/baz/{}", name));
            }
        }
    }

    #[test]
    fn test_resolving_other_names_extends_the_path() {
        let node = Callable::new(connection(), ["foo"]).resolve("parts");
        assert_eq!(node.to_string(), "Callable (/foo/parts/)");
        assert!(node.into_callable().is_some());
    }

    #[test]
    fn test_executable_display() {
        let connection = connection();
        assert_eq!(
            Executable::new(connection.clone(), HttpMethod::Get).to_string(),
            "Executable (GET /)"
        );
        assert_eq!(
            Executable::new(connection.clone(), HttpMethod::Get)
                .with_path("/foo/bar")
                .to_string(),
            "Executable (GET /foo/bar/)"
        );
        assert_eq!(
            connection.call(["bar", "baz"]).segment(1).post().to_string(),
            "Executable (POST /bar/baz/1/)"
        );
    }
}
