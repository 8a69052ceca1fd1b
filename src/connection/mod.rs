//! HTTP connections with chainable request paths.
//!
//! A request starts from a [`Connection`], collects path parts into a
//! [`Callable`], and ends as an [`Executable`] once an HTTP method is picked:
//!
//! ```
//! use isshub_sync::connection::Connection;
//!
//! let connection = Connection::new("https://httpbin.org/").unwrap();
//! assert_eq!(connection.segment("foo").to_string(), "Callable (/foo/)");
//! assert_eq!(connection.call(["bar/baz"]).to_string(), "Callable (/bar/baz/)");
//! assert_eq!(
//!     connection.segment("bar").call(["baz"]).segment(1).get().to_string(),
//!     "Executable (GET /bar/baz/1/)"
//! );
//! ```

/// Generates one shortcut per [`HttpMethod`](constants::HttpMethod), each
/// delegating to `self.method(..)`.
macro_rules! http_method_shortcuts {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> Executable {
                self.method(HttpMethod::$method)
            }
        )*
    };
}

pub mod constants;
pub mod path;
pub mod session;

pub use constants::{DataMode, HttpMethod};
pub use path::{Callable, Executable, Node, PathPart};
pub use session::{Connection, RequestOptions, DEFAULT_PATH_SUFFIX};
