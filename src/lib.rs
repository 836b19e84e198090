pub mod config;
pub mod connection;
pub mod exception;
pub mod logging;
pub mod mime;
pub mod param;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use config::Config;
pub use connection::{handle_connection, ServeContext};
pub use exception::Exception;
pub use mime::{Classifier, ContentTypeProbe, MimeTypesProbe};
pub use request::Request;
pub use resolver::{BaseDirectory, ResolvedPath};
pub use response::Response;
pub use server::{Server, WorkerPool};
