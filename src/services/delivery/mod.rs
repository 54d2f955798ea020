mod dispatcher;
mod error;
mod queue;
mod request;
mod settings;
mod transport;


pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DeliveryError;
pub use queue::DeliveryQueue;
pub use request::{HttpMethod, RequestItem};
pub use settings::*;
pub use transport::{HttpTransport, Transport, is_success};
