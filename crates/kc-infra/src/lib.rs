pub mod events;
pub mod http;
pub mod remote;
pub mod time;

pub use events::WatchEventPort;
pub use http::HttpOrderBackend;
pub use remote::{RemoteCommandHandler, SocketIoRemote};
pub use time::TokioTimer;
