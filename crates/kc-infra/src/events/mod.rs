mod watch_event_port;

pub use watch_event_port::WatchEventPort;
