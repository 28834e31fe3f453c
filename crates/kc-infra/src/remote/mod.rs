mod command;
mod socket_io;

pub use command::{is_valid_phone_number, RemoteCommand, RemoteCommandHandler};
pub use socket_io::SocketIoRemote;
