pub mod handler;

pub use handler::{ChannelNavigator, SocketMessage, auth_socket};
