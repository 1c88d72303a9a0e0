pub mod control_connection;
pub mod data_connection;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;
pub mod port_pool;
pub mod stream;

#[cfg(test)]
mod test_session;

pub use control_connection::ControlConnection;
pub use data_connection::DataConnection;
pub use error::DataError;
pub use network::FtpServer;
pub use port_pool::PortPool;
