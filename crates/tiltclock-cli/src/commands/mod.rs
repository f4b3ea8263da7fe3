pub mod config;
pub mod countdown;
pub mod orientation;
pub mod run;
pub mod weather;

/// Multi-threaded runtime for commands that do network I/O.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
