pub mod logging;
pub mod route_path;
