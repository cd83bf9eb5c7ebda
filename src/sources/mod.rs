pub mod platform_ws;

pub use platform_ws::PlatformWs;
