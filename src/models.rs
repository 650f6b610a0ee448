pub mod pix;
pub mod server;
