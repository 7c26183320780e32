pub mod frame;
mod live;

pub use live::CaptureLoop;
