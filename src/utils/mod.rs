pub mod channels;

pub use channels::EventChannel;
