mod decoder;

pub use decoder::Decoder;
