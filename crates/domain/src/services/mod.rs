pub mod token_codec;

pub use token_codec::TokenCodec;
