pub mod decoder;
pub mod value;

pub use decoder::{Decoder, LuaDecoder};
pub use value::{LuaKey, LuaValue};
