pub mod bitreader;
pub mod bitwriter;
pub mod conformance;
pub mod decoder;
pub mod error;
pub mod generator;
pub mod idwt;
pub mod picture;
pub mod quant;
pub mod state;
pub mod symbol_re;
pub mod tables;
pub mod valueset;
pub mod vlc;

pub use decoder::{decode_stream, parse_sequence, CrossSequenceState, PictureSink};
pub use error::{Result, Vc2Error};
pub use picture::{Picture, VideoParameters};
pub use state::DecoderState;
