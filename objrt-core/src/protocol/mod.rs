//! Wire protocol: one length-prefixed JSON request and one length-prefixed
//! response per connection.

pub mod frame;
pub mod message;
pub mod wire;

pub use frame::{FrameError, MAX_FRAME_LEN, read_frame, write_frame};
pub use message::{GET_OBJECT, Request, parse_request};
pub use wire::{
    ErrorEnvelope, Response, WIRE_VERSION, WireDetail, WireObject,
    decode_response, encode_error, encode_object,
};
