use bytes::Bytes;
use num_derive::{FromPrimitive, ToPrimitive};
use serde_derive::{Deserialize, Serialize};

/// Size in bytes of a request or response header.
pub const HEADER_SIZE: usize = 24;

/// Largest accepted total body length (extras + key + value). A request
/// announcing more is answered with `TooBig` and the connection is closed.
pub const MAX_BODY_LENGTH: u32 = 1024 * 1024;

#[derive(FromPrimitive, ToPrimitive, Debug)]
#[repr(u8)]
pub enum Magic {
    Request = 0x80,
    Response = 0x81,
}

#[derive(FromPrimitive, ToPrimitive)]
#[repr(u16)]
pub enum ResponseStatus {
    Success = 0x00,
    KeyNotExists = 0x01,
    KeyExists = 0x02,
    TooBig = 0x03,
    InvalidArguments = 0x04,
    NotStored = 0x05,
    NonNumericValue = 0x06,
    AuthenticationError = 0x20,
    UnknownCommand = 0x81,
    NotEnoughMemory = 0x82,
    Busy = 0x85,
}

#[derive(FromPrimitive, ToPrimitive)]
#[repr(u8)]
pub enum DataTypes {
    RawBytes = 0x00,
}

/// Every opcode a client may put on the wire. Only `Get`, `Set` and
/// `Delete` are served; the rest are framed by their body length and
/// answered with `UnknownCommand`.
#[derive(FromPrimitive, ToPrimitive, Copy, Clone)]
#[repr(u8)]
pub enum Command {
    Get = 0x00,
    Set = 0x01,
    Add = 0x02,
    Replace = 0x03,
    Delete = 0x04,
    Increment = 0x05,
    Decrement = 0x06,
    Quit = 0x07,
    Flush = 0x08,
    GetQuiet = 0x09,
    Noop = 0x0a,
    Version = 0x0b,
    GetKey = 0x0c,
    GetKeyQuiet = 0x0d,
    Append = 0x0e,
    Prepend = 0x0f,
    Stat = 0x10,
    SetQuiet = 0x11,
    AddQuiet = 0x12,
    ReplaceQuiet = 0x13,
    DeleteQuiet = 0x14,
    IncrementQuiet = 0x15,
    DecrementQuiet = 0x16,
    QuitQuiet = 0x17,
    FlushQuiet = 0x18,
    AppendQuiet = 0x19,
    PrependQuiet = 0x1a,
    Touch = 0x1c,
    GetAndTouch = 0x1d,
    GetAndTouchQuiet = 0x1e,

    SaslListMechs = 0x20,
    SaslAuth = 0x21,
    SaslStep = 0x22,

    GetAndTouchKey = 0x23,
    GetAndTouchKeyQuiet = 0x24,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct RequestHeader {
    pub(crate) magic: u8,
    pub(crate) opcode: u8,
    pub(crate) key_length: u16,
    pub(crate) extras_length: u8,
    pub(crate) data_type: u8,
    pub(crate) reserved: u16,
    pub(crate) body_length: u32,
    pub(crate) opaque: u32,
    pub(crate) cas: u64,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct ResponseHeader {
    pub magic: u8,
    pub opcode: u8,
    pub key_length: u16,
    pub extras_length: u8,
    pub data_type: u8,
    pub status: u16,
    pub body_length: u32,
    pub opaque: u32,
    pub cas: u64,
}

impl ResponseHeader {
    /// Blank response header echoing the request's opcode and opaque.
    pub fn new(cmd: u8, opaque: u32) -> Self {
        ResponseHeader {
            magic: Magic::Response as u8,
            opcode: cmd,
            opaque,
            ..ResponseHeader::default()
        }
    }
}

/// Header-only request (any opcode this server does not serve).
#[derive(Debug)]
pub struct Request {
    pub(crate) header: RequestHeader,
}

/// Header-only response.
#[derive(Debug)]
pub struct Response {
    pub header: ResponseHeader,
}

#[derive(Debug)]
pub struct GetRequest {
    pub(crate) header: RequestHeader,
    pub(crate) key: Bytes,
}

pub type DeleteRequest = GetRequest;

#[derive(Debug)]
pub struct GetResponse {
    pub header: ResponseHeader,
    pub flags: u32,
    pub value: Bytes,
}

#[derive(Clone, Debug)]
pub struct SetRequest {
    pub(crate) header: RequestHeader,
    pub(crate) flags: u32,
    pub(crate) expiration: u32,
    pub(crate) key: Bytes,
    pub(crate) value: Bytes,
}

pub type SetResponse = Response;
pub type DeleteResponse = Response;
pub type ErrorResponse = Response;
