use bytes::{Buf, BytesMut};
use num_traits::FromPrimitive;
use std::io;
use std::io::{Error, ErrorKind};
use tokio_util::codec::Decoder;
use tracing::error;

use crate::protocol::binary::network;

/// Client request as framed off the wire.
#[derive(Debug)]
pub enum BinaryRequest {
    Get(network::GetRequest),
    Set(network::SetRequest),
    Delete(network::DeleteRequest),
    /// Payload shape violates the opcode's contract; answered with
    /// `InvalidArguments`, the session continues.
    Invalid(network::Request),
    /// Opcode this server does not serve. The body has been consumed, so
    /// framing is intact; answered with `UnknownCommand`, the session
    /// continues.
    Unknown(network::Request),
    /// Announced body larger than [`network::MAX_BODY_LENGTH`]; answered
    /// with `TooBig` and the connection is closed without draining the body.
    TooLarge(network::Request),
}

impl BinaryRequest {
    pub fn get_header(&'_ self) -> &'_ network::RequestHeader {
        match self {
            BinaryRequest::Get(request) | BinaryRequest::Delete(request) => &request.header,
            BinaryRequest::Set(request) => &request.header,
            BinaryRequest::Invalid(request)
            | BinaryRequest::Unknown(request)
            | BinaryRequest::TooLarge(request) => &request.header,
        }
    }
}

#[derive(PartialEq, Debug)]
enum RequestParserState {
    None,
    HeaderParsed,
}

pub struct MemcacheBinaryDecoder {
    header: network::RequestHeader,
    state: RequestParserState,
}

impl Default for MemcacheBinaryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemcacheBinaryDecoder {
    const HEADER_LEN: usize = network::HEADER_SIZE;

    pub fn new() -> MemcacheBinaryDecoder {
        MemcacheBinaryDecoder {
            header: Default::default(),
            state: RequestParserState::None,
        }
    }

    fn init_parser(&mut self) {
        self.header = Default::default();
        self.state = RequestParserState::None;
    }

    fn parse_header(&mut self, src: &mut BytesMut) -> Result<(), io::Error> {
        if src.len() < MemcacheBinaryDecoder::HEADER_LEN {
            error!("Buffer len is less than MemcacheBinaryDecoder::HEADER_LEN");
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Buffer too small cannot parse header",
            ));
        }

        self.header = network::RequestHeader {
            magic: src.get_u8(),
            opcode: src.get_u8(),
            key_length: src.get_u16(),
            extras_length: src.get_u8(),
            data_type: src.get_u8(),
            reserved: src.get_u16(),
            body_length: src.get_u32(),
            opaque: src.get_u32(),
            cas: src.get_u64(),
        };

        self.state = RequestParserState::HeaderParsed;
        if !self.header_valid() {
            return Err(Error::new(ErrorKind::InvalidData, "Incorrect header"));
        }

        if self.header.body_length <= network::MAX_BODY_LENGTH {
            src.reserve(self.header.body_length as usize);
        }
        Ok(())
    }

    fn header_valid(&self) -> bool {
        if self.header.magic != network::Magic::Request as u8 {
            error!("Invalid header: magic != network::Magic::Request");
            return false;
        }

        if self.header.key_length as u32 + self.header.extras_length as u32
            > self.header.body_length
        {
            error!("Invalid header: key + extras larger than total body");
            return false;
        }
        true
    }

    fn parse_request(&mut self, src: &mut BytesMut) -> Result<Option<BinaryRequest>, io::Error> {
        if self.state != RequestParserState::HeaderParsed {
            error!("Incorrect parser state ({:?})", self.state);
            return Err(Error::other("Header is not parsed"));
        }

        if self.header.body_length as usize > src.len() {
            error!(
                "Header body length({:?}) larger than src buffer length({:?})",
                self.header.body_length,
                src.len()
            );
            return Err(Error::other("Header body length too large"));
        }

        let header = self.header;
        let mut body = src.split_to(header.body_length as usize);
        let extras = body.split_to(header.extras_length as usize).freeze();
        let key = body.split_to(header.key_length as usize).freeze();
        let value = body.freeze();

        let request = match FromPrimitive::from_u8(header.opcode) {
            Some(network::Command::Get) => Self::parse_get_request(header, extras, key, value),
            Some(network::Command::Set) => Self::parse_set_request(header, extras, key, value),
            Some(network::Command::Delete) => {
                Self::parse_delete_request(header, extras, key, value)
            }
            // Reserved and unrecognized opcodes alike: the body length has
            // framed the request, the handler answers UnknownCommand.
            _ => BinaryRequest::Unknown(network::Request { header }),
        };
        self.init_parser();
        Ok(Some(request))
    }

    fn parse_get_request(
        header: network::RequestHeader,
        extras: bytes::Bytes,
        key: bytes::Bytes,
        value: bytes::Bytes,
    ) -> BinaryRequest {
        if !extras.is_empty() || !value.is_empty() {
            return BinaryRequest::Invalid(network::Request { header });
        }
        BinaryRequest::Get(network::GetRequest { header, key })
    }

    fn parse_set_request(
        header: network::RequestHeader,
        extras: bytes::Bytes,
        key: bytes::Bytes,
        value: bytes::Bytes,
    ) -> BinaryRequest {
        // extras = flags u32 + expiration u32
        if extras.len() != 2 * std::mem::size_of::<u32>() || value.is_empty() {
            return BinaryRequest::Invalid(network::Request { header });
        }
        let mut extras = extras;
        let flags = extras.get_u32();
        let expiration = extras.get_u32();
        BinaryRequest::Set(network::SetRequest {
            header,
            flags,
            expiration,
            key,
            value,
        })
    }

    fn parse_delete_request(
        header: network::RequestHeader,
        extras: bytes::Bytes,
        key: bytes::Bytes,
        value: bytes::Bytes,
    ) -> BinaryRequest {
        if !extras.is_empty() || !value.is_empty() {
            return BinaryRequest::Invalid(network::Request { header });
        }
        BinaryRequest::Delete(network::DeleteRequest { header, key })
    }
}

impl Decoder for MemcacheBinaryDecoder {
    type Item = BinaryRequest;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BinaryRequest>, io::Error> {
        if self.state == RequestParserState::None {
            if src.len() < MemcacheBinaryDecoder::HEADER_LEN {
                return Ok(None);
            }
            self.parse_header(src)?;
        }

        if self.header.body_length > network::MAX_BODY_LENGTH {
            let request = BinaryRequest::TooLarge(network::Request {
                header: self.header,
            });
            self.init_parser();
            return Ok(Some(request));
        }

        if (self.header.body_length as usize) > src.len() {
            return Ok(None);
        }
        self.parse_request(src)
    }
}
