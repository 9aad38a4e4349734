use bytes::{BufMut, Bytes, BytesMut};

use crate::cache::error::CacheError;
use crate::protocol::binary::network;

/// Server response
#[derive(Debug)]
pub enum BinaryResponse {
    Error(network::ErrorResponse),
    Get(network::GetResponse),
    Set(network::SetResponse),
    Delete(network::DeleteResponse),
}

impl BinaryResponse {
    pub fn get_header(&'_ self) -> &'_ network::ResponseHeader {
        match self {
            BinaryResponse::Error(response)
            | BinaryResponse::Set(response)
            | BinaryResponse::Delete(response) => &response.header,
            BinaryResponse::Get(response) => &response.header,
        }
    }
}

/// Maps a store error onto a header-only response. The status travels in
/// the header; the body stays empty and the cas is zeroed.
pub fn storage_error_to_response(
    err: CacheError,
    response_header: &mut network::ResponseHeader,
) -> BinaryResponse {
    response_header.status = err as u16;
    response_header.cas = 0;
    response_header.extras_length = 0;
    response_header.key_length = 0;
    response_header.body_length = 0;
    BinaryResponse::Error(network::ErrorResponse {
        header: *response_header,
    })
}

pub struct ResponseMessage {
    // header+extras?+value?
    pub(crate) data: Bytes,
}

#[derive(Default)]
pub struct MemcacheBinaryEncoder {}

impl MemcacheBinaryEncoder {
    pub fn new() -> MemcacheBinaryEncoder {
        MemcacheBinaryEncoder {}
    }

    fn get_length(&self, msg: &BinaryResponse) -> usize {
        network::HEADER_SIZE + msg.get_header().body_length as usize
    }

    /// Encodes a complete response: header, then extras, then value, empty
    /// segments skipped.
    pub fn encode_message(&self, msg: &BinaryResponse) -> ResponseMessage {
        let len = self.get_length(msg);
        let mut dst = BytesMut::with_capacity(len);
        self.write_header(msg.get_header(), &mut dst);
        self.encode_data(msg, dst)
    }

    fn encode_data(&self, msg: &BinaryResponse, mut dst: BytesMut) -> ResponseMessage {
        match msg {
            BinaryResponse::Get(response) => {
                dst.put_u32(response.flags);
                dst.put(response.value.clone());
            }
            BinaryResponse::Error(_response)
            | BinaryResponse::Set(_response)
            | BinaryResponse::Delete(_response) => {}
        }
        ResponseMessage { data: dst.freeze() }
    }

    fn write_header(&self, header: &network::ResponseHeader, dst: &mut BytesMut) {
        dst.put_u8(header.magic);
        dst.put_u8(header.opcode);
        dst.put_u16(header.key_length);
        dst.put_u8(header.extras_length);
        dst.put_u8(header.data_type);
        dst.put_u16(header.status);
        dst.put_u32(header.body_length);
        dst.put_u32(header.opaque);
        dst.put_u64(header.cas);
    }
}
