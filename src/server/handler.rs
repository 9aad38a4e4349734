use std::sync::Arc;
use tracing::debug;

use crate::cache::cache::Record;
use crate::cache::error::CacheError;
use crate::cache::lru_store::LruStore;
use crate::protocol::binary::decoder::BinaryRequest;
use crate::protocol::binary::encoder::{storage_error_to_response, BinaryResponse};
use crate::protocol::binary::network;

const EXTRAS_LENGTH: u8 = 4;

pub struct BinaryHandler {
    storage: Arc<LruStore>,
}

impl BinaryHandler {
    pub fn new(store: Arc<LruStore>) -> BinaryHandler {
        BinaryHandler { storage: store }
    }

    /// Builds the single response for one framed request. Store statuses and
    /// protocol errors both travel in the response header; whether the
    /// session survives the exchange is the session loop's call.
    pub fn handle_request(&self, req: BinaryRequest) -> BinaryResponse {
        let request_header = req.get_header();
        let mut response_header =
            network::ResponseHeader::new(request_header.opcode, request_header.opaque);

        match req {
            BinaryRequest::Get(get_request) => self.get(get_request, &mut response_header),
            BinaryRequest::Set(set_request) => self.set(set_request, &mut response_header),
            BinaryRequest::Delete(delete_request) => {
                self.delete(delete_request, &mut response_header)
            }
            BinaryRequest::Invalid(_request) => {
                storage_error_to_response(CacheError::InvalidArguments, &mut response_header)
            }
            BinaryRequest::Unknown(_request) => {
                storage_error_to_response(CacheError::UnknownCommand, &mut response_header)
            }
            BinaryRequest::TooLarge(_request) => {
                storage_error_to_response(CacheError::ValueTooLarge, &mut response_header)
            }
        }
    }

    fn get(
        &self,
        get_request: network::GetRequest,
        response_header: &mut network::ResponseHeader,
    ) -> BinaryResponse {
        debug!("Get request for key {:?}", get_request.key);
        match self.storage.get(&get_request.key) {
            Ok(record) => {
                response_header.extras_length = EXTRAS_LENGTH;
                response_header.body_length = record.value.len() as u32 + EXTRAS_LENGTH as u32;
                response_header.cas = record.cas;
                BinaryResponse::Get(network::GetResponse {
                    header: *response_header,
                    flags: record.flags,
                    value: record.value,
                })
            }
            Err(err) => storage_error_to_response(err, response_header),
        }
    }

    fn set(
        &self,
        set_request: network::SetRequest,
        response_header: &mut network::ResponseHeader,
    ) -> BinaryResponse {
        // expiration rides along on the wire but no TTL is enforced
        debug!(
            "Set request for key {:?}, expiration {}",
            set_request.key, set_request.expiration
        );
        let record = Record::new(set_request.value, set_request.flags, set_request.header.cas);
        match self.storage.set(set_request.key, record) {
            Ok(status) => {
                response_header.cas = status.cas;
                BinaryResponse::Set(network::SetResponse {
                    header: *response_header,
                })
            }
            Err(err) => storage_error_to_response(err, response_header),
        }
    }

    fn delete(
        &self,
        delete_request: network::DeleteRequest,
        response_header: &mut network::ResponseHeader,
    ) -> BinaryResponse {
        debug!("Delete request for key {:?}", delete_request.key);
        match self
            .storage
            .delete(&delete_request.key, delete_request.header.cas)
        {
            Ok(()) => BinaryResponse::Delete(network::DeleteResponse {
                header: *response_header,
            }),
            Err(err) => storage_error_to_response(err, response_header),
        }
    }
}
