use bytes::BytesMut;
use std::io;
use std::io::{Error, ErrorKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;
use tracing::debug;

use crate::protocol::binary::decoder::{BinaryRequest, MemcacheBinaryDecoder};
use crate::protocol::binary::encoder::{BinaryResponse, MemcacheBinaryEncoder, ResponseMessage};

const READ_BUFFER_CAPACITY: usize = 4096;

pub struct MemcacheBinaryConnection {
    stream: TcpStream,
    decoder: MemcacheBinaryDecoder,
    encoder: MemcacheBinaryEncoder,
    buffer: BytesMut,
}

impl MemcacheBinaryConnection {
    pub fn new(socket: TcpStream) -> Self {
        MemcacheBinaryConnection {
            stream: socket,
            decoder: MemcacheBinaryDecoder::new(),
            encoder: MemcacheBinaryEncoder::new(),
            buffer: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
        }
    }

    /// Reads one framed request, buffering socket reads as needed.
    ///
    /// `Ok(None)` means the peer closed the connection cleanly between
    /// frames; a close mid-frame is reported as `ConnectionReset`.
    pub async fn read_frame(&mut self) -> Result<Option<BinaryRequest>, io::Error> {
        loop {
            // Attempt to parse a frame from the buffered data. If enough data
            // has been buffered, the frame is returned.
            if let Some(frame) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }

            // There is not enough buffered data to read a frame. Attempt to
            // read more data from the socket.
            //
            // On success, the number of bytes is returned. `0` indicates "end
            // of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                } else {
                    return Err(Error::new(
                        ErrorKind::ConnectionReset,
                        "Connection reset by peer",
                    ));
                }
            }
        }
    }

    pub async fn write(&mut self, msg: &BinaryResponse) -> io::Result<()> {
        debug!("Sending response {:?}", msg.get_header());
        let message = self.encoder.encode_message(msg);
        self.write_data_to_stream(message).await
    }

    async fn write_data_to_stream(&mut self, msg: ResponseMessage) -> io::Result<()> {
        self.stream.write_all(&msg.data[..]).await?;
        self.stream.flush().await
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
