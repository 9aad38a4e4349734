use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

pub const MAGIC_REQUEST: u8 = 0x80;
pub const MAGIC_RESPONSE: u8 = 0x81;

pub const CMD_GET: u8 = 0x00;
pub const CMD_SET: u8 = 0x01;
pub const CMD_DELETE: u8 = 0x04;
pub const CMD_NOOP: u8 = 0x0a;

/// One decoded response frame.
#[derive(Debug)]
pub struct Frame {
    pub magic: u8,
    pub opcode: u8,
    pub key_length: u16,
    pub extras_length: u8,
    pub data_type: u8,
    pub status: u16,
    pub body_length: u32,
    pub opaque: u32,
    pub cas: u64,
    pub extras: Vec<u8>,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Hand-rolled binary protocol client so tests control every byte on the
/// wire, including frames a well-behaved client library would never send.
pub struct BinaryClient {
    stream: TcpStream,
}

impl BinaryClient {
    pub fn connect(addr: &str) -> io::Result<BinaryClient> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;
        stream.set_nodelay(true)?;
        Ok(BinaryClient { stream })
    }

    pub fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)
    }

    pub fn send_request(
        &mut self,
        opcode: u8,
        extras: &[u8],
        key: &[u8],
        value: &[u8],
        opaque: u32,
        cas: u64,
    ) -> io::Result<()> {
        let body_length = (extras.len() + key.len() + value.len()) as u32;
        let mut packet = Vec::with_capacity(24 + body_length as usize);
        packet.push(MAGIC_REQUEST);
        packet.push(opcode);
        packet.extend_from_slice(&(key.len() as u16).to_be_bytes());
        packet.push(extras.len() as u8);
        packet.push(0); // data type
        packet.extend_from_slice(&0u16.to_be_bytes()); // reserved
        packet.extend_from_slice(&body_length.to_be_bytes());
        packet.extend_from_slice(&opaque.to_be_bytes());
        packet.extend_from_slice(&cas.to_be_bytes());
        packet.extend_from_slice(extras);
        packet.extend_from_slice(key);
        packet.extend_from_slice(value);
        self.stream.write_all(&packet)
    }

    pub fn read_response(&mut self) -> io::Result<Frame> {
        let mut header = [0u8; 24];
        self.stream.read_exact(&mut header)?;

        let extras_length = header[4];
        let key_length = u16::from_be_bytes([header[2], header[3]]);
        let body_length = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);

        let mut body = vec![0u8; body_length as usize];
        self.stream.read_exact(&mut body)?;

        let extras_end = extras_length as usize;
        let key_end = extras_end + key_length as usize;
        Ok(Frame {
            magic: header[0],
            opcode: header[1],
            key_length,
            extras_length,
            data_type: header[5],
            status: u16::from_be_bytes([header[6], header[7]]),
            body_length,
            opaque: u32::from_be_bytes([header[12], header[13], header[14], header[15]]),
            cas: u64::from_be_bytes([
                header[16], header[17], header[18], header[19], header[20], header[21],
                header[22], header[23],
            ]),
            extras: body[..extras_end].to_vec(),
            key: body[extras_end..key_end].to_vec(),
            value: body[key_end..].to_vec(),
        })
    }

    pub fn set(&mut self, key: &[u8], value: &[u8], cas: u64) -> io::Result<Frame> {
        // extras: flags + expiration
        let mut extras = [0u8; 8];
        extras[..4].copy_from_slice(&0u32.to_be_bytes());
        extras[4..].copy_from_slice(&0u32.to_be_bytes());
        self.send_request(CMD_SET, &extras, key, value, 0xDEADBEEF, cas)?;
        self.read_response()
    }

    pub fn get(&mut self, key: &[u8]) -> io::Result<Frame> {
        self.send_request(CMD_GET, &[], key, &[], 0xDEADBEEF, 0)?;
        self.read_response()
    }

    pub fn delete(&mut self, key: &[u8], cas: u64) -> io::Result<Frame> {
        self.send_request(CMD_DELETE, &[], key, &[], 0xDEADBEEF, cas)?;
        self.read_response()
    }

    /// True when the peer has closed the stream: the next read reports
    /// end-of-file, or a reset when the server closed a linger-0 socket.
    pub fn is_closed(&mut self) -> bool {
        let mut byte = [0u8; 1];
        match self.stream.read(&mut byte) {
            Ok(0) => true,
            Ok(_) => false,
            Err(err) => matches!(
                err.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            ),
        }
    }
}
